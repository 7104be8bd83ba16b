use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::recommendations::browse::MAX_PAGE_SIZE;
use crate::workflows::recommendations::RankingConfig;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub recommendations: RecommendationSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = match env::var("APP_LOG_FORMAT") {
            Ok(value) => LogFormat::parse(&value)?,
            Err(_) => LogFormat::Compact,
        };

        let max_results = match env::var("APP_RECOMMENDATION_LIMIT") {
            Ok(value) => parse_limit(&value)?,
            Err(_) => RankingConfig::default().max_results,
        };

        let schemes_csv = non_empty_path("APP_CATALOG_SCHEMES_CSV");
        let rules_csv = non_empty_path("APP_CATALOG_RULES_CSV");
        if schemes_csv.is_some() != rules_csv.is_some() {
            return Err(ConfigError::IncompleteCatalogPaths);
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            recommendations: RecommendationSettings {
                max_results,
                schemes_csv,
                rules_csv,
                profiles_json: non_empty_path("APP_PROFILES_JSON"),
            },
        })
    }
}

fn non_empty_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn parse_limit(value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(limit) if (1..=MAX_PAGE_SIZE).contains(&limit) => Ok(limit),
        _ => Err(ConfigError::InvalidRecommendationLimit {
            value: value.to_string(),
        }),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing output controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat {
                value: value.to_string(),
            }),
        }
    }
}

/// Catalog sources and result sizing for the recommendation engine.
#[derive(Debug, Clone)]
pub struct RecommendationSettings {
    pub max_results: usize,
    /// Scheme and rule exports are loaded together; when absent the standard catalog is used.
    pub schemes_csv: Option<PathBuf>,
    pub rules_csv: Option<PathBuf>,
    pub profiles_json: Option<PathBuf>,
}

impl RecommendationSettings {
    pub fn ranking(&self) -> RankingConfig {
        RankingConfig::default().with_max_results(self.max_results)
    }

    pub fn catalog_paths(&self) -> Option<(&PathBuf, &PathBuf)> {
        self.schemes_csv.as_ref().zip(self.rules_csv.as_ref())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat { value: String },
    InvalidRecommendationLimit { value: String },
    IncompleteCatalogPaths,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat { value } => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json', found '{}'", value)
            }
            ConfigError::InvalidRecommendationLimit { value } => write!(
                f,
                "APP_RECOMMENDATION_LIMIT must be between 1 and {}, found '{}'",
                MAX_PAGE_SIZE, value
            ),
            ConfigError::IncompleteCatalogPaths => write!(
                f,
                "APP_CATALOG_SCHEMES_CSV and APP_CATALOG_RULES_CSV must be set together"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
