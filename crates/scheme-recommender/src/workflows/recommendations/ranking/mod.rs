mod components;
mod config;

pub use config::RankingConfig;

use serde::{Deserialize, Serialize};

use super::domain::{Language, Profile, Scheme};

/// Stateless scorer that orders eligible schemes by relevance to a profile.
#[derive(Debug, Clone, Default)]
pub struct SchemeRanker {
    config: RankingConfig,
}

impl SchemeRanker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn score(&self, profile: &Profile, scheme: Scheme) -> ScoredScheme {
        let (components, score) = components::score_scheme(profile, &scheme, &self.config);
        let language = profile.language();
        ScoredScheme {
            display_name: scheme.localized_name(language).to_string(),
            display_description: scheme.localized_description(language).map(str::to_string),
            language,
            scheme,
            score,
            components,
        }
    }

    /// Highest scoring schemes first, at most `max_results` of them. Equal scores keep their
    /// input order.
    pub fn rank_schemes(&self, profile: &Profile, eligible: Vec<Scheme>) -> Vec<ScoredScheme> {
        let mut ranked: Vec<ScoredScheme> = eligible
            .into_iter()
            .map(|scheme| self.score(profile, scheme))
            .collect();

        ranked.sort_by(|left, right| right.score.total_cmp(&left.score));
        ranked.truncate(self.config.max_results);
        ranked
    }
}

/// Relevance signal contributing to a scheme's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    BenefitAmount,
    Location,
    Category,
    IncomeRatio,
    Recency,
}

/// Discrete contribution to a score, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: f64,
    pub notes: String,
}

/// Eligible scheme paired with its relevance score in `[0, 100]`.
///
/// `display_name` and `display_description` are the scheme text in the profile's preferred
/// language, falling back to English.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredScheme {
    pub scheme: Scheme,
    pub score: f64,
    #[serde(default)]
    pub components: Vec<ScoreComponent>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_description: Option<String>,
}

impl ScoredScheme {
    pub fn points_for(&self, factor: ScoreFactor) -> f64 {
        self.components
            .iter()
            .filter(|component| component.factor == factor)
            .map(|component| component.points)
            .sum()
    }

    /// Short rationale built from the components that added points.
    pub fn explanation(&self) -> String {
        let reasons: Vec<&str> = self
            .components
            .iter()
            .filter(|component| component.points > 0.0 && component.factor != ScoreFactor::Recency)
            .map(|component| component.notes.as_str())
            .collect();

        let name = if self.display_name.is_empty() {
            self.scheme.name.as_str()
        } else {
            self.display_name.as_str()
        };

        if reasons.is_empty() {
            format!("{} matches your profile", name)
        } else {
            format!("{}: {}", name, reasons.join("; "))
        }
    }
}
