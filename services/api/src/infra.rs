use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

use scheme_recommender::config::RecommendationSettings;
use scheme_recommender::error::AppError;
use scheme_recommender::workflows::catalog::{CatalogImporter, CatalogSnapshot};
use scheme_recommender::workflows::recommendations::{
    Profile, ProfileStore, RankingConfig, RepositoryError, UserId, UserRecord,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) ranking: RankingConfig,
}

/// Where the serving catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CatalogSource {
    Imported,
    Standard,
}

impl CatalogSource {
    pub(crate) fn label(self) -> &'static str {
        match self {
            CatalogSource::Imported => "imported CSV export",
            CatalogSource::Standard => "standard seed catalog",
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileStore {
    records: Arc<RwLock<HashMap<UserId, UserRecord>>>,
}

impl InMemoryProfileStore {
    pub(crate) fn from_records(records: Vec<UserRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.user.id, record))
            .collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.records.read().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn get_user_with_profile(&self, user_id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        let guard = self
            .records
            .read()
            .map_err(|_| RepositoryError::Unavailable("profile store lock poisoned".to_string()))?;
        Ok(guard.get(user_id).cloned())
    }
}

/// Catalog named by the settings, or the standard seed when no export is configured.
pub(crate) fn load_catalog(
    settings: &RecommendationSettings,
) -> Result<(CatalogSnapshot, CatalogSource), AppError> {
    match settings.catalog_paths() {
        Some((schemes, rules)) => {
            let catalog = CatalogImporter::from_paths(schemes, rules)?;
            info!(
                schemes = %schemes.display(),
                rules = %rules.display(),
                "loaded scheme catalog export"
            );
            Ok((catalog, CatalogSource::Imported))
        }
        None => Ok((CatalogSnapshot::standard(), CatalogSource::Standard)),
    }
}

pub(crate) fn load_profiles(path: Option<&Path>) -> Result<InMemoryProfileStore, AppError> {
    let Some(path) = path else {
        return Ok(InMemoryProfileStore::default());
    };

    let raw = std::fs::read_to_string(path)?;
    let records: Vec<UserRecord> = serde_json::from_str(&raw)?;
    info!(users = records.len(), path = %path.display(), "preloaded citizen profiles");
    Ok(InMemoryProfileStore::from_records(records))
}

pub(crate) fn read_profile(path: &Path) -> Result<Profile, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
