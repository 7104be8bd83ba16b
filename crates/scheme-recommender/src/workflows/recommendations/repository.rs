use serde::{Deserialize, Serialize};

use super::domain::{EligibilityRule, Profile, Scheme, SchemeId, User, UserId};

/// Stored user alongside the profile captured during onboarding, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user: User,
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl UserRecord {
    pub fn new(user: User, profile: Option<Profile>) -> Self {
        Self { user, profile }
    }
}

/// Read access to citizens and their profiles.
pub trait ProfileStore: Send + Sync {
    fn get_user_with_profile(&self, user_id: &UserId) -> Result<Option<UserRecord>, RepositoryError>;
}

/// Read access to the scheme catalog and the rules attached to each scheme.
pub trait SchemeCatalog: Send + Sync {
    /// Active schemes in catalog order.
    fn list_active_schemes(&self) -> Result<Vec<Scheme>, RepositoryError>;
    fn list_rules_for_scheme(
        &self,
        scheme_id: &SchemeId,
    ) -> Result<Vec<EligibilityRule>, RepositoryError>;
}

/// Error enumeration for collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
