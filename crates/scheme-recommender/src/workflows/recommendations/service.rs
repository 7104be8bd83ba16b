use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::browse::{InvalidQuery, SchemePage, SchemeQuery};
use super::domain::{EligibilityRule, Language, Profile, Scheme, UserId};
use super::eligibility::{EligibilityMatcher, EligibilityReport};
use super::ranking::{RankingConfig, SchemeRanker, ScoredScheme};
use super::repository::{ProfileStore, RepositoryError, SchemeCatalog};

/// Engine composing the profile store, eligibility matcher, and ranker.
pub struct RecommendationEngine<P, C> {
    profiles: Arc<P>,
    matcher: EligibilityMatcher<C>,
    ranker: SchemeRanker,
}

impl<P, C> RecommendationEngine<P, C>
where
    P: ProfileStore + 'static,
    C: SchemeCatalog + 'static,
{
    pub fn new(profiles: Arc<P>, catalog: Arc<C>, config: RankingConfig) -> Self {
        Self {
            profiles,
            matcher: EligibilityMatcher::new(catalog),
            ranker: SchemeRanker::new(config),
        }
    }

    pub fn matcher(&self) -> &EligibilityMatcher<C> {
        &self.matcher
    }

    pub fn ranker(&self) -> &SchemeRanker {
        &self.ranker
    }

    /// Ranked recommendations for a stored user.
    ///
    /// Unknown users and users without a profile yield an empty list. Collaborator failures are
    /// returned unchanged.
    pub fn generate_recommendations(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ScoredScheme>, RecommendationError> {
        let Some(record) = self.profiles.get_user_with_profile(user_id)? else {
            debug!(%user_id, "unknown user; no recommendations");
            return Ok(Vec::new());
        };

        let Some(profile) = record.profile else {
            debug!(%user_id, "user has no profile yet; no recommendations");
            return Ok(Vec::new());
        };

        let recommendations = self.recommend_for_profile(&profile)?;
        info!(
            %user_id,
            recommendations = recommendations.len(),
            "generated scheme recommendations"
        );
        Ok(recommendations)
    }

    /// Filter then rank the active catalog for an ad-hoc profile.
    pub fn recommend_for_profile(
        &self,
        profile: &Profile,
    ) -> Result<Vec<ScoredScheme>, RecommendationError> {
        let eligible = self.matcher.filter_eligible_schemes(profile)?;
        let eligible_count = eligible.len();
        let ranked = self.ranker.rank_schemes(profile, eligible);

        debug!(
            eligible = eligible_count,
            returned = ranked.len(),
            top_score = ?ranked.first().map(|entry| entry.score),
            "ranked eligible schemes"
        );
        Ok(ranked)
    }

    /// Rule-by-rule eligibility trail for one active scheme.
    pub fn explain_eligibility(
        &self,
        user_id: &UserId,
        scheme_code: &str,
    ) -> Result<EligibilityReport, RecommendationError> {
        let record = self
            .profiles
            .get_user_with_profile(user_id)?
            .ok_or(RecommendationError::UserNotFound(*user_id))?;
        let profile = record
            .profile
            .ok_or(RecommendationError::ProfileMissing(*user_id))?;
        let scheme = self.find_active_scheme(scheme_code)?;

        Ok(self.matcher.explain(&profile, &scheme)?)
    }

    pub fn browse_schemes(&self, query: &SchemeQuery) -> Result<SchemePage, RecommendationError> {
        let schemes = self.matcher.catalog().list_active_schemes()?;
        Ok(query.apply(schemes)?)
    }

    /// Distinct, sorted categories across the active catalog.
    pub fn scheme_categories(&self) -> Result<Vec<String>, RecommendationError> {
        let categories: BTreeSet<String> = self
            .matcher
            .catalog()
            .list_active_schemes()?
            .into_iter()
            .filter_map(|scheme| scheme.category)
            .filter(|category| !category.trim().is_empty())
            .collect();
        Ok(categories.into_iter().collect())
    }

    /// Active scheme with its rules, its text resolved in `language` where translated.
    pub fn scheme_detail(
        &self,
        scheme_code: &str,
        language: Language,
    ) -> Result<SchemeDetail, RecommendationError> {
        let scheme = self.find_active_scheme(scheme_code)?;
        let rules = self.matcher.catalog().list_rules_for_scheme(&scheme.id)?;
        Ok(SchemeDetail {
            language,
            display_name: scheme.localized_name(language).to_string(),
            display_description: scheme.localized_description(language).map(str::to_string),
            scheme,
            rules,
        })
    }

    fn find_active_scheme(&self, scheme_code: &str) -> Result<Scheme, RecommendationError> {
        self.matcher
            .catalog()
            .list_active_schemes()?
            .into_iter()
            .find(|scheme| scheme.scheme_code.eq_ignore_ascii_case(scheme_code))
            .ok_or_else(|| RecommendationError::SchemeNotFound(scheme_code.to_string()))
    }
}

/// Active scheme together with the rules that gate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeDetail {
    pub scheme: Scheme,
    pub rules: Vec<EligibilityRule>,
    pub language: Language,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_description: Option<String>,
}

/// Error raised by the recommendation engine.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    InvalidQuery(#[from] InvalidQuery),
    #[error("user {0} not found")]
    UserNotFound(UserId),
    #[error("user {0} has not completed a profile")]
    ProfileMissing(UserId),
    #[error("scheme '{0}' is not in the active catalog")]
    SchemeNotFound(String),
}
