//! Scheme recommendation pipeline: eligibility filtering, relevance ranking, and the engine that
//! ties both to the profile store and scheme catalog collaborators.
//!
//! The matcher and ranker are independent leaves. [`RecommendationEngine`] loads a profile,
//! filters the active catalog, and ranks the survivors; it holds no state between calls.

pub mod browse;
pub mod domain;
pub mod eligibility;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use browse::{InvalidQuery, SchemePage, SchemeQuery};
pub use domain::{
    EligibilityRule, Language, Profile, RuleOperator, RuleType, Scheme, SchemeId,
    SchemeTranslation, UnknownRuleType, User, UserId,
};
pub use eligibility::{
    evaluate_rule, is_eligible, EligibilityMatcher, EligibilityReport, RuleCheck,
};
pub use ranking::{RankingConfig, SchemeRanker, ScoreComponent, ScoreFactor, ScoredScheme};
pub use repository::{ProfileStore, RepositoryError, SchemeCatalog, UserRecord};
pub use router::{recommendation_router, RecommendationListView};
pub use service::{RecommendationEngine, RecommendationError, SchemeDetail};
