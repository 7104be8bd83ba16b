use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::workflows::catalog::CatalogSnapshot;
use crate::workflows::recommendations::domain::{
    EligibilityRule, Profile, RuleOperator, RuleType, Scheme, SchemeId, User, UserId,
};
use crate::workflows::recommendations::repository::{
    ProfileStore, RepositoryError, SchemeCatalog, UserRecord,
};
use crate::workflows::recommendations::{
    recommendation_router, RankingConfig, RecommendationEngine,
};

pub(super) fn elderly_bpl_profile() -> Profile {
    Profile {
        full_name: Some("Ramesh Prasad".to_string()),
        age: Some(65),
        is_bpl: Some(true),
        state: Some("Bihar".to_string()),
        ..Profile::default()
    }
}

pub(super) fn farmer_profile(land_acres: Option<Decimal>) -> Profile {
    Profile {
        full_name: Some("Lakshmi Naik".to_string()),
        age: Some(38),
        occupation: Some("Farmer".to_string()),
        state: Some("Karnataka".to_string()),
        annual_income: Some(Decimal::from(90_000)),
        land_ownership: land_acres,
        ..Profile::default()
    }
}

pub(super) fn central_scheme(code: &str, category: &str, benefit: i64) -> Scheme {
    let mut scheme = Scheme::new(code, format!("{code} programme"));
    scheme.category = Some(category.to_string());
    scheme.benefit_amount = Some(Decimal::from(benefit));
    scheme.is_central = true;
    scheme
}

pub(super) fn state_scheme(code: &str, state: &str, benefit: i64) -> Scheme {
    let mut scheme = Scheme::new(code, format!("{code} programme"));
    scheme.category = Some("State Welfare".to_string());
    scheme.benefit_amount = Some(Decimal::from(benefit));
    scheme.state = Some(state.to_string());
    scheme
}

pub(super) fn pension_rules() -> Vec<EligibilityRule> {
    let scheme_id = SchemeId::from_code("NSAP-OAP");
    vec![
        EligibilityRule::new(scheme_id, RuleType::Age, RuleOperator::GreaterOrEqual)
            .with_min(Decimal::from(60)),
        EligibilityRule::new(scheme_id, RuleType::IsBpl, RuleOperator::Equal)
            .with_min(Decimal::ONE),
    ]
}

pub(super) fn rule(rule_type: RuleType, operator: RuleOperator) -> EligibilityRule {
    EligibilityRule::new(SchemeId::from_code("TEST"), rule_type, operator)
}

pub(super) fn catalog_with(schemes: Vec<(Scheme, Vec<EligibilityRule>)>) -> CatalogSnapshot {
    let mut catalog = CatalogSnapshot::new();
    for (scheme, rules) in schemes {
        let scheme_id = scheme.id;
        catalog.insert_scheme(scheme).expect("unique scheme code");
        for mut rule in rules {
            rule.scheme_id = scheme_id;
            catalog.add_rule(rule).expect("scheme registered");
        }
    }
    catalog
}

pub(super) fn user(profile: Option<Profile>) -> UserRecord {
    UserRecord::new(
        User {
            id: UserId::new(),
            phone_number: "+919800000000".to_string(),
            is_active: true,
        },
        profile,
    )
}

pub(super) fn build_engine(
    profiles: MemoryProfiles,
    catalog: CatalogSnapshot,
) -> RecommendationEngine<MemoryProfiles, CatalogSnapshot> {
    RecommendationEngine::new(
        Arc::new(profiles),
        Arc::new(catalog),
        RankingConfig::default(),
    )
}

pub(super) fn standard_engine_with(
    records: Vec<UserRecord>,
) -> RecommendationEngine<MemoryProfiles, CatalogSnapshot> {
    let profiles = MemoryProfiles::default();
    for record in records {
        profiles.insert(record);
    }
    build_engine(profiles, CatalogSnapshot::standard())
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    records: Arc<Mutex<HashMap<UserId, UserRecord>>>,
}

impl MemoryProfiles {
    pub(super) fn insert(&self, record: UserRecord) {
        self.records
            .lock()
            .expect("profile mutex poisoned")
            .insert(record.user.id, record);
    }
}

impl ProfileStore for MemoryProfiles {
    fn get_user_with_profile(&self, user_id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }
}

pub(super) struct UnavailableProfiles;

impl ProfileStore for UnavailableProfiles {
    fn get_user_with_profile(&self, _user_id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("profile store offline".to_string()))
    }
}

pub(super) struct UnavailableCatalog;

impl SchemeCatalog for UnavailableCatalog {
    fn list_active_schemes(&self) -> Result<Vec<Scheme>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }

    fn list_rules_for_scheme(
        &self,
        _scheme_id: &SchemeId,
    ) -> Result<Vec<EligibilityRule>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }
}

pub(super) fn router_with(
    engine: RecommendationEngine<MemoryProfiles, CatalogSnapshot>,
) -> axum::Router {
    recommendation_router(Arc::new(engine))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
