use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use tower::ServiceExt;

use scheme_recommender::workflows::catalog::{CatalogImporter, CatalogSnapshot};
use scheme_recommender::workflows::recommendations::{
    recommendation_router, Profile, ProfileStore, RankingConfig, RecommendationEngine,
    RecommendationListView, RepositoryError, ScoreFactor, User, UserId, UserRecord,
};

#[derive(Default)]
struct FixtureProfiles {
    records: HashMap<UserId, UserRecord>,
}

impl FixtureProfiles {
    fn with(mut self, profile: Profile) -> (Self, UserId) {
        let user = User {
            id: UserId::new(),
            phone_number: "+919811111111".to_string(),
            is_active: true,
        };
        let user_id = user.id;
        self.records
            .insert(user_id, UserRecord::new(user, Some(profile)));
        (self, user_id)
    }
}

impl ProfileStore for FixtureProfiles {
    fn get_user_with_profile(&self, user_id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self.records.get(user_id).cloned())
    }
}

fn bundled_catalog() -> CatalogSnapshot {
    let schemes = include_bytes!("../data/schemes.csv");
    let rules = include_bytes!("../data/rules.csv");
    CatalogImporter::from_readers(&schemes[..], &rules[..]).expect("bundled catalog imports")
}

fn engine(profiles: FixtureProfiles) -> RecommendationEngine<FixtureProfiles, CatalogSnapshot> {
    RecommendationEngine::new(
        Arc::new(profiles),
        Arc::new(bundled_catalog()),
        RankingConfig::default(),
    )
}

fn codes(view: &[scheme_recommender::workflows::recommendations::ScoredScheme]) -> Vec<&str> {
    view.iter()
        .map(|entry| entry.scheme.scheme_code.as_str())
        .collect()
}

#[test]
fn odisha_smallholder_sees_home_state_scheme_first() {
    let (profiles, user_id) = FixtureProfiles::default().with(Profile {
        age: Some(40),
        state: Some("Odisha".to_string()),
        occupation: Some("Farmer".to_string()),
        annual_income: Some(Decimal::from(80_000)),
        land_ownership: Some(Decimal::ONE),
        is_bpl: Some(false),
        ..Profile::default()
    });

    let recommendations = engine(profiles)
        .generate_recommendations(&user_id)
        .expect("recommendations generated");

    assert_eq!(
        codes(&recommendations),
        vec!["OD-KALIA", "MGNREGA", "PM-KISAN", "PMJDY"]
    );
    assert_eq!(
        recommendations[0].points_for(ScoreFactor::Location),
        25.0
    );
}

#[test]
fn disabled_bpl_citizen_gets_targeted_pension_near_the_top() {
    let (profiles, user_id) = FixtureProfiles::default().with(Profile {
        age: Some(45),
        is_bpl: Some(true),
        has_disability: Some(true),
        state: Some("Uttar Pradesh".to_string()),
        annual_income: Some(Decimal::from(30_000)),
        ..Profile::default()
    });

    let recommendations = engine(profiles)
        .generate_recommendations(&user_id)
        .expect("recommendations generated");

    assert_eq!(
        codes(&recommendations),
        vec!["PMAY-G", "NSAP-DPS", "MGNREGA", "PMJDY"]
    );
    assert_eq!(recommendations[0].score, 75.0);
    assert_eq!(
        recommendations[1].points_for(ScoreFactor::Category),
        40.0
    );
}

#[test]
fn optional_rules_never_exclude_a_scheme() {
    let (profiles, user_id) = FixtureProfiles::default().with(Profile {
        age: Some(22),
        state: Some("Bihar".to_string()),
        education_level: Some("Primary".to_string()),
        ..Profile::default()
    });
    let engine = engine(profiles);

    let recommendations = engine
        .generate_recommendations(&user_id)
        .expect("recommendations generated");
    assert!(codes(&recommendations).contains(&"BR-KUSHAL"));

    let report = engine
        .explain_eligibility(&user_id, "BR-KUSHAL")
        .expect("report built");
    assert!(report.eligible);
    assert_eq!(report.checks.iter().filter(|check| !check.passed).count(), 1);
    assert_eq!(report.failed_mandatory().count(), 0);
}

#[tokio::test]
async fn recommendation_route_serves_ranked_view() {
    let (profiles, user_id) = FixtureProfiles::default().with(Profile {
        age: Some(67),
        is_bpl: Some(true),
        ..Profile::default()
    });
    let router = recommendation_router(Arc::new(engine(profiles)));

    let response = router
        .oneshot(
            Request::get(format!("/api/v1/recommendations/{user_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let view: RecommendationListView = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(view.user_id, Some(user_id));
    assert_eq!(view.count, view.recommendations.len());
    assert!(codes(&view.recommendations).contains(&"NSAP-OAP"));
    assert!(view
        .recommendations
        .windows(2)
        .all(|pair| pair[0].score >= pair[1].score));
}
