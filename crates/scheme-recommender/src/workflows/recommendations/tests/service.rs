use super::common::*;
use std::sync::Arc;

use crate::workflows::catalog::CatalogSnapshot;
use crate::workflows::recommendations::domain::{Language, Profile, UserId};
use crate::workflows::recommendations::repository::RepositoryError;
use crate::workflows::recommendations::{
    InvalidQuery, RankingConfig, RecommendationEngine, RecommendationError, SchemeQuery,
};

#[test]
fn unknown_users_and_missing_profiles_yield_no_recommendations() {
    let pending = user(None);
    let pending_id = pending.user.id;
    let engine = standard_engine_with(vec![pending]);

    assert!(engine
        .generate_recommendations(&UserId::new())
        .expect("lookup succeeds")
        .is_empty());
    assert!(engine
        .generate_recommendations(&pending_id)
        .expect("lookup succeeds")
        .is_empty());
}

#[test]
fn elderly_bpl_citizen_receives_ranked_central_schemes() {
    let record = user(Some(elderly_bpl_profile()));
    let user_id = record.user.id;
    let engine = standard_engine_with(vec![record]);

    let recommendations = engine
        .generate_recommendations(&user_id)
        .expect("recommendations generated");
    let codes: Vec<&str> = recommendations
        .iter()
        .map(|entry| entry.scheme.scheme_code.as_str())
        .collect();

    assert_eq!(codes, vec!["PMAY-G", "MGNREGA", "NSAP-OAP", "PMJDY"]);
    assert_eq!(recommendations[0].score, 60.0);
    assert_eq!(recommendations[3].score, 30.0);
}

#[test]
fn repeated_calls_return_identical_results() {
    let record = user(Some(farmer_profile(Some(rust_decimal::Decimal::ONE))));
    let user_id = record.user.id;
    let engine = standard_engine_with(vec![record]);

    let first = engine.generate_recommendations(&user_id).expect("first run");
    let second = engine.generate_recommendations(&user_id).expect("second run");
    assert_eq!(first, second);
    assert!(first.iter().any(|entry| entry.scheme.scheme_code == "PM-KISAN"));
}

#[test]
fn collaborator_failures_propagate_unchanged() {
    let engine = RecommendationEngine::new(
        Arc::new(UnavailableProfiles),
        Arc::new(CatalogSnapshot::standard()),
        RankingConfig::default(),
    );
    let error = engine
        .generate_recommendations(&UserId::new())
        .expect_err("profile store offline");
    assert!(matches!(
        error,
        RecommendationError::Repository(RepositoryError::Unavailable(ref message))
            if message == "profile store offline"
    ));

    let profiles = MemoryProfiles::default();
    let record = user(Some(elderly_bpl_profile()));
    let user_id = record.user.id;
    profiles.insert(record);
    let engine = RecommendationEngine::new(
        Arc::new(profiles),
        Arc::new(UnavailableCatalog),
        RankingConfig::default(),
    );
    assert!(matches!(
        engine.generate_recommendations(&user_id),
        Err(RecommendationError::Repository(RepositoryError::Unavailable(_)))
    ));
    assert!(matches!(
        engine.scheme_categories(),
        Err(RecommendationError::Repository(_))
    ));
}

#[test]
fn explain_eligibility_reports_each_rule() {
    let record = user(Some(elderly_bpl_profile()));
    let user_id = record.user.id;
    let engine = standard_engine_with(vec![record]);

    let report = engine
        .explain_eligibility(&user_id, "nsap-oap")
        .expect("report built");
    assert_eq!(report.scheme_code, "NSAP-OAP");
    assert!(report.eligible);
    assert_eq!(report.checks.len(), 2);

    let report = engine
        .explain_eligibility(&user_id, "PM-KISAN")
        .expect("report built");
    assert!(!report.eligible);
    assert_eq!(report.failed_mandatory().count(), 2);
}

#[test]
fn explain_eligibility_distinguishes_lookup_failures() {
    let pending = user(None);
    let pending_id = pending.user.id;
    let known = user(Some(elderly_bpl_profile()));
    let known_id = known.user.id;
    let engine = standard_engine_with(vec![pending, known]);

    assert!(matches!(
        engine.explain_eligibility(&UserId::new(), "PMJDY"),
        Err(RecommendationError::UserNotFound(_))
    ));
    assert!(matches!(
        engine.explain_eligibility(&pending_id, "PMJDY"),
        Err(RecommendationError::ProfileMissing(id)) if id == pending_id
    ));
    assert!(matches!(
        engine.explain_eligibility(&known_id, "UNKNOWN"),
        Err(RecommendationError::SchemeNotFound(code)) if code == "UNKNOWN"
    ));
}

#[test]
fn browse_categories_and_detail_read_the_active_catalog() {
    let engine = standard_engine_with(Vec::new());

    let page = engine
        .browse_schemes(&SchemeQuery {
            search: Some("rural".to_string()),
            ..SchemeQuery::default()
        })
        .expect("valid query");
    let codes: Vec<&str> = page
        .schemes
        .iter()
        .map(|scheme| scheme.scheme_code.as_str())
        .collect();
    assert_eq!(codes, vec!["PMAY-G", "MGNREGA"]);

    assert!(matches!(
        engine.browse_schemes(&SchemeQuery {
            limit: Some(500),
            ..SchemeQuery::default()
        }),
        Err(RecommendationError::InvalidQuery(InvalidQuery::Limit(500)))
    ));

    assert_eq!(
        engine.scheme_categories().expect("categories"),
        vec![
            "Agriculture",
            "Employment",
            "Financial Inclusion",
            "Housing",
            "Social Security"
        ]
    );

    let detail = engine
        .scheme_detail("PM-KISAN", Language::En)
        .expect("scheme exists");
    assert_eq!(detail.scheme.name, "Pradhan Mantri Kisan Samman Nidhi");
    assert_eq!(detail.display_name, "Pradhan Mantri Kisan Samman Nidhi");
    assert_eq!(detail.rules.len(), 2);

    let detail = engine
        .scheme_detail("pm-kisan", Language::Hi)
        .expect("scheme exists");
    assert_eq!(detail.display_name, "प्रधानमंत्री किसान सम्मान निधि");
    assert_eq!(detail.language, Language::Hi);
    assert!(matches!(
        engine.scheme_detail("GHOST", Language::En),
        Err(RecommendationError::SchemeNotFound(_))
    ));
}

#[test]
fn recommendations_use_the_citizen_language_with_english_fallback() {
    let hindi = user(Some(Profile {
        preferred_language: Some("hi".to_string()),
        ..elderly_bpl_profile()
    }));
    let marathi = user(Some(Profile {
        preferred_language: Some("mr".to_string()),
        ..elderly_bpl_profile()
    }));
    let (hindi_id, marathi_id) = (hindi.user.id, marathi.user.id);
    let engine = standard_engine_with(vec![hindi, marathi]);

    let pension = |id: &UserId| {
        engine
            .generate_recommendations(id)
            .expect("recommendations")
            .into_iter()
            .find(|entry| entry.scheme.scheme_code == "NSAP-OAP")
            .expect("pension recommended")
    };

    let localized = pension(&hindi_id);
    assert_eq!(
        localized.display_name,
        "राष्ट्रीय सामाजिक सहायता कार्यक्रम - वृद्धावस्था पेंशन"
    );
    assert_eq!(
        localized.display_description.as_deref(),
        Some("गरीबी रेखा से नीचे के बुजुर्ग नागरिकों के लिए मासिक पेंशन")
    );

    let fallback = pension(&marathi_id);
    assert_eq!(fallback.language, Language::Mr);
    assert_eq!(
        fallback.display_name,
        "National Social Assistance Programme - Old Age Pension"
    );
}
