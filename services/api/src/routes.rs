use crate::infra::{AppState, CatalogSource};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

use scheme_recommender::error::AppError;
use scheme_recommender::workflows::catalog::CatalogImporter;
use scheme_recommender::workflows::recommendations::{
    recommendation_router, EligibilityMatcher, EligibilityReport, Profile, ProfileStore,
    RecommendationEngine, SchemeCatalog, SchemeRanker, ScoredScheme,
};

/// Ad-hoc evaluation against a catalog export supplied in the request body.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogEvaluationRequest {
    pub(crate) schemes_csv: String,
    pub(crate) rules_csv: String,
    pub(crate) profile: Profile,
    #[serde(default)]
    pub(crate) explain: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CatalogEvaluationResponse {
    pub(crate) data_source: CatalogSource,
    pub(crate) scheme_count: usize,
    pub(crate) rule_count: usize,
    pub(crate) recommendations: Vec<ScoredScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reports: Option<Vec<EligibilityReport>>,
}

pub(crate) fn with_recommendation_routes<P, C>(
    engine: Arc<RecommendationEngine<P, C>>,
) -> axum::Router
where
    P: ProfileStore + 'static,
    C: SchemeCatalog + 'static,
{
    recommendation_router(engine)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/catalog/evaluate",
            axum::routing::post(catalog_evaluation_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn catalog_evaluation_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<CatalogEvaluationRequest>,
) -> Result<Json<CatalogEvaluationResponse>, AppError> {
    let CatalogEvaluationRequest {
        schemes_csv,
        rules_csv,
        profile,
        explain,
    } = payload;

    let catalog = CatalogImporter::from_readers(
        Cursor::new(schemes_csv.into_bytes()),
        Cursor::new(rules_csv.into_bytes()),
    )?;

    let scheme_count = catalog.len();
    let rule_count = catalog.rule_count();
    let matcher = EligibilityMatcher::new(Arc::new(catalog));

    let eligible = matcher.filter_eligible_schemes(&profile)?;
    let recommendations = SchemeRanker::new(state.ranking.clone()).rank_schemes(&profile, eligible);

    let reports = if explain {
        let reports = matcher
            .catalog()
            .list_active_schemes()?
            .iter()
            .map(|scheme| matcher.explain(&profile, scheme))
            .collect::<Result<Vec<_>, _>>()?;
        Some(reports)
    } else {
        None
    };

    Ok(Json(CatalogEvaluationResponse {
        data_source: CatalogSource::Imported,
        scheme_count,
        rule_count,
        recommendations,
        reports,
    }))
}
