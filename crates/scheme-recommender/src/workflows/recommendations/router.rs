use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::browse::SchemeQuery;
use super::domain::{Language, Profile, UserId};
use super::ranking::ScoredScheme;
use super::repository::{ProfileStore, RepositoryError, SchemeCatalog};
use super::service::{RecommendationEngine, RecommendationError};

/// Router builder exposing recommendation and catalog browsing endpoints.
pub fn recommendation_router<P, C>(engine: Arc<RecommendationEngine<P, C>>) -> Router
where
    P: ProfileStore + 'static,
    C: SchemeCatalog + 'static,
{
    Router::new()
        .route(
            "/api/v1/recommendations/preview",
            post(preview_handler::<P, C>),
        )
        .route(
            "/api/v1/recommendations/:user_id",
            get(recommendations_handler::<P, C>),
        )
        .route(
            "/api/v1/recommendations/:user_id/eligibility/:scheme_code",
            get(eligibility_handler::<P, C>),
        )
        .route("/api/v1/schemes", get(schemes_handler::<P, C>))
        .route(
            "/api/v1/schemes/categories",
            get(categories_handler::<P, C>),
        )
        .route(
            "/api/v1/schemes/:scheme_code",
            get(scheme_detail_handler::<P, C>),
        )
        .with_state(engine)
}

/// Response body for recommendation listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationListView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub language: Language,
    pub count: usize,
    pub recommendations: Vec<ScoredScheme>,
}

impl RecommendationListView {
    pub fn new(
        user_id: Option<UserId>,
        language: Language,
        recommendations: Vec<ScoredScheme>,
    ) -> Self {
        Self {
            user_id,
            generated_at: Utc::now(),
            language,
            count: recommendations.len(),
            recommendations,
        }
    }
}

pub(crate) async fn recommendations_handler<P, C>(
    State(engine): State<Arc<RecommendationEngine<P, C>>>,
    Path(user_id): Path<UserId>,
) -> Response
where
    P: ProfileStore + 'static,
    C: SchemeCatalog + 'static,
{
    match engine.generate_recommendations(&user_id) {
        Ok(recommendations) => {
            let language = recommendations
                .first()
                .map(|entry| entry.language)
                .unwrap_or_default();
            let view = RecommendationListView::new(Some(user_id), language, recommendations);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<P, C>(
    State(engine): State<Arc<RecommendationEngine<P, C>>>,
    axum::Json(profile): axum::Json<Profile>,
) -> Response
where
    P: ProfileStore + 'static,
    C: SchemeCatalog + 'static,
{
    match engine.recommend_for_profile(&profile) {
        Ok(recommendations) => {
            let view = RecommendationListView::new(None, profile.language(), recommendations);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_handler<P, C>(
    State(engine): State<Arc<RecommendationEngine<P, C>>>,
    Path((user_id, scheme_code)): Path<(UserId, String)>,
) -> Response
where
    P: ProfileStore + 'static,
    C: SchemeCatalog + 'static,
{
    match engine.explain_eligibility(&user_id, &scheme_code) {
        Ok(report) => {
            let summary = report.summary();
            let payload = json!({
                "summary": summary,
                "report": report,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn schemes_handler<P, C>(
    State(engine): State<Arc<RecommendationEngine<P, C>>>,
    Query(query): Query<SchemeQuery>,
) -> Response
where
    P: ProfileStore + 'static,
    C: SchemeCatalog + 'static,
{
    match engine.browse_schemes(&query) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn categories_handler<P, C>(
    State(engine): State<Arc<RecommendationEngine<P, C>>>,
) -> Response
where
    P: ProfileStore + 'static,
    C: SchemeCatalog + 'static,
{
    match engine.scheme_categories() {
        Ok(categories) => {
            (StatusCode::OK, axum::Json(json!({ "categories": categories }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

/// Optional `?lang=` selector for catalog text.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct LanguageQuery {
    lang: Option<String>,
}

pub(crate) async fn scheme_detail_handler<P, C>(
    State(engine): State<Arc<RecommendationEngine<P, C>>>,
    Path(scheme_code): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Response
where
    P: ProfileStore + 'static,
    C: SchemeCatalog + 'static,
{
    let language = query
        .lang
        .as_deref()
        .map(Language::from_code)
        .unwrap_or_default();

    match engine.scheme_detail(&scheme_code, language) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: RecommendationError) -> Response {
    let status = match &error {
        RecommendationError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        RecommendationError::Repository(RepositoryError::NotFound)
        | RecommendationError::UserNotFound(_)
        | RecommendationError::SchemeNotFound(_) => StatusCode::NOT_FOUND,
        RecommendationError::ProfileMissing(_) => StatusCode::CONFLICT,
        RecommendationError::InvalidQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };

    if status.is_server_error() {
        warn!(%error, "recommendation request failed");
    }

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
