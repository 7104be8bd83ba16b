use crate::cli::ServeArgs;
use crate::infra::{load_catalog, load_profiles, AppState};
use crate::routes::with_recommendation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use scheme_recommender::config::AppConfig;
use scheme_recommender::error::AppError;
use scheme_recommender::telemetry;
use scheme_recommender::workflows::recommendations::RecommendationEngine;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let ranking = config.recommendations.ranking();
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        ranking: ranking.clone(),
    };

    let (catalog, source) = load_catalog(&config.recommendations)?;
    let profiles = load_profiles(config.recommendations.profiles_json.as_deref())?;
    info!(
        source = source.label(),
        schemes = catalog.len(),
        rules = catalog.rule_count(),
        users = profiles.len(),
        "recommendation data loaded"
    );

    let engine = Arc::new(RecommendationEngine::new(
        Arc::new(profiles),
        Arc::new(catalog),
        ranking,
    ));

    let app = with_recommendation_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "scheme recommendation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
