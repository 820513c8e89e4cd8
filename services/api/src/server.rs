use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySubmissionRepository};
use crate::routes::with_ops_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use screening_chat::config::AppConfig;
use screening_chat::error::AppError;
use screening_chat::telemetry;
use screening_chat::workflows::screening::{
    QuestionCatalog, ScreeningService, TextGenerationGateway,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = TextGenerationGateway::from_config(&config.generation)?;
    if !gateway.is_online() {
        warn!("no completion API key configured, conversations use canned phrasing");
    }

    let service = Arc::new(ScreeningService::new(
        Arc::new(QuestionCatalog::standard()),
        Arc::new(gateway),
        Arc::new(InMemorySubmissionRepository::default()),
    ));

    let app = with_ops_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        model = %config.generation.model,
        "screening chat service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
