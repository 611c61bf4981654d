use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use student_risk::config::AppConfig;
use student_risk::error::AppError;
use student_risk::telemetry;
use student_risk::workflows::assessment::{
    AssessmentService, FileSessionStore, RemotePredictor, ResilientPredictor,
};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let predictor = RemotePredictor::new(config.prediction.clone())?;
    let store = Arc::new(FileSessionStore::new(config.storage.directory.clone()));
    let assessment_service = Arc::new(AssessmentService::new(
        ResilientPredictor::new(predictor),
        store,
    ));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        prediction_url = %config.prediction.base_url,
        storage_dir = %config.storage.directory.display(),
        "student risk assessment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
