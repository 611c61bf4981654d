use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::AnswerRecord;
use super::form::{FormStep, StepDescriptor};
use super::prediction::RiskPredictor;
use super::repository::SessionStore;
use super::service::{AssessmentReceipt, AssessmentService};
use crate::error::AppError;
use crate::workflows::analytics::DashboardReport;

/// Router builder exposing the assessment flow to browser clients.
pub fn assessment_router<P, S>(service: Arc<AssessmentService<P, S>>) -> Router
where
    P: RiskPredictor + 'static,
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(submit_handler::<P, S>))
        .route("/api/v1/assessments/latest", get(latest_handler::<P, S>))
        .route("/api/v1/assessments/steps", get(steps_handler))
        .route(
            "/api/v1/prediction/health",
            get(prediction_health_handler::<P, S>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<P, S>))
        .with_state(service)
}

pub(crate) async fn submit_handler<P, S>(
    State(service): State<Arc<AssessmentService<P, S>>>,
    axum::Json(answers): axum::Json<AnswerRecord>,
) -> Result<(StatusCode, axum::Json<AssessmentReceipt>), AppError>
where
    P: RiskPredictor + 'static,
    S: SessionStore + 'static,
{
    let receipt = service.submit_answers(answers).await?;
    Ok((StatusCode::CREATED, axum::Json(receipt)))
}

pub(crate) async fn latest_handler<P, S>(
    State(service): State<Arc<AssessmentService<P, S>>>,
) -> Result<Response, AppError>
where
    P: RiskPredictor + 'static,
    S: SessionStore + 'static,
{
    let response = match service.latest().await? {
        Some(session) => (StatusCode::OK, axum::Json(session)).into_response(),
        None => {
            let payload = json!({ "error": "no assessment has been submitted yet" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    };
    Ok(response)
}

pub(crate) async fn steps_handler() -> axum::Json<Vec<StepDescriptor>> {
    axum::Json(
        FormStep::ordered()
            .into_iter()
            .map(StepDescriptor::from)
            .collect(),
    )
}

pub(crate) async fn prediction_health_handler<P, S>(
    State(service): State<Arc<AssessmentService<P, S>>>,
) -> axum::Json<serde_json::Value>
where
    P: RiskPredictor + 'static,
    S: SessionStore + 'static,
{
    let healthy = service.prediction_service_healthy().await;
    axum::Json(json!({ "healthy": healthy }))
}

pub(crate) async fn dashboard_handler<P, S>(
    State(service): State<Arc<AssessmentService<P, S>>>,
) -> Result<axum::Json<DashboardReport>, AppError>
where
    P: RiskPredictor + 'static,
    S: SessionStore + 'static,
{
    let history = service.history().await?;
    Ok(axum::Json(DashboardReport::build(&history)))
}
