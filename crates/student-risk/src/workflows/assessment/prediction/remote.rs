use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::outcome::{PredictionSource, RiskAssessment};
use super::{PredictionError, RiskPredictor};
use crate::config::PredictionConfig;
use crate::workflows::assessment::domain::AnswerRecord;

pub const PREDICT_PATH: &str = "/api/v1/predict/simplified";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// HTTP client for the hosted prediction model.
#[derive(Debug, Clone)]
pub struct RemotePredictor {
    client: reqwest::Client,
    config: PredictionConfig,
}

impl RemotePredictor {
    pub fn new(config: PredictionConfig) -> Result<Self, PredictionError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(PredictionError::Transport)?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// `true` only when the service answers `{"status": "healthy"}` within the health timeout.
    pub async fn health_check(&self) -> bool {
        let request = async {
            let response = self
                .client
                .get(self.url(HEALTH_PATH))
                .send()
                .await?
                .error_for_status()?;
            response.json::<HealthResponse>().await
        };

        match tokio::time::timeout(self.config.health_timeout, request).await {
            Ok(Ok(body)) => body.status == "healthy",
            Ok(Err(err)) => {
                debug!(error = %err, "prediction health check failed");
                false
            }
            Err(_) => {
                debug!(
                    timeout_ms = self.config.health_timeout.as_millis() as u64,
                    "prediction health check timed out"
                );
                false
            }
        }
    }
}

#[async_trait]
impl RiskPredictor for RemotePredictor {
    fn source(&self) -> PredictionSource {
        PredictionSource::Remote
    }

    async fn predict(&self, answers: &AnswerRecord) -> Result<RiskAssessment, PredictionError> {
        let response = self
            .client
            .post(self.url(PREDICT_PATH))
            .json(answers)
            .send()
            .await
            .map_err(PredictionError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictionError::Status(status.as_u16()));
        }

        let assessment = response
            .json::<RiskAssessment>()
            .await
            .map_err(PredictionError::Decode)?;
        assessment
            .validate()
            .map_err(PredictionError::InvalidResponse)?;

        Ok(assessment)
    }

    async fn is_healthy(&self) -> bool {
        self.health_check().await
    }
}
