//! Prediction contract shared by the remote model and the local rule-based scorer.

pub mod fallback;
pub mod outcome;
pub mod remote;
pub mod resilient;

use async_trait::async_trait;

use super::domain::AnswerRecord;
use outcome::{PredictionSource, RiskAssessment};

/// Anything that can turn a completed answer record into a risk assessment.
#[async_trait]
pub trait RiskPredictor: Send + Sync {
    fn source(&self) -> PredictionSource;

    async fn predict(&self, answers: &AnswerRecord) -> Result<RiskAssessment, PredictionError>;

    async fn is_healthy(&self) -> bool {
        true
    }
}

/// Failure to obtain a usable assessment from a predictor.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("prediction request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("prediction service responded with status {0}")]
    Status(u16),
    #[error("prediction response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("prediction response rejected: {0}")]
    InvalidResponse(String),
}
