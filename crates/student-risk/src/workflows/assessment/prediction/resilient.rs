use tracing::{debug, warn};

use super::fallback::FallbackScorer;
use super::outcome::{PredictionOutcome, PredictionSource};
use super::RiskPredictor;
use crate::workflows::assessment::domain::AnswerRecord;

/// Tries the primary predictor once and substitutes the local scorer on any failure.
#[derive(Debug, Clone)]
pub struct ResilientPredictor<P> {
    primary: P,
    fallback: FallbackScorer,
}

impl<P> ResilientPredictor<P>
where
    P: RiskPredictor,
{
    pub fn new(primary: P) -> Self {
        Self::with_fallback(primary, FallbackScorer::default())
    }

    pub fn with_fallback(primary: P, fallback: FallbackScorer) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn fallback(&self) -> &FallbackScorer {
        &self.fallback
    }

    /// Never fails: errors from the primary are logged and replaced by the fallback result.
    pub async fn assess(&self, answers: &AnswerRecord) -> PredictionOutcome {
        match self.primary.predict(answers).await {
            Ok(assessment) => {
                debug!(
                    source = self.primary.source().label(),
                    risk_score = assessment.risk_score,
                    "prediction received"
                );
                PredictionOutcome {
                    assessment,
                    source: self.primary.source(),
                }
            }
            Err(err) => {
                warn!(
                    source = self.primary.source().label(),
                    error = %err,
                    "prediction unavailable, using local fallback"
                );
                PredictionOutcome {
                    assessment: self.fallback.score(answers),
                    source: PredictionSource::Fallback,
                }
            }
        }
    }

    pub async fn primary_healthy(&self) -> bool {
        self.primary.is_healthy().await
    }
}
