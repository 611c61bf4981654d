mod rules;
mod weights;

pub use rules::ScoreBreakdown;
pub use weights::FallbackWeights;

use async_trait::async_trait;

use super::outcome::{
    PredictionSource, Recommendation, RecommendationKind, RiskAssessment, RiskLevel, Urgency,
};
use super::{PredictionError, RiskPredictor};
use crate::workflows::assessment::domain::AnswerRecord;

pub const FALLBACK_CONFIDENCE: f64 = 0.7;

/// Rule-based scorer used whenever the remote model cannot answer.
#[derive(Debug, Clone, Default)]
pub struct FallbackScorer {
    weights: FallbackWeights,
}

impl FallbackScorer {
    pub fn new(weights: FallbackWeights) -> Self {
        Self { weights }
    }

    pub fn breakdown(&self, answers: &AnswerRecord) -> ScoreBreakdown {
        rules::score_answers(answers, &self.weights)
    }

    pub fn score(&self, answers: &AnswerRecord) -> RiskAssessment {
        let risk_score = self.breakdown(answers).risk_score();

        RiskAssessment {
            risk_level: RiskLevel::from_score(risk_score),
            risk_score,
            dropout_probability: f64::from(risk_score) / 100.0,
            risk_factors: Vec::new(),
            recommendations: vec![stay_connected()],
            model_confidence: FALLBACK_CONFIDENCE,
        }
    }
}

fn stay_connected() -> Recommendation {
    Recommendation {
        kind: RecommendationKind::Peer,
        title: "Stay Connected".to_string(),
        description: "Continue engaging with campus resources".to_string(),
        urgency: Urgency::WhenNeeded,
        contact: None,
    }
}

#[async_trait]
impl RiskPredictor for FallbackScorer {
    fn source(&self) -> PredictionSource {
        PredictionSource::Fallback
    }

    async fn predict(&self, answers: &AnswerRecord) -> Result<RiskAssessment, PredictionError> {
        Ok(self.score(answers))
    }
}
