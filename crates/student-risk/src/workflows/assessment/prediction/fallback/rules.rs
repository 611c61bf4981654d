use serde::Serialize;

use super::weights::FallbackWeights;
use crate::workflows::assessment::domain::{AnswerRecord, Scale};

/// Points contributed by each scored answer before clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub attendance: u32,
    pub overwhelm: u32,
    pub financial_stress: u32,
    pub withdrawal: u32,
    pub satisfaction: u32,
}

impl ScoreBreakdown {
    pub fn raw_total(&self) -> u32 {
        self.attendance + self.overwhelm + self.financial_stress + self.withdrawal + self.satisfaction
    }

    /// Raw total clamped into 0–100.
    pub fn risk_score(&self) -> u8 {
        self.raw_total().min(100) as u8
    }
}

pub(crate) fn score_answers(answers: &AnswerRecord, weights: &FallbackWeights) -> ScoreBreakdown {
    let attendance = answers
        .attendance
        .map(|value| weights.attendance(value))
        .unwrap_or(0);
    let overwhelm = answers
        .overwhelm_frequency
        .map(|value| weights.overwhelm(value))
        .unwrap_or(0);
    let financial_stress = answers
        .financial_stress
        .map(|value| weights.financial_stress(value))
        .unwrap_or(0);
    let withdrawal = if answers.withdrawal_considered {
        weights.withdrawal_considered
    } else {
        0
    };
    let satisfaction = u32::from(Scale::MAX.saturating_sub(answers.performance_satisfaction.get()))
        * weights.satisfaction_multiplier;

    ScoreBreakdown {
        attendance,
        overwhelm,
        financial_stress,
        withdrawal,
        satisfaction,
    }
}
