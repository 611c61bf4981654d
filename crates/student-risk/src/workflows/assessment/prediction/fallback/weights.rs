use serde::{Deserialize, Serialize};

use crate::workflows::assessment::domain::{Attendance, FinancialStress, OverwhelmFrequency};

/// Point tables for the rule-based scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackWeights {
    pub withdrawal_considered: u32,
    pub satisfaction_multiplier: u32,
}

impl Default for FallbackWeights {
    fn default() -> Self {
        Self {
            withdrawal_considered: 15,
            satisfaction_multiplier: 2,
        }
    }
}

impl FallbackWeights {
    pub const fn attendance(&self, attendance: Attendance) -> u32 {
        match attendance {
            Attendance::Always => 0,
            Attendance::Often => 5,
            Attendance::Sometimes => 15,
            Attendance::Rarely => 25,
            Attendance::Never => 35,
            Attendance::Unknown => 0,
        }
    }

    pub const fn overwhelm(&self, frequency: OverwhelmFrequency) -> u32 {
        match frequency {
            OverwhelmFrequency::Never => 0,
            OverwhelmFrequency::Rarely => 5,
            OverwhelmFrequency::Sometimes => 10,
            OverwhelmFrequency::Often => 20,
            OverwhelmFrequency::Always => 30,
            OverwhelmFrequency::Unknown => 0,
        }
    }

    pub const fn financial_stress(&self, stress: FinancialStress) -> u32 {
        match stress {
            FinancialStress::None => 0,
            FinancialStress::Low => 5,
            FinancialStress::Moderate => 10,
            FinancialStress::High => 20,
            FinancialStress::VeryHigh => 25,
            FinancialStress::Unknown => 0,
        }
    }
}
