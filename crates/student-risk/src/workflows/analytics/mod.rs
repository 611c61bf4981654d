//! Retention dashboard: live statistics over saved sessions plus the reference panels.

mod reference;
mod stats;

pub use reference::{
    intervention_types, risk_factor_prevalence, weekly_risk_trend, FactorPrevalence,
    InterventionType, TrendDirection, WeeklyRiskPoint,
};
pub use stats::{DashboardStats, RecentAssessment, RECENT_ASSESSMENT_LIMIT};

use serde::Serialize;

use crate::workflows::assessment::StoredSession;

/// Everything the administrative dashboard renders.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub stats: DashboardStats,
    pub recent_assessments: Vec<RecentAssessment>,
    pub weekly_trend: Vec<WeeklyRiskPoint>,
    pub risk_factors: Vec<FactorPrevalence>,
    pub interventions: Vec<InterventionType>,
}

impl DashboardReport {
    pub fn build(history: &[StoredSession]) -> Self {
        Self {
            stats: DashboardStats::from_sessions(history),
            recent_assessments: stats::recent_assessments(history),
            weekly_trend: weekly_risk_trend(),
            risk_factors: risk_factor_prevalence(),
            interventions: intervention_types(),
        }
    }
}
