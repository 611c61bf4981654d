use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::workflows::assessment::{PredictionSource, RiskLevel, SessionId, StoredSession};

pub const RECENT_ASSESSMENT_LIMIT: usize = 4;

/// Aggregate counts over every saved session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_assessments: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
    pub average_risk_score: f64,
    pub fallback_share: f64,
}

impl DashboardStats {
    pub fn from_sessions(sessions: &[StoredSession]) -> Self {
        if sessions.is_empty() {
            return Self::default();
        }

        let mut stats = Self {
            total_assessments: sessions.len(),
            ..Self::default()
        };
        let mut score_total = 0u64;
        let mut fallback_count = 0usize;

        for session in sessions {
            match session.risk_level() {
                RiskLevel::High => stats.high_risk_count += 1,
                RiskLevel::Medium => stats.medium_risk_count += 1,
                RiskLevel::Low => stats.low_risk_count += 1,
            }
            score_total += u64::from(session.risk_score());
            if session.outcome.source == PredictionSource::Fallback {
                fallback_count += 1;
            }
        }

        let total = sessions.len() as f64;
        stats.average_risk_score = ((score_total as f64 / total) * 10.0).round() / 10.0;
        stats.fallback_share = fallback_count as f64 / total;
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentAssessment {
    pub session_id: SessionId,
    pub submitted_at: DateTime<Utc>,
    pub risk_level: RiskLevel,
    pub risk_score: u8,
}

/// Most recent sessions first.
pub(crate) fn recent_assessments(sessions: &[StoredSession]) -> Vec<RecentAssessment> {
    let mut ordered: Vec<&StoredSession> = sessions.iter().rev().collect();
    ordered.sort_by(|left, right| right.submitted_at.cmp(&left.submitted_at));
    ordered
        .into_iter()
        .take(RECENT_ASSESSMENT_LIMIT)
        .map(|session| RecentAssessment {
            session_id: session.session_id.clone(),
            submitted_at: session.submitted_at,
            risk_level: session.risk_level(),
            risk_score: session.risk_score(),
        })
        .collect()
}
