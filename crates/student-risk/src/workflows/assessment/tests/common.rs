use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::assessment::domain::{
    AcademicYear, AdvisorInteraction, AnswerRecord, Attendance, EmploymentStatus,
    FinancialStress, OverwhelmFrequency, Scale, StudyHours,
};
use crate::workflows::assessment::prediction::outcome::{
    FactorImpact, PredictionSource, Recommendation, RecommendationKind, RiskAssessment,
    RiskFactor, RiskLevel, Urgency,
};
use crate::workflows::assessment::prediction::resilient::ResilientPredictor;
use crate::workflows::assessment::prediction::{PredictionError, RiskPredictor};
use crate::workflows::assessment::repository::{SessionStore, StorageError, StoredSession};
use crate::workflows::assessment::service::AssessmentService;

/// A record that satisfies every step gate with low-risk answers.
pub(super) fn complete_answers() -> AnswerRecord {
    AnswerRecord {
        consent_given: true,
        consent_data_processing: true,
        academic_year: Some(AcademicYear::Second),
        attendance: Some(Attendance::Often),
        overwhelm_frequency: Some(OverwhelmFrequency::Sometimes),
        study_hours: Some(StudyHours::ThreeToFive),
        performance_satisfaction: Scale::new(7),
        advisor_interaction: Some(AdvisorInteraction::OnceSemester),
        employment_status: Some(EmploymentStatus::PartTime),
        financial_stress: Some(FinancialStress::Moderate),
        ..AnswerRecord::default()
    }
}

pub(super) fn best_case_answers() -> AnswerRecord {
    AnswerRecord {
        attendance: Some(Attendance::Always),
        overwhelm_frequency: Some(OverwhelmFrequency::Never),
        financial_stress: Some(FinancialStress::None),
        withdrawal_considered: false,
        performance_satisfaction: Scale::new(10),
        ..complete_answers()
    }
}

pub(super) fn worst_case_answers() -> AnswerRecord {
    AnswerRecord {
        attendance: Some(Attendance::Never),
        overwhelm_frequency: Some(OverwhelmFrequency::Always),
        financial_stress: Some(FinancialStress::VeryHigh),
        withdrawal_considered: true,
        performance_satisfaction: Scale::new(1),
        ..complete_answers()
    }
}

pub(super) fn remote_assessment() -> RiskAssessment {
    RiskAssessment {
        risk_level: RiskLevel::Medium,
        risk_score: 48,
        dropout_probability: 0.48,
        risk_factors: vec![RiskFactor {
            category: "Financial".to_string(),
            factor: "Financial Stress".to_string(),
            impact: FactorImpact::High,
            description: "Financial difficulties are a leading cause of student withdrawal"
                .to_string(),
        }],
        recommendations: vec![Recommendation {
            kind: RecommendationKind::Financial,
            title: "Financial Aid Office".to_string(),
            description: "Explore scholarships, grants, and emergency funding".to_string(),
            urgency: Urgency::Soon,
            contact: Some("financialaid@example.edu".to_string()),
        }],
        model_confidence: 0.86,
    }
}

/// Primary predictor that always answers with the same assessment.
pub(super) struct StaticPredictor(pub(super) RiskAssessment);

#[async_trait]
impl RiskPredictor for StaticPredictor {
    fn source(&self) -> PredictionSource {
        PredictionSource::Remote
    }

    async fn predict(&self, _answers: &AnswerRecord) -> Result<RiskAssessment, PredictionError> {
        Ok(self.0.clone())
    }
}

/// Primary predictor standing in for an unreachable service.
pub(super) struct UnavailablePredictor;

#[async_trait]
impl RiskPredictor for UnavailablePredictor {
    fn source(&self) -> PredictionSource {
        PredictionSource::Remote
    }

    async fn predict(&self, _answers: &AnswerRecord) -> Result<RiskAssessment, PredictionError> {
        Err(PredictionError::Status(503))
    }

    async fn is_healthy(&self) -> bool {
        false
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    sessions: Mutex<Vec<StoredSession>>,
}

impl MemoryStore {
    pub(super) fn saved(&self) -> Vec<StoredSession> {
        self.sessions.lock().expect("store mutex poisoned").clone()
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        self.sessions
            .lock()
            .expect("store mutex poisoned")
            .push(session.clone());
        Ok(())
    }

    fn latest(&self) -> Result<Option<StoredSession>, StorageError> {
        Ok(self
            .sessions
            .lock()
            .expect("store mutex poisoned")
            .last()
            .cloned())
    }

    fn history(&self) -> Result<Vec<StoredSession>, StorageError> {
        Ok(self.saved())
    }
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn save(&self, _session: &StoredSession) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disk full".to_string()))
    }

    fn latest(&self) -> Result<Option<StoredSession>, StorageError> {
        Err(StorageError::Unavailable("disk full".to_string()))
    }

    fn history(&self) -> Result<Vec<StoredSession>, StorageError> {
        Err(StorageError::Unavailable("disk full".to_string()))
    }
}

pub(super) fn offline_service() -> (
    AssessmentService<UnavailablePredictor, MemoryStore>,
    Arc<MemoryStore>,
) {
    let store = Arc::new(MemoryStore::default());
    let service = AssessmentService::new(
        ResilientPredictor::new(UnavailablePredictor),
        store.clone(),
    );
    (service, store)
}

pub(super) fn online_service() -> (
    AssessmentService<StaticPredictor, MemoryStore>,
    Arc<MemoryStore>,
) {
    let store = Arc::new(MemoryStore::default());
    let service = AssessmentService::new(
        ResilientPredictor::new(StaticPredictor(remote_assessment())),
        store.clone(),
    );
    (service, store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
