//! Guided dropout-risk assessment: the five-step intake form, prediction with a local
//! fallback, and the hand-off of finished sessions to storage.

pub mod domain;
pub mod form;
pub mod prediction;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AcademicYear, AdvisorInteraction, AnswerRecord, Attendance, EmploymentStatus,
    FinancialStress, OverwhelmFrequency, Scale, ServiceSelection, SessionId, StudyHours,
    SupportService, WeeklyHours, WITHDRAWAL_REASON_OPTIONS,
};
pub use form::{
    AssessmentForm, FieldUpdate, FormStep, StepDescriptor, SubmitError, SubmittedAssessment,
};
pub use prediction::fallback::{FallbackScorer, FallbackWeights, ScoreBreakdown};
pub use prediction::outcome::{
    FactorImpact, PredictionOutcome, PredictionSource, Recommendation, RecommendationKind,
    RiskAssessment, RiskFactor, RiskLevel, Urgency,
};
pub use prediction::remote::RemotePredictor;
pub use prediction::resilient::ResilientPredictor;
pub use prediction::{PredictionError, RiskPredictor};
pub use repository::{FileSessionStore, SessionStore, StorageError, StoredSession};
pub use router::assessment_router;
pub use service::{AssessmentReceipt, AssessmentService};
