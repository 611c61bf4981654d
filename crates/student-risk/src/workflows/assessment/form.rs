use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    distinct_reasons, AcademicYear, AdvisorInteraction, AnswerRecord, Attendance, EmploymentStatus,
    FinancialStress, OverwhelmFrequency, Scale, ServiceSelection, SessionId, StudyHours,
    SupportService, WeeklyHours,
};

pub const CONSENT_REQUIRED_MESSAGE: &str = "Please provide consent to continue";

/// The five wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    Consent,
    Academic,
    Support,
    Personal,
    Services,
}

impl FormStep {
    pub const COUNT: usize = 5;

    pub const fn ordered() -> [Self; 5] {
        [
            Self::Consent,
            Self::Academic,
            Self::Support,
            Self::Personal,
            Self::Services,
        ]
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Consent => 0,
            Self::Academic => 1,
            Self::Support => 2,
            Self::Personal => 3,
            Self::Services => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ordered().get(index).copied()
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::Consent => "consent",
            Self::Academic => "academic",
            Self::Support => "support",
            Self::Personal => "personal",
            Self::Services => "services",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Consent => "Privacy & Consent",
            Self::Academic => "Academic Information",
            Self::Support => "Support System",
            Self::Personal => "Personal Factors",
            Self::Services => "Services & Review",
        }
    }

    fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }
}

/// Serializable description of a step for clients rendering the wizard.
#[derive(Debug, Clone, Serialize)]
pub struct StepDescriptor {
    pub index: usize,
    pub id: &'static str,
    pub title: &'static str,
}

impl From<FormStep> for StepDescriptor {
    fn from(step: FormStep) -> Self {
        Self {
            index: step.index(),
            id: step.id(),
            title: step.title(),
        }
    }
}

/// One field replacement. Each variant carries the value type of its field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    ConsentGiven(bool),
    ConsentDataProcessing(bool),
    ConsentAnonymousAnalytics(bool),
    AcademicYear(AcademicYear),
    Attendance(Attendance),
    OverwhelmFrequency(OverwhelmFrequency),
    StudyHours(StudyHours),
    PerformanceSatisfaction(Scale),
    AdvisorInteraction(AdvisorInteraction),
    SupportNetworkStrength(Scale),
    ExtracurricularHours(WeeklyHours),
    EmploymentStatus(EmploymentStatus),
    FinancialStress(FinancialStress),
    CareerAlignment(Scale),
    ServicesUsed(ServiceSelection),
    WithdrawalConsidered(bool),
    WithdrawalReasons(Vec<String>),
}

/// Reasons a submission is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("{}", CONSENT_REQUIRED_MESSAGE)]
    ConsentRequired,
    #[error("submission is only available from the final step (currently on {})", .step.title())]
    NotOnFinalStep { step: FormStep },
    #[error("answers for '{}' are incomplete", .step.title())]
    IncompleteStep { step: FormStep },
}

/// Wizard state for a single assessment session.
#[derive(Debug, Clone)]
pub struct AssessmentForm {
    session_id: SessionId,
    step: FormStep,
    answers: AnswerRecord,
}

impl Default for AssessmentForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentForm {
    pub fn new() -> Self {
        Self::prefilled(AnswerRecord::default())
    }

    /// Start a session from an already complete record, positioned on the first step.
    pub fn prefilled(answers: AnswerRecord) -> Self {
        Self {
            session_id: SessionId::generate(),
            step: FormStep::Consent,
            answers,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    pub fn update(&mut self, update: FieldUpdate) {
        let answers = &mut self.answers;
        match update {
            FieldUpdate::ConsentGiven(value) => answers.consent_given = value,
            FieldUpdate::ConsentDataProcessing(value) => answers.consent_data_processing = value,
            FieldUpdate::ConsentAnonymousAnalytics(value) => {
                answers.consent_anonymous_analytics = value
            }
            FieldUpdate::AcademicYear(value) => answers.academic_year = Some(value),
            FieldUpdate::Attendance(value) => answers.attendance = Some(value),
            FieldUpdate::OverwhelmFrequency(value) => answers.overwhelm_frequency = Some(value),
            FieldUpdate::StudyHours(value) => answers.study_hours = Some(value),
            FieldUpdate::PerformanceSatisfaction(value) => {
                answers.performance_satisfaction = value
            }
            FieldUpdate::AdvisorInteraction(value) => answers.advisor_interaction = Some(value),
            FieldUpdate::SupportNetworkStrength(value) => {
                answers.support_network_strength = value
            }
            FieldUpdate::ExtracurricularHours(value) => answers.extracurricular_hours = value,
            FieldUpdate::EmploymentStatus(value) => answers.employment_status = Some(value),
            FieldUpdate::FinancialStress(value) => answers.financial_stress = Some(value),
            FieldUpdate::CareerAlignment(value) => answers.career_alignment = value,
            FieldUpdate::ServicesUsed(value) => answers.services_used = value,
            FieldUpdate::WithdrawalConsidered(value) => answers.withdrawal_considered = value,
            FieldUpdate::WithdrawalReasons(value) => {
                answers.withdrawal_reasons = distinct_reasons(value)
            }
        }
    }

    pub fn toggle_service(&mut self, service: SupportService) {
        let mut services = self.answers.services_used.clone();
        services.toggle(service);
        self.update(FieldUpdate::ServicesUsed(services));
    }

    pub fn toggle_withdrawal_reason(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        let mut reasons = self.answers.withdrawal_reasons.clone();
        match reasons.iter().position(|picked| *picked == reason) {
            Some(index) => {
                reasons.remove(index);
            }
            None => reasons.push(reason),
        }
        self.update(FieldUpdate::WithdrawalReasons(reasons));
    }

    /// Whether the follow-up question about withdrawal reasons is shown.
    pub fn withdrawal_panel_visible(&self) -> bool {
        self.answers.withdrawal_considered
    }

    pub fn can_advance(&self, step: FormStep) -> bool {
        let answers = &self.answers;
        match step {
            FormStep::Consent => answers.consent_given && answers.consent_data_processing,
            FormStep::Academic => {
                answered(answers.academic_year, AcademicYear::Unknown)
                    && answered(answers.attendance, Attendance::Unknown)
                    && answered(answers.overwhelm_frequency, OverwhelmFrequency::Unknown)
                    && answered(answers.study_hours, StudyHours::Unknown)
            }
            FormStep::Support => {
                answered(answers.advisor_interaction, AdvisorInteraction::Unknown)
            }
            FormStep::Personal => {
                answered(answers.employment_status, EmploymentStatus::Unknown)
                    && answered(answers.financial_stress, FinancialStress::Unknown)
            }
            FormStep::Services => true,
        }
    }

    /// Move forward when the current step is satisfied. Returns whether the step changed.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance(self.step) {
            return false;
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    /// Move back one step. Returns whether the step changed.
    pub fn retreat(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    /// Walk forward through every gate, stopping at the first unsatisfied step.
    pub fn advance_to_review(&mut self) -> FormStep {
        while self.advance() {}
        self.step
    }

    /// Completion percentage shown by the progress bar.
    pub fn progress(&self) -> f32 {
        (self.step.index() + 1) as f32 * 100.0 / FormStep::COUNT as f32
    }

    /// Freeze the answers for prediction. Double submissions are not de-duplicated.
    pub fn submit(&self) -> Result<SubmittedAssessment, SubmitError> {
        if self.step != FormStep::Services {
            return Err(SubmitError::NotOnFinalStep { step: self.step });
        }
        if !self.answers.consent_given {
            return Err(SubmitError::ConsentRequired);
        }

        Ok(SubmittedAssessment {
            session_id: self.session_id.clone(),
            submitted_at: Utc::now(),
            answers: self.answers.clone(),
        })
    }
}

fn answered<T: PartialEq>(value: Option<T>, unknown: T) -> bool {
    matches!(value, Some(value) if value != unknown)
}

/// Answers captured at submission time. Read-only from here on.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedAssessment {
    session_id: SessionId,
    submitted_at: DateTime<Utc>,
    answers: AnswerRecord,
}

impl SubmittedAssessment {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    pub fn into_parts(self) -> (SessionId, DateTime<Utc>, AnswerRecord) {
        (self.session_id, self.submitted_at, self.answers)
    }
}
