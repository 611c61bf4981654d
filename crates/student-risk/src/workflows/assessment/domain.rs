use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Identifier wrapper for one assessment session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Fresh random id, unique across processes sharing one storage directory.
    pub fn generate() -> Self {
        Self(format!("assess-{}", Uuid::new_v4()))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcademicYear {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
    #[serde(rename = "4th")]
    Fourth,
    #[serde(other, rename = "unknown")]
    Unknown,
}

impl AcademicYear {
    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "1st Year",
            Self::Second => "2nd Year",
            Self::Third => "3rd Year",
            Self::Fourth => "4th Year",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Attendance {
    Always,
    Often,
    Sometimes,
    Rarely,
    Never,
    #[serde(other)]
    Unknown,
}

impl Attendance {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Always => "Always",
            Self::Often => "Often",
            Self::Sometimes => "Sometimes",
            Self::Rarely => "Rarely",
            Self::Never => "Never",
            Self::Unknown => "Unknown",
        }
    }
}

/// How often coursework feels overwhelming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwhelmFrequency {
    Never,
    Rarely,
    Sometimes,
    Often,
    Always,
    #[serde(other)]
    Unknown,
}

impl OverwhelmFrequency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Never => "Never",
            Self::Rarely => "Rarely",
            Self::Sometimes => "Sometimes",
            Self::Often => "Often",
            Self::Always => "Always",
            Self::Unknown => "Unknown",
        }
    }
}

/// Weekly self-study hours bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudyHours {
    #[serde(rename = "1-3")]
    OneToThree,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "5-8")]
    FiveToEight,
    #[serde(rename = "8+")]
    EightPlus,
    #[serde(other, rename = "unknown")]
    Unknown,
}

impl StudyHours {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneToThree => "1-3 hours",
            Self::ThreeToFive => "3-5 hours",
            Self::FiveToEight => "5-8 hours",
            Self::EightPlus => "8+ hours",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdvisorInteraction {
    Never,
    OnceSemester,
    #[serde(rename = "2-3-semester")]
    TwoToThreeSemester,
    Monthly,
    #[serde(other)]
    Unknown,
}

impl AdvisorInteraction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Never => "Never",
            Self::OnceSemester => "Once per semester",
            Self::TwoToThreeSemester => "2-3 times per semester",
            Self::Monthly => "Monthly or more",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentStatus {
    NotEmployed,
    PartTime,
    FullTime,
    #[serde(other)]
    Unknown,
}

impl EmploymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotEmployed => "Not Employed",
            Self::PartTime => "Part-time",
            Self::FullTime => "Full-time",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinancialStress {
    None,
    Low,
    Moderate,
    High,
    VeryHigh,
    #[serde(other)]
    Unknown,
}

impl FinancialStress {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Unknown => "Unknown",
        }
    }
}

/// Campus services a student reports having used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupportService {
    Academic,
    Career,
    Counseling,
    Health,
    Financial,
    None,
}

impl SupportService {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Academic,
            Self::Career,
            Self::Counseling,
            Self::Health,
            Self::Financial,
            Self::None,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Academic => "Academic Advising",
            Self::Career => "Career Services",
            Self::Counseling => "Counseling",
            Self::Health => "Health Services",
            Self::Financial => "Financial Aid",
            Self::None => "None",
        }
    }
}

/// Reason tags offered when a student has considered withdrawing.
pub const WITHDRAWAL_REASON_OPTIONS: [&str; 6] = [
    "Academic difficulty",
    "Financial challenges",
    "Mental health",
    "Personal/family issues",
    "Lack of interest",
    "Career opportunities",
];

/// A 1–10 self-rating. Out-of-range inputs are clamped into the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Scale(u8);

impl Scale {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const NEUTRAL: Scale = Scale(5);

    pub fn new(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl From<i64> for Scale {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Scale> for u8 {
    fn from(value: Scale) -> Self {
        value.0
    }
}

/// Weekly extracurricular hours, 0–20.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "i64", into = "u8")]
pub struct WeeklyHours(u8);

impl WeeklyHours {
    pub const MAX: u8 = 20;

    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, Self::MAX as i64) as u8)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<i64> for WeeklyHours {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<WeeklyHours> for u8 {
    fn from(value: WeeklyHours) -> Self {
        value.0
    }
}

/// Selected support services in the order they were picked. `None` is exclusive with
/// every other entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SupportService>", into = "Vec<SupportService>")]
pub struct ServiceSelection(Vec<SupportService>);

impl ServiceSelection {
    pub fn none_used() -> Self {
        Self(vec![SupportService::None])
    }

    /// Toggle one option the way the services panel does: picking `None` resets the
    /// selection to exactly `None`, picking anything else drops `None` and flips the option.
    pub fn toggle(&mut self, service: SupportService) {
        if service == SupportService::None {
            self.0 = vec![SupportService::None];
            return;
        }

        self.0.retain(|picked| *picked != SupportService::None);
        match self.0.iter().position(|picked| *picked == service) {
            Some(index) => {
                self.0.remove(index);
            }
            None => self.0.push(service),
        }
    }

    pub fn contains(&self, service: SupportService) -> bool {
        self.0.contains(&service)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = SupportService> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<SupportService> for ServiceSelection {
    fn from_iter<I: IntoIterator<Item = SupportService>>(iter: I) -> Self {
        let mut services: Vec<SupportService> = Vec::new();
        for service in iter {
            if !services.contains(&service) {
                services.push(service);
            }
        }
        if services.len() > 1 {
            services.retain(|service| *service != SupportService::None);
        }
        Self(services)
    }
}

impl From<Vec<SupportService>> for ServiceSelection {
    fn from(value: Vec<SupportService>) -> Self {
        value.into_iter().collect()
    }
}

impl From<ServiceSelection> for Vec<SupportService> {
    fn from(value: ServiceSelection) -> Self {
        value.0
    }
}

/// Keeps the first occurrence of each reason, in the order given.
pub(crate) fn distinct_reasons(raw: Vec<String>) -> Vec<String> {
    let mut reasons: Vec<String> = Vec::with_capacity(raw.len());
    for reason in raw {
        if !reasons.contains(&reason) {
            reasons.push(reason);
        }
    }
    reasons
}

fn dedup_reasons<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer).map(distinct_reasons)
}

/// The accumulated survey responses for one session.
///
/// Required categorical answers start as `None` until the student picks an option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerRecord {
    pub consent_given: bool,
    pub consent_data_processing: bool,
    pub consent_anonymous_analytics: bool,

    pub academic_year: Option<AcademicYear>,
    pub attendance: Option<Attendance>,
    pub overwhelm_frequency: Option<OverwhelmFrequency>,
    pub study_hours: Option<StudyHours>,
    pub performance_satisfaction: Scale,

    pub advisor_interaction: Option<AdvisorInteraction>,
    pub support_network_strength: Scale,
    pub extracurricular_hours: WeeklyHours,

    pub employment_status: Option<EmploymentStatus>,
    pub financial_stress: Option<FinancialStress>,
    pub career_alignment: Scale,

    pub services_used: ServiceSelection,
    pub withdrawal_considered: bool,
    /// Picked reasons in click order, without duplicates.
    #[serde(deserialize_with = "dedup_reasons")]
    pub withdrawal_reasons: Vec<String>,
}

impl Default for AnswerRecord {
    fn default() -> Self {
        Self {
            consent_given: false,
            consent_data_processing: false,
            consent_anonymous_analytics: false,
            academic_year: None,
            attendance: None,
            overwhelm_frequency: None,
            study_hours: None,
            performance_satisfaction: Scale::NEUTRAL,
            advisor_interaction: None,
            support_network_strength: Scale::NEUTRAL,
            extracurricular_hours: WeeklyHours::default(),
            employment_status: None,
            financial_stress: None,
            career_alignment: Scale::NEUTRAL,
            services_used: ServiceSelection::default(),
            withdrawal_considered: false,
            withdrawal_reasons: Vec::new(),
        }
    }
}

impl AnswerRecord {
    /// Reasons only count while withdrawal is being considered.
    pub fn effective_withdrawal_reasons(&self) -> Vec<&str> {
        if !self.withdrawal_considered {
            return Vec::new();
        }
        self.withdrawal_reasons.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_categorical_values_deserialize_to_unknown() {
        let record: AnswerRecord = serde_json::from_value(json!({
            "attendance": "sporadically",
            "financial_stress": "extreme",
            "academic_year": "5th",
            "study_hours": "20+",
        }))
        .expect("lenient categorical decoding");

        assert_eq!(record.attendance, Some(Attendance::Unknown));
        assert_eq!(record.financial_stress, Some(FinancialStress::Unknown));
        assert_eq!(record.academic_year, Some(AcademicYear::Unknown));
        assert_eq!(record.study_hours, Some(StudyHours::Unknown));
    }

    #[test]
    fn wire_spellings_match_survey_options() {
        let record: AnswerRecord = serde_json::from_value(json!({
            "academic_year": "2nd",
            "study_hours": "8+",
            "advisor_interaction": "2-3-semester",
            "employment_status": "not-employed",
            "financial_stress": "very-high",
        }))
        .expect("record decodes");

        assert_eq!(record.academic_year, Some(AcademicYear::Second));
        assert_eq!(record.study_hours, Some(StudyHours::EightPlus));
        assert_eq!(
            record.advisor_interaction,
            Some(AdvisorInteraction::TwoToThreeSemester)
        );
        assert_eq!(record.employment_status, Some(EmploymentStatus::NotEmployed));
        assert_eq!(record.financial_stress, Some(FinancialStress::VeryHigh));
        assert_eq!(record.performance_satisfaction, Scale::NEUTRAL);
    }

    #[test]
    fn scales_clamp_out_of_range_values() {
        assert_eq!(Scale::new(0).get(), 1);
        assert_eq!(Scale::new(42).get(), 10);
        assert_eq!(WeeklyHours::new(-3).get(), 0);
        assert_eq!(WeeklyHours::new(35).get(), 20);

        let record: AnswerRecord = serde_json::from_value(json!({
            "performance_satisfaction": 14,
            "extracurricular_hours": 25,
        }))
        .expect("record decodes");
        assert_eq!(record.performance_satisfaction.get(), 10);
        assert_eq!(record.extracurricular_hours.get(), 20);
    }

    #[test]
    fn decoded_service_lists_drop_none_next_to_real_services() {
        let selection: ServiceSelection =
            serde_json::from_value(json!(["none", "counseling"])).expect("selection decodes");
        assert!(!selection.contains(SupportService::None));
        assert!(selection.contains(SupportService::Counseling));
        assert_eq!(selection.len(), 1);

        let only_none: ServiceSelection =
            serde_json::from_value(json!(["none"])).expect("selection decodes");
        assert_eq!(only_none, ServiceSelection::none_used());
    }

    #[test]
    fn withdrawal_reasons_ignored_when_not_considering() {
        let mut record = AnswerRecord::default();
        record
            .withdrawal_reasons
            .push(WITHDRAWAL_REASON_OPTIONS[1].to_string());
        assert!(record.effective_withdrawal_reasons().is_empty());

        record.withdrawal_considered = true;
        assert_eq!(
            record.effective_withdrawal_reasons(),
            vec!["Financial challenges"]
        );
    }

    #[test]
    fn selections_keep_the_order_they_were_picked() {
        let mut selection = ServiceSelection::default();
        selection.toggle(SupportService::Health);
        selection.toggle(SupportService::Counseling);
        selection.toggle(SupportService::Financial);
        selection.toggle(SupportService::Counseling);
        selection.toggle(SupportService::Academic);

        assert_eq!(
            serde_json::to_value(&selection).expect("selection encodes"),
            json!(["health", "financial", "academic"])
        );

        let decoded: ServiceSelection =
            serde_json::from_value(json!(["financial", "counseling", "financial"]))
                .expect("selection decodes");
        assert_eq!(
            decoded.iter().collect::<Vec<_>>(),
            vec![SupportService::Financial, SupportService::Counseling]
        );
    }

    #[test]
    fn decoded_withdrawal_reasons_keep_order_and_drop_repeats() {
        let record: AnswerRecord = serde_json::from_value(json!({
            "withdrawal_considered": true,
            "withdrawal_reasons": ["Mental health", "Academic difficulties", "Mental health"],
        }))
        .expect("record decodes");

        assert_eq!(
            record.effective_withdrawal_reasons(),
            vec!["Mental health", "Academic difficulties"]
        );
    }
}
