use serde::{Deserialize, Serialize};

/// Discretized risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const HIGH_THRESHOLD: u8 = 60;
    pub const MEDIUM_THRESHOLD: u8 = 35;

    pub const fn from_score(score: u8) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Self::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorImpact {
    Low,
    Medium,
    High,
}

/// Contributing factor reported by the remote model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub category: String,
    pub factor: String,
    pub impact: FactorImpact,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Counseling,
    Financial,
    Academic,
    Health,
    Peer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    Immediate,
    Soon,
    WhenNeeded,
}

impl Urgency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Soon => "soon",
            Self::WhenNeeded => "when needed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub urgency: Urgency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Scored output for a completed answer record, whichever predictor produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub risk_score: u8,
    pub dropout_probability: f64,
    #[serde(default)]
    pub risk_factors: Vec<RiskFactor>,
    pub recommendations: Vec<Recommendation>,
    #[serde(alias = "prediction_confidence")]
    pub model_confidence: f64,
}

impl RiskAssessment {
    pub const MAX_SCORE: u8 = 100;

    /// Structural checks applied to anything received from outside the process.
    pub fn validate(&self) -> Result<(), String> {
        if self.risk_score > Self::MAX_SCORE {
            return Err(format!("risk_score {} exceeds 100", self.risk_score));
        }
        if !(0.0..=1.0).contains(&self.dropout_probability) {
            return Err(format!(
                "dropout_probability {} outside [0, 1]",
                self.dropout_probability
            ));
        }
        if !(0.0..=1.0).contains(&self.model_confidence) {
            return Err(format!(
                "model_confidence {} outside [0, 1]",
                self.model_confidence
            ));
        }
        if self.recommendations.is_empty() {
            return Err("recommendations must not be empty".to_string());
        }
        Ok(())
    }
}

/// Which predictor produced an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    Remote,
    Fallback,
}

impl PredictionSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Remote => "remote model",
            Self::Fallback => "local fallback",
        }
    }
}

/// An assessment paired with the predictor that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub assessment: RiskAssessment,
    pub source: PredictionSource,
}
