use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyRiskPoint {
    pub week: &'static str,
    pub high_risk_pct: u8,
    pub low_risk_pct: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FactorPrevalence {
    pub name: &'static str,
    pub percentage: u8,
    pub trend: TrendDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InterventionType {
    pub name: &'static str,
}

const WEEKLY_TREND: [(&str, u8, u8); 8] = [
    ("W1", 20, 65),
    ("W2", 25, 60),
    ("W3", 18, 70),
    ("W4", 30, 55),
    ("W5", 22, 68),
    ("W6", 28, 58),
    ("W7", 15, 75),
    ("W8", 35, 50),
];

pub fn weekly_risk_trend() -> Vec<WeeklyRiskPoint> {
    WEEKLY_TREND
        .iter()
        .map(|&(week, high_risk_pct, low_risk_pct)| WeeklyRiskPoint {
            week,
            high_risk_pct,
            low_risk_pct,
        })
        .collect()
}

pub fn risk_factor_prevalence() -> Vec<FactorPrevalence> {
    use TrendDirection::{Down, Up};

    [
        ("Academic Stress", 71, Down),
        ("Financial Issues", 92, Up),
        ("Mental Health", 33, Down),
        ("Low Attendance", 56, Up),
        ("Career Misalign", 79, Up),
    ]
    .into_iter()
    .map(|(name, percentage, trend)| FactorPrevalence {
        name,
        percentage,
        trend,
    })
    .collect()
}

pub fn intervention_types() -> Vec<InterventionType> {
    ["Counseling", "Financial Aid", "Academic", "Wellness"]
        .into_iter()
        .map(|name| InterventionType { name })
        .collect()
}
