//! NR-1 risk matrix: COPSOQ dimension score -> probability band, combined
//! with a clinically assessed severity into an occupational risk level.

use serde::{Deserialize, Serialize};

pub const MAX_SCORE: u8 = 100;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RiskError {
    #[error("score {0} is outside 0..=100")]
    ScoreOutOfRange(u16),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Probability {
    Low,
    Medium,
    High,
}

impl Probability {
    pub const ALL: [Probability; 3] = [Probability::Low, Probability::Medium, Probability::High];

    pub fn for_score(score: u8) -> Result<Self, RiskError> {
        match score {
            0..=33 => Ok(Probability::Low),
            34..=66 => Ok(Probability::Medium),
            67..=MAX_SCORE => Ok(Probability::High),
            _ => Err(RiskError::ScoreOutOfRange(score as u16)),
        }
    }

    /// Aggregated scores are means, so they arrive as floats. They are
    /// rounded to the nearest integer point before banding.
    pub fn for_mean_score(score: f64) -> Result<Self, RiskError> {
        if !score.is_finite() || score < 0.0 || score > MAX_SCORE as f64 {
            return Err(RiskError::ScoreOutOfRange(score.max(0.0).min(u16::MAX as f64) as u16));
        }
        Self::for_score(score.round() as u8)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Probability::Low => "Low",
            Probability::Medium => "Medium",
            Probability::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Temporary discomfort.
    Mild,
    /// Leave under 15 days.
    Moderate,
    /// Leave over 15 days, burnout.
    Severe,
    /// Permanent disability or suicide.
    Catastrophic,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Mild,
        Severity::Moderate,
        Severity::Severe,
        Severity::Catastrophic,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Trivial,
    Moderate,
    Substantial,
    Critical,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Trivial => "Trivial",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Substantial => "Substantial",
            RiskLevel::Critical => "Critical",
        }
    }

    pub fn recommended_action(&self) -> RecommendedAction {
        match self {
            RiskLevel::Trivial => RecommendedAction::Monitor,
            RiskLevel::Moderate => RecommendedAction::Plan,
            RiskLevel::Substantial => RecommendedAction::Prioritize,
            RiskLevel::Critical => RecommendedAction::ImmediateAction,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    Monitor,
    Plan,
    Prioritize,
    ImmediateAction,
}

/// Decision matrix used for the risk inventory (PGR).
pub fn classify(probability: Probability, severity: Severity) -> RiskLevel {
    use Probability as P;
    use Severity as S;

    match (probability, severity) {
        (_, S::Catastrophic) | (P::High, S::Severe) => RiskLevel::Critical,
        (_, S::Severe) | (P::High, S::Moderate) => RiskLevel::Substantial,
        (_, S::Moderate) | (P::Medium, S::Mild) => RiskLevel::Moderate,
        (P::Low, S::Mild) | (P::High, S::Mild) => RiskLevel::Trivial,
    }
}

pub fn classify_score(score: u8, severity: Severity) -> Result<RiskLevel, RiskError> {
    Ok(classify(Probability::for_score(score)?, severity))
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RiskAssessment {
    pub score: u8,
    pub probability: Probability,
    pub severity: Option<Severity>,
    /// `None` until a severity has been assessed.
    pub level: Option<RiskLevel>,
    pub action: Option<RecommendedAction>,
}

pub fn assess(score: u8, severity: Option<Severity>) -> Result<RiskAssessment, RiskError> {
    let probability = Probability::for_score(score)?;
    let level = severity.map(|s| classify(probability, s));
    Ok(RiskAssessment {
        score,
        probability,
        severity,
        level,
        action: level.map(|l| l.recommended_action()),
    })
}
