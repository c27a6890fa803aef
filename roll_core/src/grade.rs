//! Grading - naming how well or badly a roll went

use sheet_core::{Character, Statistic};
use std::fmt;

/// Tier of a roll result, from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollGrade {
    CriticalSuccess,
    AmazingSuccess,
    GreatSuccess,
    GoodSuccess,
    DecentSuccess,
    MarginalSuccess,
    NarrowFailure,
    ClumsyFailure,
    PoorFailure,
    BadFailure,
    TerribleFailure,
    CriticalFailure,
}

impl RollGrade {
    pub fn from_percentage(result: f64) -> Self {
        if result >= 0.0 {
            match result {
                r if r >= 95.0 => RollGrade::CriticalSuccess,
                r if r >= 80.0 => RollGrade::AmazingSuccess,
                r if r >= 50.0 => RollGrade::GreatSuccess,
                r if r >= 25.0 => RollGrade::GoodSuccess,
                r if r >= 10.0 => RollGrade::DecentSuccess,
                _ => RollGrade::MarginalSuccess,
            }
        } else {
            match result {
                r if r <= -125.0 => RollGrade::CriticalFailure,
                r if r <= -80.0 => RollGrade::TerribleFailure,
                r if r <= -50.0 => RollGrade::BadFailure,
                r if r <= -25.0 => RollGrade::PoorFailure,
                r if r <= -10.0 => RollGrade::ClumsyFailure,
                _ => RollGrade::NarrowFailure,
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            RollGrade::CriticalSuccess
                | RollGrade::AmazingSuccess
                | RollGrade::GreatSuccess
                | RollGrade::GoodSuccess
                | RollGrade::DecentSuccess
                | RollGrade::MarginalSuccess
        )
    }

    /// Headline for a roll of `statistic`
    pub fn headline(&self, statistic: &str) -> String {
        match self {
            RollGrade::CriticalSuccess => {
                format!("CRITICAL {} SUCCESS!!!", statistic.to_uppercase())
            }
            RollGrade::AmazingSuccess => format!("Amazing {statistic} success!!"),
            RollGrade::GreatSuccess => format!("Great {statistic} success!"),
            RollGrade::GoodSuccess => format!("Good {statistic} success."),
            RollGrade::DecentSuccess => format!("Decent {statistic} success."),
            RollGrade::MarginalSuccess => format!("Marginal {statistic} success."),
            RollGrade::NarrowFailure => format!("Narrow {statistic} failure."),
            RollGrade::ClumsyFailure => format!("Clumsy {statistic} failure."),
            RollGrade::PoorFailure => format!("Poor {statistic} failure."),
            RollGrade::BadFailure => format!("Bad {statistic} failure!"),
            RollGrade::TerribleFailure => format!("Terrible {statistic} failure!!"),
            RollGrade::CriticalFailure => {
                format!("CRITICAL {} FAILURE!!!", statistic.to_uppercase())
            }
        }
    }
}

impl fmt::Display for RollGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RollGrade::CriticalSuccess => "critical success",
            RollGrade::AmazingSuccess => "amazing success",
            RollGrade::GreatSuccess => "great success",
            RollGrade::GoodSuccess => "good success",
            RollGrade::DecentSuccess => "decent success",
            RollGrade::MarginalSuccess => "marginal success",
            RollGrade::NarrowFailure => "narrow failure",
            RollGrade::ClumsyFailure => "clumsy failure",
            RollGrade::PoorFailure => "poor failure",
            RollGrade::BadFailure => "bad failure",
            RollGrade::TerribleFailure => "terrible failure",
            RollGrade::CriticalFailure => "critical failure",
        };
        write!(f, "{name}")
    }
}

/// Grade a roll result into a message naming the character and the margin
pub fn roll_message(statistic: &Statistic, character: &Character, result: f64) -> String {
    let grade = RollGrade::from_percentage(result);
    let verb = if grade.is_success() { "succeeded" } else { "failed" };
    format!(
        "{} {} {} by {}%.",
        grade.headline(&statistic.name),
        character.name,
        verb,
        result.abs()
    )
}
