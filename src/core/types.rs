use std::error::Error;
use std::fmt;

use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CompoundingFrequency {
    Annually,
    Quarterly,
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Daily => 365,
        }
    }

    /// Maps the numeric form used by the web frontend's frequency selector.
    pub fn from_periods_per_year(periods: u32) -> Option<Self> {
        match periods {
            1 => Some(CompoundingFrequency::Annually),
            4 => Some(CompoundingFrequency::Quarterly),
            12 => Some(CompoundingFrequency::Monthly),
            365 => Some(CompoundingFrequency::Daily),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectionInputs {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
    pub frequency: CompoundingFrequency,
    pub monthly_contribution: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyCheckpoint {
    pub year: u32,
    pub balance: f64,
    pub cumulative_interest: f64,
    pub cumulative_contributions: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub final_balance: f64,
    pub total_interest_earned: f64,
    pub total_contributions: f64,
    pub checkpoints: Vec<YearlyCheckpoint>,
}

/// One of the three fixed what-if projections shown next to the primary run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub name: &'static str,
    pub final_amount: f64,
    pub interest_earned: f64,
    pub total_contributions: f64,
}

/// Returned when the engine is handed input outside its documented domain.
/// The HTTP/CLI boundary range-checks first, so hitting this from the
/// server path means a validation gap, not a user error.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InvalidInput {
    Principal,
    AnnualRate,
    Years,
    MonthlyContribution,
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInput::Principal => {
                write!(f, "principal must be a finite amount >= 0")
            }
            InvalidInput::AnnualRate => {
                write!(f, "annual rate must be a finite percentage >= 0")
            }
            InvalidInput::Years => write!(f, "years must be >= 1"),
            InvalidInput::MonthlyContribution => {
                write!(f, "monthly contribution must be a finite amount >= 0")
            }
        }
    }
}

impl Error for InvalidInput {}
