use super::types::{
    CompoundingFrequency, InvalidInput, ProjectionInputs, ProjectionResult, ScenarioResult,
    YearlyCheckpoint,
};

pub const SCENARIO_NO_CONTRIBUTIONS: &str = "No Monthly Contributions";
pub const SCENARIO_LOWER_RATE: &str = "Lower Interest Rate (5%)";
pub const SCENARIO_HIGHER_RATE: &str = "Higher Interest Rate (10%)";

const MONTHS_PER_YEAR: u32 = 12;

fn validate(inputs: &ProjectionInputs) -> Result<(), InvalidInput> {
    if !inputs.principal.is_finite() || inputs.principal < 0.0 {
        return Err(InvalidInput::Principal);
    }
    if !inputs.annual_rate_percent.is_finite() || inputs.annual_rate_percent < 0.0 {
        return Err(InvalidInput::AnnualRate);
    }
    if inputs.years == 0 {
        return Err(InvalidInput::Years);
    }
    if !inputs.monthly_contribution.is_finite() || inputs.monthly_contribution < 0.0 {
        return Err(InvalidInput::MonthlyContribution);
    }
    Ok(())
}

/// Runs the month-by-month projection and collects one checkpoint per
/// completed year.
///
/// Each month deposits the contribution first, then accrues interest at the
/// nominal monthly rate rescaled by `periods_per_year / 12`. That rescaling is
/// not a standard effective-rate conversion; it is the accrual model the
/// published calculator uses, kept verbatim so results match it digit for
/// digit. It also intentionally diverges from the closed form used by the
/// no-contributions scenario.
pub fn project(inputs: &ProjectionInputs) -> Result<ProjectionResult, InvalidInput> {
    validate(inputs)?;

    let monthly_rate = inputs.annual_rate_percent / 100.0 / MONTHS_PER_YEAR as f64;
    let period_scale = inputs.frequency.periods_per_year() as f64 / MONTHS_PER_YEAR as f64;
    let total_months = inputs.years * MONTHS_PER_YEAR;

    let mut balance = inputs.principal;
    let mut cumulative_contributions = inputs.principal;
    let mut cumulative_interest = 0.0;
    let mut checkpoints = Vec::with_capacity(inputs.years as usize);

    for month in 1..=total_months {
        balance += inputs.monthly_contribution;
        cumulative_contributions += inputs.monthly_contribution;

        let monthly_interest = balance * (monthly_rate / period_scale);
        balance += monthly_interest;
        cumulative_interest += monthly_interest;

        if month % MONTHS_PER_YEAR == 0 {
            checkpoints.push(YearlyCheckpoint {
                year: month / MONTHS_PER_YEAR,
                balance,
                cumulative_interest,
                cumulative_contributions,
            });
        }
    }

    Ok(ProjectionResult {
        final_balance: balance,
        total_interest_earned: cumulative_interest,
        total_contributions: cumulative_contributions,
        checkpoints,
    })
}

/// Standard closed-form compound interest, `P * (1 + r/n)^(n*t)`.
///
/// Only the no-contributions comparison scenario uses this; the iterative
/// `project` loop deliberately uses a different rate-scaling convention.
pub fn project_closed_form(
    principal: f64,
    annual_rate_percent: f64,
    years: u32,
    frequency: CompoundingFrequency,
) -> f64 {
    let periods = frequency.periods_per_year() as f64;
    principal * (1.0 + annual_rate_percent / 100.0 / periods).powf(periods * years as f64)
}

/// Iterative balance with a flat `rate/12` monthly accrual and no frequency
/// scaling, as the 5% and 10% comparison scenarios compute it.
fn accumulate_flat_monthly(
    principal: f64,
    monthly_contribution: f64,
    years: u32,
    annual_rate: f64,
) -> (f64, f64) {
    let monthly_rate = annual_rate / MONTHS_PER_YEAR as f64;
    let total_months = years * MONTHS_PER_YEAR;

    let mut balance = principal;
    let mut total_contributions = principal;
    for _ in 0..total_months {
        balance += monthly_contribution;
        total_contributions += monthly_contribution;
        balance += balance * monthly_rate;
    }
    (balance, total_contributions)
}

/// Builds the three fixed comparison scenarios shown against the primary run.
///
/// The no-contributions scenario reports interest as `final - principal`; the
/// fixed-rate scenarios report `final - totalContributions`. The asymmetry is
/// the published calculator's and is preserved.
pub fn build_comparison_scenarios(
    inputs: &ProjectionInputs,
) -> Result<[ScenarioResult; 3], InvalidInput> {
    validate(inputs)?;

    let no_contributions_final = project_closed_form(
        inputs.principal,
        inputs.annual_rate_percent,
        inputs.years,
        inputs.frequency,
    );
    let (lower_final, lower_contributions) = accumulate_flat_monthly(
        inputs.principal,
        inputs.monthly_contribution,
        inputs.years,
        0.05,
    );
    let (higher_final, higher_contributions) = accumulate_flat_monthly(
        inputs.principal,
        inputs.monthly_contribution,
        inputs.years,
        0.10,
    );

    Ok([
        ScenarioResult {
            name: SCENARIO_NO_CONTRIBUTIONS,
            final_amount: no_contributions_final,
            interest_earned: no_contributions_final - inputs.principal,
            total_contributions: inputs.principal,
        },
        ScenarioResult {
            name: SCENARIO_LOWER_RATE,
            final_amount: lower_final,
            interest_earned: lower_final - lower_contributions,
            total_contributions: lower_contributions,
        },
        ScenarioResult {
            name: SCENARIO_HIGHER_RATE,
            final_amount: higher_final,
            interest_earned: higher_final - higher_contributions,
            total_contributions: higher_contributions,
        },
    ])
}
