//! Side-by-side comparison of two payment scenarios.
//!
//! Builds both composed schedules and reduces them to the figures worth
//! comparing: payoff horizon, interest, escrow, and the savings from
//! switching between them.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::schedule::compose::{build_schedule, ScenarioParameters, Schedule};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::MortgageResult;

/// Two scenarios to compare.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub baseline: ScenarioParameters,
    pub alternative: ScenarioParameters,
}

/// The figures one scenario reduces to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSummary {
    /// Fixed nominal monthly payment.
    pub monthly_payment: Money,
    /// Months until the balance reached zero.
    pub months_to_payoff: u32,
    /// Payoff horizon, whole years.
    pub payoff_years: u32,
    /// Payoff horizon, remaining months.
    pub payoff_months: u32,
    /// Interest paid over the life of the loan.
    pub total_interest: Money,
    /// Escrow paid over the life of the loan.
    pub total_escrow: Money,
    /// Everything paid: principal, interest and escrow.
    pub total_paid: Money,
}

/// Comparison output: both summaries plus the deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub baseline: ScenarioSummary,
    pub alternative: ScenarioSummary,
    /// Months the alternative pays off earlier (negative if later).
    pub months_saved: i64,
    /// Interest the alternative avoids (negative if it pays more).
    pub interest_saved: Money,
}

/// Compare two payment scenarios.
///
/// Each schedule is computed independently; warnings from both builds are
/// concatenated in order.
pub fn compare_scenarios(
    input: &ComparisonInput,
) -> MortgageResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();

    let baseline = build_schedule(&input.baseline)?;
    let alternative = build_schedule(&input.alternative)?;

    let mut warnings = baseline.warnings;
    warnings.extend(alternative.warnings);

    let output = ComparisonOutput {
        months_saved: i64::from(baseline.result.months_to_payoff)
            - i64::from(alternative.result.months_to_payoff),
        interest_saved: baseline.result.total_interest - alternative.result.total_interest,
        baseline: summarize(&baseline.result),
        alternative: summarize(&alternative.result),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Scenario Comparison",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn summarize(schedule: &Schedule) -> ScenarioSummary {
    ScenarioSummary {
        monthly_payment: schedule.monthly_payment,
        months_to_payoff: schedule.months_to_payoff,
        payoff_years: schedule.months_to_payoff / 12,
        payoff_months: schedule.months_to_payoff % 12,
        total_interest: schedule.total_interest,
        total_escrow: schedule.total_escrow,
        total_paid: schedule.total_principal + schedule.total_interest + schedule.total_escrow,
    }
}
