//! Schedule composition: amortisation rows joined with the escrow series.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::schedule::amortization::{compute_schedule, AmortizationOutput, LoanParameters};
use crate::schedule::escrow::{project_escrow, EscrowParameters};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::MortgageResult;

/// Full configuration record for one payment scenario: the loan plus the
/// escrow tracked alongside it. Deserializes from a JSON object with a
/// `loan` section and an optional `escrow` section; inside `loan`, every
/// field but `principal` has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioParameters {
    pub loan: LoanParameters,
    #[serde(default)]
    pub escrow: EscrowParameters,
}

impl ScenarioParameters {
    /// Scenario for `principal` with every other knob at its default.
    pub fn new(principal: Money) -> Self {
        ScenarioParameters {
            loan: LoanParameters::new(principal),
            escrow: EscrowParameters::default(),
        }
    }
}

/// One month of the composed schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Zero-based month index, oldest first.
    pub month_number: u32,
    /// Months left until the requested end of the loan.
    pub n_months_remaining: u32,
    /// Balance still owed after this month's payments.
    pub standing_principal: Money,
    /// Interest portion of this month's payment.
    pub monthly_interest_expense: Money,
    /// Principal portion of this month's payment.
    pub monthly_principal_expense: Money,
    /// Escrow due this month.
    pub escrow: Money,
    /// Running total of interest paid through this month.
    pub accumulated_interest: Money,
}

/// The composed schedule consumers read. Rows are ordered oldest first
/// and never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Fixed nominal monthly payment, rounded to cents.
    pub monthly_payment: Money,
    /// Month-by-month rows with the escrow column attached.
    pub rows: Vec<ScheduleRow>,
    /// Number of months until the balance reached zero.
    pub months_to_payoff: u32,
    /// Sum of interest expenses over the whole schedule.
    pub total_interest: Money,
    /// Sum of principal expenses over the whole schedule.
    pub total_principal: Money,
    /// Sum of escrow over the whole schedule.
    pub total_escrow: Money,
}

/// Attach the escrow series to an amortisation schedule element-wise.
///
/// The series is truncated to the schedule length (the schedule may be
/// shorter than the requested duration on early payoff); a series shorter
/// than the schedule is rejected. Each composed row also carries the
/// running interest total.
pub fn compose(payments: &AmortizationOutput, escrow_series: &[Money]) -> MortgageResult<Schedule> {
    if escrow_series.len() < payments.rows.len() {
        return Err(MortgageError::InvalidParameter {
            field: "escrow_series".into(),
            value: escrow_series.len().to_string(),
            reason: format!("shorter than the {}-row schedule", payments.rows.len()),
        });
    }

    let mut accumulated_interest = Decimal::ZERO;
    let mut total_escrow = Decimal::ZERO;
    let rows = payments
        .rows
        .iter()
        .zip(escrow_series)
        .map(|(row, &escrow)| {
            accumulated_interest += row.monthly_interest_expense;
            total_escrow += escrow;
            ScheduleRow {
                month_number: row.month_number,
                n_months_remaining: row.n_months_remaining,
                standing_principal: row.standing_principal,
                monthly_interest_expense: row.monthly_interest_expense,
                monthly_principal_expense: row.monthly_principal_expense,
                escrow,
                accumulated_interest,
            }
        })
        .collect();

    Ok(Schedule {
        monthly_payment: payments.monthly_payment,
        rows,
        months_to_payoff: payments.months_to_payoff,
        total_interest: payments.total_interest,
        total_principal: payments.total_principal,
        total_escrow,
    })
}

/// Compute the full composed schedule for one scenario: amortisation
/// engine, escrow projection, and composition in a single call.
pub fn build_schedule(
    scenario: &ScenarioParameters,
) -> MortgageResult<ComputationOutput<Schedule>> {
    let start = Instant::now();

    let payments = compute_schedule(&scenario.loan)?;
    let escrow_series = project_escrow(&scenario.escrow, scenario.loan.duration)?;
    let schedule = compose(&payments.result, &escrow_series)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Amortisation Schedule with Escrow",
        scenario,
        payments.warnings,
        elapsed,
        schedule,
    ))
}
