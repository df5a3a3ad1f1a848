//! Level-pay mortgage amortisation schedules.
//!
//! Turns a small set of loan parameters into the month-by-month payment
//! history of a fixed-rate loan: interest/principal split, standing
//! balance, and early payoff under recurring extra payments and one-off
//! special payments. All math in `rust_decimal::Decimal`, published
//! amounts rounded to whole cents.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::MortgageError;
use crate::period::Period;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// One cent, the smallest payment increment.
const CENT: Decimal = dec!(0.01);

/// Yearly rate above which results are flagged as suspicious.
const HIGH_RATE_THRESHOLD: Decimal = dec!(0.20);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Loan parameters for a single amortisation scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Money initially borrowed or still owed to the bank.
    pub principal: Money,
    /// Nominal yearly mortgage rate (e.g. 0.0225 = 2.25%).
    #[serde(default = "default_yearly_rate")]
    pub yearly_rate: Rate,
    /// Loan duration in months, e.g. 15 years is 180 months.
    #[serde(default = "default_duration")]
    pub duration: u32,
    /// Recurring extra principal payment.
    #[serde(default)]
    pub extra_payment: Money,
    /// Cadence at which the extra payment recurs.
    #[serde(default = "default_extra_payment_period")]
    pub extra_payment_period: Period,
    /// One-off principal reductions keyed by zero-based month index.
    #[serde(default)]
    pub special_payments: BTreeMap<u32, Money>,
}

fn default_yearly_rate() -> Rate {
    dec!(0.0225)
}

fn default_duration() -> u32 {
    180
}

fn default_extra_payment_period() -> Period {
    Period::Month
}

impl LoanParameters {
    /// Parameters for `principal` with every optional knob at its default:
    /// 2.25% yearly rate over 180 months, no extra or special payments.
    pub fn new(principal: Money) -> Self {
        LoanParameters {
            principal,
            yearly_rate: default_yearly_rate(),
            duration: default_duration(),
            extra_payment: Decimal::ZERO,
            extra_payment_period: default_extra_payment_period(),
            special_payments: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One month of the amortisation schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRow {
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
}

/// Full engine output: the schedule plus its summary aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    /// Fixed nominal monthly payment, rounded to cents.
    pub monthly_payment: Money,
    /// Effective monthly rate derived from annual compounding.
    pub monthly_rate: Rate,
    /// Month-by-month rows; shorter than `duration` on early payoff.
    pub rows: Vec<PaymentRow>,
    /// Number of months until the balance reached zero.
    pub months_to_payoff: u32,
    /// Sum of interest expenses over the whole schedule.
    pub total_interest: Money,
    /// Sum of principal expenses over the whole schedule.
    pub total_principal: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the month-by-month amortisation schedule for a loan.
///
/// The schedule runs until the requested duration elapses or the balance
/// reaches zero, whichever happens first. Recurring extra payments land
/// after the scheduled principal of their month; special payments land
/// after the recurring extra payment of the same month. That ordering can
/// move the payoff boundary by a month and is part of the contract.
pub fn compute_schedule(
    params: &LoanParameters,
) -> MortgageResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate(params)?;

    if params.yearly_rate > HIGH_RATE_THRESHOLD {
        warnings.push(format!(
            "Yearly rate {} is unusually high; results may be unreliable",
            params.yearly_rate
        ));
    }

    let monthly_rate = effective_monthly_rate(params.yearly_rate);
    let monthly_payment = fixed_monthly_payment(params.principal, monthly_rate, params.duration);

    if params.extra_payment > monthly_payment {
        warnings.push(format!(
            "Recurring extra payment {} exceeds the scheduled monthly payment {}",
            params.extra_payment, monthly_payment
        ));
    }

    let extra_cycle = params.extra_payment_period.months();
    let mut rows: Vec<PaymentRow> = Vec::with_capacity(params.duration as usize);
    let mut remaining = params.principal;
    let mut months_left = params.duration;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;

    while months_left > 0 && remaining > Decimal::ZERO {
        let month_number = rows.len() as u32;

        let interest = (remaining * monthly_rate).round_dp(2);
        let mut principal_part = (monthly_payment - interest).round_dp(2);

        // Payoff guard: paying one cent past the balance forces it through
        // zero instead of stranding rounding drift on the terminal row.
        if remaining <= principal_part {
            principal_part = remaining.round_dp(2) + CENT;
        }

        remaining -= principal_part;

        // Extra payment on every completed multiple of its cadence.
        if (month_number + 1) % extra_cycle == 0 {
            remaining -= params.extra_payment;
        }
        // One-off special payment of the same month lands last.
        if let Some(amount) = params.special_payments.get(&month_number) {
            remaining -= *amount;
        }

        remaining = remaining.round_dp(2);
        months_left -= 1;
        total_interest += interest;
        total_principal += principal_part;

        rows.push(PaymentRow {
            month_number,
            n_months_remaining: months_left,
            standing_principal: remaining,
            monthly_interest_expense: interest,
            monthly_principal_expense: principal_part,
        });
    }

    let months_to_payoff = rows.len() as u32;
    let output = AmortizationOutput {
        monthly_payment,
        monthly_rate,
        rows,
        months_to_payoff,
        total_interest,
        total_principal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Pay Amortisation Schedule",
        params,
        warnings,
        elapsed,
        output,
    ))
}

/// Effective monthly rate under annual compounding:
/// `(1 + yearly_rate)^(1/12) - 1`, not `yearly_rate / 12`.
pub fn effective_monthly_rate(yearly_rate: Rate) -> Rate {
    if yearly_rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    nth_root(Decimal::ONE + yearly_rate, 12) - Decimal::ONE
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// Fixed nominal payment from the standard annuity formula, rounded to
/// cents before any use. The rounding is what makes the payoff guard
/// necessary in the final month.
fn fixed_monthly_payment(principal: Money, monthly_rate: Rate, duration: u32) -> Money {
    if monthly_rate <= Decimal::ZERO {
        // Zero-rate: equal principal instalments.
        return (principal / Decimal::from(duration)).round_dp(2);
    }
    let factor = pow_int(Decimal::ONE + monthly_rate, duration);
    (principal * monthly_rate * factor / (factor - Decimal::ONE)).round_dp(2)
}

fn validate(params: &LoanParameters) -> MortgageResult<()> {
    if params.principal <= Decimal::ZERO {
        return Err(MortgageError::InvalidParameter {
            field: "principal".into(),
            value: params.principal.to_string(),
            reason: "must be positive".into(),
        });
    }
    if params.duration == 0 {
        return Err(MortgageError::InvalidParameter {
            field: "duration".into(),
            value: params.duration.to_string(),
            reason: "must be at least one month".into(),
        });
    }
    if params.yearly_rate < Decimal::ZERO {
        return Err(MortgageError::InvalidParameter {
            field: "yearly_rate".into(),
            value: params.yearly_rate.to_string(),
            reason: "cannot be negative".into(),
        });
    }
    if params.extra_payment < Decimal::ZERO {
        return Err(MortgageError::InvalidParameter {
            field: "extra_payment".into(),
            value: params.extra_payment.to_string(),
            reason: "cannot be negative".into(),
        });
    }
    for (&month, &amount) in &params.special_payments {
        if amount < Decimal::ZERO {
            return Err(MortgageError::InvalidSpecialPayment {
                month,
                reason: format!("amount {} is negative", amount),
            });
        }
        if month >= params.duration {
            return Err(MortgageError::InvalidSpecialPayment {
                month,
                reason: format!("month index is past the {}-month duration", params.duration),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Decimal math helpers (no f64, no powd)
// ---------------------------------------------------------------------------

/// base^n by iterative multiplication.
fn pow_int(base: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result *= base;
    }
    result
}

/// nth root of x via Newton's method (40 iterations).
fn nth_root(x: Decimal, n: u32) -> Decimal {
    if x == Decimal::ONE || x == Decimal::ZERO {
        return x;
    }

    let n_dec = Decimal::from(n);
    let n_minus_1 = n - 1;
    let mut guess = Decimal::ONE;

    for _ in 0..40 {
        let g_n_minus_1 = pow_int(guess, n_minus_1);
        if g_n_minus_1.is_zero() {
            break;
        }

        let delta = (g_n_minus_1 * guess - x) / (n_dec * g_n_minus_1);
        guess -= delta;

        if delta.abs() < dec!(0.0000000000001) {
            break;
        }
    }

    guess
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.01);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn standard_loan() -> LoanParameters {
        LoanParameters::new(dec!(140000))
    }

    fn run(params: &LoanParameters) -> AmortizationOutput {
        compute_schedule(params).unwrap().result
    }

    // -----------------------------------------------------------------------
    // 1. Effective monthly rate from annual compounding
    // -----------------------------------------------------------------------
    #[test]
    fn test_effective_monthly_rate() {
        let rate = effective_monthly_rate(dec!(0.0225));
        // (1.0225)^(1/12) - 1 = 0.0018559375...
        assert_close(
            rate,
            dec!(0.0018559375),
            dec!(0.000000001),
            "monthly rate for 2.25% yearly",
        );
        // Compounding back over 12 months recovers the yearly rate.
        let compounded = pow_int(Decimal::ONE + rate, 12) - Decimal::ONE;
        assert_close(
            compounded,
            dec!(0.0225),
            dec!(0.000000000001),
            "12-month compounding round trip",
        );
    }

    #[test]
    fn test_effective_monthly_rate_zero() {
        assert_eq!(effective_monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 2. Fixed payment for the reference loan
    // -----------------------------------------------------------------------
    #[test]
    fn test_fixed_monthly_payment_value() {
        let out = run(&standard_loan());
        assert_eq!(out.monthly_payment, dec!(915.63));
    }

    // -----------------------------------------------------------------------
    // 3. First-row split
    // -----------------------------------------------------------------------
    #[test]
    fn test_first_row_split() {
        let out = run(&standard_loan());
        let first = &out.rows[0];
        assert_eq!(first.month_number, 0);
        assert_eq!(first.n_months_remaining, 179);
        assert_eq!(first.monthly_interest_expense, dec!(259.83));
        assert_eq!(first.monthly_principal_expense, dec!(655.80));
    }

    // -----------------------------------------------------------------------
    // 4. Full-term schedule pays off within one cent of zero
    // -----------------------------------------------------------------------
    #[test]
    fn test_full_term_payoff() {
        let out = run(&standard_loan());
        assert_eq!(out.rows.len(), 180);
        let last = out.rows.last().unwrap();
        assert_eq!(last.n_months_remaining, 0);
        assert_close(
            last.standing_principal,
            Decimal::ZERO,
            TOL,
            "terminal standing principal",
        );
        // The payoff guard forces exact zero or a one-cent credit.
        assert!(last.standing_principal <= Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 5. Principal expenses reconstruct the original principal
    // -----------------------------------------------------------------------
    #[test]
    fn test_principal_reconstruction() {
        let out = run(&standard_loan());
        assert_close(
            out.total_principal,
            dec!(140000),
            TOL,
            "summed principal expenses",
        );
        assert_close(
            out.total_interest,
            dec!(24813.01),
            TOL,
            "summed interest expenses",
        );
    }

    // -----------------------------------------------------------------------
    // 6. Standing principal is non-increasing
    // -----------------------------------------------------------------------
    #[test]
    fn test_standing_principal_monotone() {
        let out = run(&standard_loan());
        for window in out.rows.windows(2) {
            assert!(
                window[1].standing_principal <= window[0].standing_principal,
                "standing principal should not increase: {} -> {}",
                window[0].standing_principal,
                window[1].standing_principal
            );
        }
    }

    // -----------------------------------------------------------------------
    // 7. Interest + principal reconstructs the fixed payment pre-terminally
    // -----------------------------------------------------------------------
    #[test]
    fn test_fixed_payment_invariant() {
        let out = run(&standard_loan());
        for row in &out.rows[..out.rows.len() - 1] {
            assert_eq!(
                row.monthly_interest_expense + row.monthly_principal_expense,
                out.monthly_payment,
                "month {} should pay exactly the fixed payment",
                row.month_number
            );
        }
    }

    // -----------------------------------------------------------------------
    // 8. Reference scenario: extra and special payments shorten the loan
    // -----------------------------------------------------------------------
    #[test]
    fn test_extra_and_special_payments_shorten_schedule() {
        let baseline = run(&standard_loan());

        let mut params = standard_loan();
        params.extra_payment = dec!(50);
        params.special_payments = BTreeMap::from([(12, dec!(5000)), (24, dec!(5000))]);
        let out = run(&params);

        assert!(out.rows.len() < 180, "early payoff expected");
        assert_eq!(out.rows.len(), 156);
        assert!(out.rows.len() <= baseline.rows.len());
        // The first month is untouched by later extra payments.
        assert_eq!(out.rows[0].monthly_interest_expense, dec!(259.83));
        assert!(out.total_interest < baseline.total_interest);
    }

    // -----------------------------------------------------------------------
    // 9. Special payment lands after the recurring extra payment
    // -----------------------------------------------------------------------
    #[test]
    fn test_special_payment_application() {
        let mut params = standard_loan();
        params.extra_payment = dec!(50);
        params.special_payments = BTreeMap::from([(12, dec!(5000))]);
        let out = run(&params);

        // Month 12's balance drop is its principal portion plus the
        // recurring 50 plus the one-off 5000, to the cent.
        let drop = out.rows[11].standing_principal - out.rows[12].standing_principal;
        assert_eq!(
            drop,
            out.rows[12].monthly_principal_expense + dec!(50) + dec!(5000)
        );
    }

    // -----------------------------------------------------------------------
    // 10. Extra payment cadence: trimester extras land on months 3, 6, ...
    // -----------------------------------------------------------------------
    #[test]
    fn test_extra_payment_trimester_cadence() {
        let mut params = LoanParameters::new(dec!(120000));
        params.yearly_rate = dec!(0.03);
        params.duration = 120;
        params.extra_payment = dec!(300);
        params.extra_payment_period = Period::Trimester;
        let out = run(&params);

        // Month 2 (second completed month): no extra payment.
        let drop_plain = out.rows[0].standing_principal - out.rows[1].standing_principal;
        assert_eq!(drop_plain, out.rows[1].monthly_principal_expense);
        // Month 3 (third completed month): extra payment applies.
        let drop_extra = out.rows[1].standing_principal - out.rows[2].standing_principal;
        assert_eq!(drop_extra, out.rows[2].monthly_principal_expense + dec!(300));

        assert!(out.rows.len() < 120, "trimester extras still shorten the loan");
    }

    // -----------------------------------------------------------------------
    // 11. Boundary: duration of one month
    // -----------------------------------------------------------------------
    #[test]
    fn test_single_month_duration() {
        let mut params = standard_loan();
        params.duration = 1;
        let out = run(&params);

        assert_eq!(out.rows.len(), 1);
        let row = &out.rows[0];
        assert_eq!(row.n_months_remaining, 0);
        assert_close(row.standing_principal, Decimal::ZERO, TOL, "single-month payoff");
        assert_close(
            row.monthly_principal_expense,
            dec!(140000),
            TOL,
            "single-month principal expense",
        );
    }

    // -----------------------------------------------------------------------
    // 12. Zero-rate loan: equal principal instalments, no interest
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_rate_loan() {
        let mut params = LoanParameters::new(dec!(3600));
        params.yearly_rate = Decimal::ZERO;
        params.duration = 12;
        let out = run(&params);

        assert_eq!(out.monthly_payment, dec!(300));
        assert_eq!(out.rows.len(), 12);
        for row in &out.rows {
            assert_eq!(row.monthly_interest_expense, Decimal::ZERO);
        }
        assert_close(
            out.rows.last().unwrap().standing_principal,
            Decimal::ZERO,
            TOL,
            "zero-rate payoff",
        );
    }

    // -----------------------------------------------------------------------
    // 13. Validation: non-positive principal
    // -----------------------------------------------------------------------
    #[test]
    fn test_validation_non_positive_principal() {
        let mut params = standard_loan();
        params.principal = Decimal::ZERO;
        let result = compute_schedule(&params);
        assert!(matches!(
            result,
            Err(MortgageError::InvalidParameter { ref field, .. }) if field == "principal"
        ));
    }

    // -----------------------------------------------------------------------
    // 14. Validation: zero duration
    // -----------------------------------------------------------------------
    #[test]
    fn test_validation_zero_duration() {
        let mut params = standard_loan();
        params.duration = 0;
        let result = compute_schedule(&params);
        assert!(matches!(
            result,
            Err(MortgageError::InvalidParameter { ref field, .. }) if field == "duration"
        ));
    }

    // -----------------------------------------------------------------------
    // 15. Validation: negative rate and extra payment
    // -----------------------------------------------------------------------
    #[test]
    fn test_validation_negative_amounts() {
        let mut params = standard_loan();
        params.yearly_rate = dec!(-0.01);
        assert!(compute_schedule(&params).is_err());

        let mut params = standard_loan();
        params.extra_payment = dec!(-5);
        assert!(compute_schedule(&params).is_err());
    }

    // -----------------------------------------------------------------------
    // 16. Validation: special payments
    // -----------------------------------------------------------------------
    #[test]
    fn test_validation_special_payments() {
        let mut params = standard_loan();
        params.special_payments = BTreeMap::from([(12, dec!(-100))]);
        assert!(matches!(
            compute_schedule(&params),
            Err(MortgageError::InvalidSpecialPayment { month: 12, .. })
        ));

        let mut params = standard_loan();
        params.special_payments = BTreeMap::from([(180, dec!(1000))]);
        assert!(matches!(
            compute_schedule(&params),
            Err(MortgageError::InvalidSpecialPayment { month: 180, .. })
        ));
    }

    // -----------------------------------------------------------------------
    // 17. Warning on implausibly high rate
    // -----------------------------------------------------------------------
    #[test]
    fn test_high_rate_warning() {
        let mut params = standard_loan();
        params.yearly_rate = dec!(0.30);
        let out = compute_schedule(&params).unwrap();
        assert!(!out.warnings.is_empty());
    }

    // -----------------------------------------------------------------------
    // 18. Metadata is populated
    // -----------------------------------------------------------------------
    #[test]
    fn test_metadata_populated() {
        let out = compute_schedule(&standard_loan()).unwrap();
        assert!(out.methodology.contains("Amortisation"));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
