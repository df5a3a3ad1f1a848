//! Escrow growth projection.
//!
//! Escrow (taxes, insurance) is tracked alongside the loan but grows on
//! its own cadence: every month inside one growth cycle carries the same
//! amount, and the amount steps up by the growth rate at cycle boundaries.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::period::Period;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// Escrow growth parameters for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowParameters {
    /// Escrow paid every month of the first cycle.
    #[serde(default = "default_initial_escrow")]
    pub initial_escrow: Money,
    /// Growth rate applied once per cycle (e.g. 0.01 = 1%).
    #[serde(default = "default_escrow_growth_rate")]
    pub escrow_growth_rate: Rate,
    /// Cadence at which the escrow steps up.
    #[serde(default = "default_escrow_period")]
    pub escrow_period: Period,
}

fn default_initial_escrow() -> Money {
    dec!(200)
}

fn default_escrow_growth_rate() -> Rate {
    dec!(0.01)
}

fn default_escrow_period() -> Period {
    Period::Year
}

impl Default for EscrowParameters {
    fn default() -> Self {
        EscrowParameters {
            initial_escrow: default_initial_escrow(),
            escrow_growth_rate: default_escrow_growth_rate(),
            escrow_period: default_escrow_period(),
        }
    }
}

/// Project the monthly escrow series over `duration` months.
///
/// The series covers whole growth cycles: its length is `duration`
/// rounded up to the next multiple of the cycle length, and the caller
/// discards entries beyond the actual schedule. The compounding
/// accumulator stays unrounded; only the published monthly amount is
/// rounded to cents.
pub fn project_escrow(params: &EscrowParameters, duration: u32) -> MortgageResult<Vec<Money>> {
    validate(params, duration)?;

    let cycle = params.escrow_period.months();
    let cycles = duration.div_ceil(cycle);
    let growth = Decimal::ONE + params.escrow_growth_rate;

    let mut series = Vec::with_capacity((cycles * cycle) as usize);
    let mut value = params.initial_escrow;
    for _ in 0..cycles {
        let amount = value.round_dp(2);
        for _ in 0..cycle {
            series.push(amount);
        }
        value *= growth;
    }

    Ok(series)
}

fn validate(params: &EscrowParameters, duration: u32) -> MortgageResult<()> {
    if duration == 0 {
        return Err(MortgageError::InvalidParameter {
            field: "duration".into(),
            value: duration.to_string(),
            reason: "must be at least one month".into(),
        });
    }
    if params.initial_escrow < Decimal::ZERO {
        return Err(MortgageError::InvalidParameter {
            field: "initial_escrow".into(),
            value: params.initial_escrow.to_string(),
            reason: "cannot be negative".into(),
        });
    }
    if params.escrow_growth_rate < Decimal::ZERO {
        return Err(MortgageError::InvalidParameter {
            field: "escrow_growth_rate".into(),
            value: params.escrow_growth_rate.to_string(),
            reason: "cannot be negative".into(),
        });
    }
    Ok(())
}
