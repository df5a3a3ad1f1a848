use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_compare_core::period::Period;
use mortgage_compare_core::schedule::escrow::{project_escrow, EscrowParameters};

/// Arguments for standalone escrow projection
#[derive(Args)]
pub struct EscrowArgs {
    /// Escrow paid every month of the first cycle
    #[arg(long, default_value = "200")]
    pub initial_escrow: Decimal,

    /// Escrow growth rate per cycle (e.g. 0.01 for 1%)
    #[arg(long, default_value = "0.01")]
    pub escrow_growth_rate: Decimal,

    /// Cadence of escrow growth in months (1, 3, 6 or 12)
    #[arg(long, default_value = "12")]
    pub escrow_period: u32,

    /// Number of months to project
    #[arg(long, default_value = "180")]
    pub duration: u32,
}

pub fn run_escrow(args: EscrowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = EscrowParameters {
        initial_escrow: args.initial_escrow,
        escrow_growth_rate: args.escrow_growth_rate,
        escrow_period: Period::from_months(args.escrow_period)?,
    };

    let series = project_escrow(&params, args.duration)?;
    Ok(serde_json::to_value(series)?)
}
