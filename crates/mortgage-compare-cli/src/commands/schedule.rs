use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;

use mortgage_compare_core::period::Period;
use mortgage_compare_core::schedule::amortization::LoanParameters;
use mortgage_compare_core::schedule::compose::{build_schedule, ScenarioParameters};
use mortgage_compare_core::schedule::escrow::EscrowParameters;

use crate::input;

/// Arguments for schedule computation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Money initially borrowed or still owed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal yearly mortgage rate (e.g. 0.0225 for 2.25%)
    #[arg(long, default_value = "0.0225")]
    pub yearly_rate: Decimal,

    /// Loan duration in months (e.g. 180 for 15 years)
    #[arg(long, default_value = "180")]
    pub duration: u32,

    /// Recurring extra principal payment
    #[arg(long, default_value = "0")]
    pub extra_payment: Decimal,

    /// Cadence of the extra payment in months (1, 3, 6 or 12)
    #[arg(long, default_value = "1")]
    pub extra_payment_period: u32,

    /// One-off special payment as MONTH=AMOUNT (repeatable)
    #[arg(long = "special-payment", value_name = "MONTH=AMOUNT")]
    pub special_payments: Vec<String>,

    /// Escrow paid every month of the first cycle
    #[arg(long, default_value = "200")]
    pub initial_escrow: Decimal,

    /// Escrow growth rate per cycle (e.g. 0.01 for 1%)
    #[arg(long, default_value = "0.01")]
    pub escrow_growth_rate: Decimal,

    /// Cadence of escrow growth in months (1, 3, 6 or 12)
    #[arg(long, default_value = "12")]
    pub escrow_period: u32,

    /// Path to JSON scenario file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario: ScenarioParameters = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        scenario_from_flags(&args)?
    };

    let result = build_schedule(&scenario)?;
    Ok(serde_json::to_value(result)?)
}

fn scenario_from_flags(args: &ScheduleArgs) -> Result<ScenarioParameters, Box<dyn std::error::Error>> {
    let principal = args
        .principal
        .ok_or("--principal is required (or provide --input)")?;

    Ok(ScenarioParameters {
        loan: LoanParameters {
            principal,
            yearly_rate: args.yearly_rate,
            duration: args.duration,
            extra_payment: args.extra_payment,
            extra_payment_period: Period::from_months(args.extra_payment_period)?,
            special_payments: parse_special_payments(&args.special_payments)?,
        },
        escrow: EscrowParameters {
            initial_escrow: args.initial_escrow,
            escrow_growth_rate: args.escrow_growth_rate,
            escrow_period: Period::from_months(args.escrow_period)?,
        },
    })
}

/// Parse repeated MONTH=AMOUNT pairs into the special payment map.
fn parse_special_payments(
    pairs: &[String],
) -> Result<BTreeMap<u32, Decimal>, Box<dyn std::error::Error>> {
    let mut payments = BTreeMap::new();
    for pair in pairs {
        let (month, amount) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected MONTH=AMOUNT, got '{}'", pair))?;
        let month: u32 = month
            .trim()
            .parse()
            .map_err(|_| format!("invalid month index in '{}'", pair))?;
        let amount: Decimal = amount
            .trim()
            .parse()
            .map_err(|_| format!("invalid amount in '{}'", pair))?;
        payments.insert(month, amount);
    }
    Ok(payments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_special_payments() {
        let pairs = vec!["12=5000".to_string(), "24 = 2500.50".to_string()];
        let payments = parse_special_payments(&pairs).unwrap();
        assert_eq!(payments.get(&12), Some(&Decimal::from(5000)));
        assert_eq!(payments.get(&24), Some(&"2500.50".parse::<Decimal>().unwrap()));
    }

    #[test]
    fn test_parse_special_payments_rejects_malformed() {
        assert!(parse_special_payments(&["12".to_string()]).is_err());
        assert!(parse_special_payments(&["x=5000".to_string()]).is_err());
        assert!(parse_special_payments(&["12=abc".to_string()]).is_err());
    }
}
