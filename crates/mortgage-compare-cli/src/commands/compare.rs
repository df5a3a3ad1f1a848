use clap::Args;
use serde_json::Value;

use mortgage_compare_core::comparison::{compare_scenarios, ComparisonInput};

use crate::input;

/// Arguments for scenario comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file with baseline and alternative scenarios
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input: ComparisonInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for scenario comparison".into());
    };

    let result = compare_scenarios(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}
