use clap::Args;
use serde_json::Value;

use ipo_deal_core::deal::{self, DealTerms, IpoOutcomeInput};
use ipo_deal_core::presentation::{self, PriceControl};

use crate::input;

/// Arguments shared by every command that evaluates the deal
#[derive(Args)]
pub struct OutcomeArgs {
    /// Path to JSON input file with `ipo_price` and optional `terms`
    #[arg(long)]
    pub input: Option<String>,

    /// IPO share price (defaults to the control's default position)
    #[arg(long, allow_hyphen_values = true)]
    pub ipo_price: Option<f64>,

    /// Deal terms file (JSON or YAML); omitted fields keep the deal as struck
    #[arg(long)]
    pub terms: Option<String>,
}

/// Build the calculator input from a file, flags, stdin or defaults, in that order.
pub fn resolve_input(args: &OutcomeArgs) -> Result<IpoOutcomeInput, Box<dyn std::error::Error>> {
    let mut outcome_input: IpoOutcomeInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(ipo_price) = args.ipo_price {
        IpoOutcomeInput {
            ipo_price,
            terms: DealTerms::default(),
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        let default_price = PriceControl::default().default.to_string().parse::<f64>()?;
        tracing::debug!(ipo_price = default_price, "no IPO price given; using default");
        IpoOutcomeInput {
            ipo_price: default_price,
            terms: DealTerms::default(),
        }
    };

    if let Some(ref path) = args.terms {
        outcome_input.terms = input::file::read_config(path)?;
    }
    Ok(outcome_input)
}

pub fn run_outcome(args: OutcomeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let outcome_input = resolve_input(&args)?;
    let result = deal::evaluate_ipo_outcome(&outcome_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_waterfall(args: OutcomeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let outcome_input = resolve_input(&args)?;
    let result = deal::evaluate_ipo_outcome(&outcome_input)?;

    let bars = presentation::waterfall_bars(&result.result);
    Ok(serde_json::json!({
        "result": {
            "bars": bars,
            "net_position": result.result.cash_flows.net_position,
        },
        "methodology": "Cash flow: combined outlay, note proceeds, secondary value",
        "warnings": result.warnings,
    }))
}
