use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use ipo_deal_core::deal;
use ipo_deal_core::presentation::{self, PriceControl};

use super::deal::{resolve_input, OutcomeArgs};

/// Arguments for the dashboard view
#[derive(Args)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub outcome: OutcomeArgs,

    /// Snap the IPO price to the nearest control position first
    #[arg(long)]
    pub snap: bool,
}

/// Arguments for describing the price control
#[derive(Args)]
pub struct ControlArgs {
    /// Price to snap to the nearest control position
    #[arg(long, allow_hyphen_values = true)]
    pub snap: Option<Decimal>,

    /// Include every admissible position
    #[arg(long)]
    pub ticks: bool,
}

pub fn run_dashboard(args: DashboardArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut outcome_input = resolve_input(&args.outcome)?;

    if args.snap {
        let price = Decimal::try_from(outcome_input.ipo_price)?;
        let snapped = PriceControl::default().snap(price);
        tracing::debug!(from = %price, to = %snapped, "snapped IPO price");
        outcome_input.ipo_price = snapped.to_string().parse()?;
    }

    let result = deal::evaluate_ipo_outcome(&outcome_input)?;
    let dashboard = presentation::render_dashboard(&result, &outcome_input.terms)?;
    Ok(serde_json::to_value(dashboard)?)
}

pub fn run_control(args: ControlArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let control = PriceControl::default();
    let mut value = serde_json::to_value(control)?;

    if let Value::Object(ref mut map) = value {
        if let Some(price) = args.snap {
            map.insert("snapped".into(), serde_json::to_value(control.snap(price))?);
        }
        if args.ticks {
            map.insert("ticks".into(), serde_json::to_value(control.ticks())?);
        }
    }
    Ok(value)
}
