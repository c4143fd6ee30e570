use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::outcome::{NoteOutcome, SecondaryOutcome};
use super::terms::DealTerms;
use crate::types::Money;

/// How a waterfall bar is drawn relative to the bars before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// Starts from zero.
    Absolute,
    /// Stacks on the running total.
    Relative,
}

/// One bar of the cash-flow waterfall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStep {
    pub label: String,
    /// Signed cash movement (outflows negative).
    pub delta: Money,
    pub measure: Measure,
    /// Running total after this step.
    pub cumulative: Money,
}

/// Initial outlay followed by the two exits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowWaterfall {
    pub steps: Vec<CashFlowStep>,
    /// Sum of every delta: what the deal returned net of capital.
    pub net_position: Money,
}

pub const INITIAL_INVESTMENT_LABEL: &str = "Initial Investment";
pub const NOTE_RETURN_LABEL: &str = "Note Return";
pub const SECONDARY_RETURN_LABEL: &str = "Secondary Return";

/// Build the three-step waterfall: combined outlay, note proceeds, secondary value.
///
/// The running total saturates at the Decimal bounds.
pub fn build_waterfall(
    note: &NoteOutcome,
    secondary: &SecondaryOutcome,
    terms: &DealTerms,
) -> CashFlowWaterfall {
    let flows = [
        (
            INITIAL_INVESTMENT_LABEL,
            -terms.note.principal.saturating_add(secondary.cost_basis),
            Measure::Absolute,
        ),
        (NOTE_RETURN_LABEL, note.proceeds, Measure::Relative),
        (
            SECONDARY_RETURN_LABEL,
            secondary.market_value,
            Measure::Relative,
        ),
    ];

    let mut running = Decimal::ZERO;
    let steps: Vec<CashFlowStep> = flows
        .into_iter()
        .map(|(label, delta, measure)| {
            running = match measure {
                Measure::Absolute => delta,
                Measure::Relative => running.saturating_add(delta),
            };
            CashFlowStep {
                label: label.to_string(),
                delta,
                measure,
                cumulative: running,
            }
        })
        .collect();

    CashFlowWaterfall {
        net_position: running,
        steps,
    }
}
