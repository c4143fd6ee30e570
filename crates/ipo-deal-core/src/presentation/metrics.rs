use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::format;
use crate::deal::{DealTerms, IpoOutcome};

/// A labelled headline figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: Decimal,
    /// Formatted for display.
    pub display: String,
}

impl Metric {
    fn money(label: &str, value: Decimal) -> Self {
        Self {
            label: label.to_string(),
            value,
            display: format::currency(value),
        }
    }

    fn count(label: &str, value: Decimal) -> Self {
        Self {
            label: label.to_string(),
            value,
            display: format::count(value),
        }
    }
}

/// The six headline KPIs: three for the note, three for the secondary block.
pub fn headline_metrics(outcome: &IpoOutcome, terms: &DealTerms) -> Vec<Metric> {
    vec![
        Metric::money("Note Investment", terms.note.principal),
        Metric::money("Accrued Interest", outcome.note.accrued_interest),
        Metric::money("Note Payout Value", outcome.note.proceeds),
        Metric::count("Secondary Shares", Decimal::from(terms.secondary.shares)),
        Metric::money("Secondary Investment", outcome.secondary.cost_basis),
        Metric::money("Secondary Value at IPO", outcome.secondary.market_value),
    ]
}
