use serde::{Deserialize, Serialize};

use super::format;
use super::metrics::{headline_metrics, Metric};
use super::narrative::{render_narrative, NarrativeSection};
use crate::deal::{DealTerms, IpoOutcome, Measure};
use crate::types::{ComputationOutput, Money};
use crate::DealResult;

/// A waterfall bar ready for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallBar {
    pub label: String,
    pub value: Money,
    pub measure: Measure,
    /// Text drawn next to the bar, e.g. `-$5,501,910`.
    pub text: String,
}

/// Everything the dashboard page shows for one IPO price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub title: String,
    pub ipo_price: String,
    pub metrics: Vec<Metric>,
    pub waterfall_title: String,
    pub waterfall: Vec<WaterfallBar>,
    pub narrative: Vec<NarrativeSection>,
    pub warnings: Vec<String>,
    /// Footer line.
    pub caption: String,
}

/// Waterfall bars with their display text.
pub fn waterfall_bars(outcome: &IpoOutcome) -> Vec<WaterfallBar> {
    outcome
        .cash_flows
        .steps
        .iter()
        .map(|step| WaterfallBar {
            label: step.label.clone(),
            value: step.delta,
            measure: step.measure,
            text: format::signed_currency(step.delta),
        })
        .collect()
}

/// Assemble KPIs, the waterfall and the narrative for a computed outcome.
///
/// `terms` must be the terms the outcome was computed with.
pub fn render_dashboard(
    output: &ComputationOutput<IpoOutcome>,
    terms: &DealTerms,
) -> DealResult<Dashboard> {
    let outcome = &output.result;
    Ok(Dashboard {
        title: format!("{} Deal IPO Dashboard", terms.deal_name),
        ipo_price: format::price(outcome.ipo_price),
        metrics: headline_metrics(outcome, terms),
        waterfall_title: format!("{} Investment Cash Flow", terms.deal_name),
        waterfall: waterfall_bars(outcome),
        narrative: render_narrative(outcome, terms)?,
        warnings: output.warnings.clone(),
        caption: terms.caption.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::compute;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_waterfall_text() {
        let out = compute(16.0, &DealTerms::default()).unwrap();
        let texts: Vec<String> = waterfall_bars(&out.result)
            .into_iter()
            .map(|b| b.text)
            .collect();
        assert_eq!(texts, vec!["-$5,501,910", "+$5,975,000", "+$1,272,672"]);
    }

    #[test]
    fn test_dashboard_carries_warnings() {
        let terms = DealTerms::default();
        let out = compute(16.0, &terms).unwrap();
        let dash = render_dashboard(&out, &terms).unwrap();
        assert_eq!(dash.ipo_price, "$16.00");
        assert_eq!(dash.metrics.len(), 6);
        assert_eq!(dash.narrative.len(), 4);
        assert_eq!(dash.warnings, out.warnings);
    }

    #[test]
    fn test_dashboard_titles_follow_deal_name() {
        let terms = DealTerms::default();
        let out = compute(16.0, &terms).unwrap();
        let dash = render_dashboard(&out, &terms).unwrap();
        assert_eq!(dash.title, "MNTN Deal IPO Dashboard");
        assert_eq!(dash.waterfall_title, "MNTN Investment Cash Flow");
        assert_eq!(dash.caption, "Crafted by BULLVC Apprentice");

        let renamed = DealTerms {
            deal_name: "ACME".into(),
            caption: "Prepared for the LP meeting".into(),
            ..DealTerms::default()
        };
        let out = compute(16.0, &renamed).unwrap();
        let dash = render_dashboard(&out, &renamed).unwrap();
        assert_eq!(dash.title, "ACME Deal IPO Dashboard");
        assert_eq!(dash.waterfall_title, "ACME Investment Cash Flow");
        assert_eq!(dash.caption, "Prepared for the LP meeting");
    }
}
