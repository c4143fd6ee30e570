//! Narrative explanations rendered from `{placeholder}` templates.
//!
//! Templates are plain Markdown. `{name}` is replaced by the formatted value
//! registered under `name`; `{{` and `}}` produce literal braces. A `{` with
//! no closing brace is copied through unchanged.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::format;
use crate::deal::{DealTerms, IpoOutcome};
use crate::error::DealError;
use crate::DealResult;

/// Named values available to templates, already formatted.
pub type TemplateValues = BTreeMap<&'static str, String>;

/// A titled block of rendered narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSection {
    pub title: String,
    pub body: String,
}

const FINANCIAL_MODELING: &str = "\
**Convertible Note**

**Step 1: Calculate Accrued Interest**
Simple interest =
{note_principal} × {interest_rate} × {years_held} years = **{accrued_interest}**

**Step 2: Conversion or Sale Value**
You sell converted shares at the greater of {coverage_price} or IPO price.

- IPO price chosen: **{ipo_price}**
- Max conversion price: **{conversion_price}**

Conversion value =
{note_principal} + {accrued_interest} = **{note_total}**

Shares converted =
{note_total} ÷ {coverage_price} ≈ **{shares_converted} shares**

At {conversion_price} sale price, proceeds =
{shares_converted} × {conversion_price} = **{note_proceeds}**

Return = **{note_profit} profit**, or **{note_moic} MOIC**
Time-adjusted IRR ≈ **{note_irr} annually**

> This IRR is expected for a senior instrument with downside protection, not pure equity risk.

---

**Secondary Shareholding**

- Entry:
{secondary_shares} shares × {secondary_entry_price} = **{secondary_cost}**

- Post-IPO Value (at {ipo_price}):
{secondary_shares} × {ipo_price} = **{secondary_value}**

- Unrealized gain = **{secondary_profit}**
- MOIC = **{secondary_moic}**
- Holding Period = ~{secondary_holding_years} years
- IRR ≈ **{secondary_irr} annualized**

> This is the alpha-generating piece: bought cheap, waited for liquidity, with no dilution or conversion mechanics.
";

const CAPITAL_ALLOCATION: &str = "\
| Instrument         | Size        | Purpose                        | Risk Level | Return Potential |
|--------------------|-------------|--------------------------------|------------|------------------|
| Convertible Note   | {note_principal} | Structured downside protection | Low        | Low-to-mid       |
| Secondary Equity   | {secondary_cost} | High-upside illiquid bet       | Medium     | High             |

**Summary:**
The combination gives downside protection through the note and asymmetric upside via the secondary share purchase.
This is the textbook secondaries strategy: structured plus opportunistic equity.
";

const LOCK_UP: &str = "\
- Lock-up ends Q4 2025
- 6 months of potential price volatility
- **Risks:** Price drops post-IPO
- **Mitigants:**
  - Hedge with options (if available)
  - Distribute shares in-kind to LPs and let them decide
  - Structure staggered sales to minimize market impact
";

const RETURN_OF_CAPITAL: &str = "\
**May 2025:**
- {note_principal} principal return
- ~{accrued_interest} accrued interest
- LPs receive distributions and updated capital account statements

**Q4 2025 (post lock-up):**
- Potential distribution of:
  - ~{secondary_value} from secondary shares
  - ~{note_proceeds} in new shares (issued via note conversion depending on IPO pricing)

If shares hold in the {ipo_price}–{coverage_price} range, the combined realization is ~{total_proceeds}.
";

/// Section titles paired with their templates, in display order.
pub const SECTIONS: [(&str, &str); 4] = [
    ("Financial Modeling", FINANCIAL_MODELING),
    ("Capital Allocation Strategy Review", CAPITAL_ALLOCATION),
    ("Post-IPO Lock-Up Considerations", LOCK_UP),
    ("Return of Capital to LPs", RETURN_OF_CAPITAL),
];

/// Format every figure a narrative template may reference.
pub fn template_values(outcome: &IpoOutcome, terms: &DealTerms) -> TemplateValues {
    let note = &outcome.note;
    let secondary = &outcome.secondary;

    let mut values = TemplateValues::new();
    values.insert("ipo_price", format::price(outcome.ipo_price));
    values.insert("note_principal", format::currency(terms.note.principal));
    values.insert("interest_rate", format::percent(terms.note.interest_rate));
    values.insert("years_held", terms.note.years_held.normalize().to_string());
    values.insert("coverage_price", format::price(terms.note.coverage_price));
    values.insert("accrued_interest", format::currency(note.accrued_interest));
    values.insert("note_total", format::currency(note.total_value));
    values.insert("conversion_price", format::price(note.conversion_price));
    values.insert("shares_converted", format::count(note.shares_converted));
    values.insert("note_proceeds", format::currency(note.proceeds));
    values.insert("note_profit", format::currency(note.profit));
    values.insert("note_moic", format::multiple(note.moic));
    values.insert("note_irr", format::percent(note.irr));
    values.insert(
        "secondary_shares",
        format::count(Decimal::from(terms.secondary.shares)),
    );
    values.insert(
        "secondary_entry_price",
        format::price(terms.secondary.entry_price),
    );
    values.insert(
        "secondary_holding_years",
        terms.secondary.holding_years.normalize().to_string(),
    );
    values.insert("secondary_cost", format::currency(secondary.cost_basis));
    values.insert("secondary_value", format::currency(secondary.market_value));
    values.insert("secondary_profit", format::currency(secondary.profit));
    values.insert("secondary_moic", format::multiple(secondary.moic));
    values.insert("secondary_irr", format::percent(secondary.irr));
    values.insert(
        "total_proceeds",
        format::currency(note.proceeds.saturating_add(secondary.market_value)),
    );
    values
}

/// Substitute `{name}` placeholders in `template`.
pub fn render_template(template: &str, values: &TemplateValues) -> DealResult<String> {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(pos) = rest.find(&['{', '}'][..]) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
        } else {
            match tail[1..].find('}') {
                Some(end) => {
                    let name = &tail[1..=end];
                    let value = values.get(name).ok_or_else(|| DealError::InvalidInput {
                        field: "template".into(),
                        reason: format!("unknown placeholder `{name}`"),
                    })?;
                    out.push_str(value);
                    rest = &tail[end + 2..];
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Render every narrative section for one outcome.
pub fn render_narrative(
    outcome: &IpoOutcome,
    terms: &DealTerms,
) -> DealResult<Vec<NarrativeSection>> {
    let values = template_values(outcome, terms);
    SECTIONS
        .iter()
        .map(|(title, template)| {
            Ok(NarrativeSection {
                title: title.to_string(),
                body: render_template(template, &values)?,
            })
        })
        .collect()
}
