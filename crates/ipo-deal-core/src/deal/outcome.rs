use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::cashflow::{build_waterfall, CashFlowWaterfall};
use super::terms::DealTerms;
use crate::error::DealError;
use crate::types::*;
use crate::DealResult;

/// Smallest positive magnitude a Decimal can hold (1e-28).
const DECIMAL_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 28);

/// Price range offered by the dashboard control.
const DASHBOARD_MIN_PRICE: Decimal = dec!(10);
const DASHBOARD_MAX_PRICE: Decimal = dec!(30);

/// Input for the IPO outcome calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpoOutcomeInput {
    /// IPO share price. Any finite value is accepted.
    pub ipo_price: f64,
    /// Deal terms; omitted fields fall back to the deal as struck.
    #[serde(default)]
    pub terms: DealTerms,
}

/// Convertible note outcome at the IPO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteOutcome {
    /// principal * rate * years held (simple interest).
    pub accrued_interest: Money,
    /// Principal + accrued interest.
    pub total_value: Money,
    /// Greater of the coverage price and the IPO price.
    pub conversion_price: Money,
    /// total_value / coverage_price. Independent of the IPO price.
    pub shares_converted: Decimal,
    /// shares_converted * conversion_price.
    pub proceeds: Money,
    /// proceeds - principal.
    pub profit: Money,
    /// proceeds / principal.
    pub moic: Multiple,
    /// Quoted annualised return, carried from the terms.
    pub irr: Rate,
}

/// Secondary share outcome at the IPO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryOutcome {
    /// shares * IPO price.
    pub market_value: Money,
    /// shares * entry price.
    pub cost_basis: Money,
    /// market_value - cost_basis.
    pub profit: Money,
    /// market_value / cost_basis.
    pub moic: Multiple,
    /// moic^(1 / holding_years) - 1.
    pub irr: Rate,
}

/// Complete result bundle for one IPO price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpoOutcome {
    pub ipo_price: Money,
    pub note: NoteOutcome,
    pub secondary: SecondaryOutcome,
    pub cash_flows: CashFlowWaterfall,
}

/// Evaluate both instruments at the given IPO price with the given terms.
pub fn compute(ipo_price: f64, terms: &DealTerms) -> DealResult<ComputationOutput<IpoOutcome>> {
    evaluate_ipo_outcome(&IpoOutcomeInput {
        ipo_price,
        terms: terms.clone(),
    })
}

/// Evaluate the convertible note and the secondary block at an IPO price.
///
/// The note converts at the fixed coverage price and the resulting shares are
/// sold at the greater of the coverage price and the IPO price. The secondary
/// block is marked to the IPO price. Every finite price produces a result;
/// only non-finite prices fail. Figures beyond the Decimal range saturate at
/// `Decimal::MAX` / `Decimal::MIN` and are reported in the warnings.
pub fn evaluate_ipo_outcome(
    input: &IpoOutcomeInput,
) -> DealResult<ComputationOutput<IpoOutcome>> {
    let mut warnings: Vec<String> = Vec::new();

    let ipo_price = to_decimal_price(input.ipo_price, &mut warnings)?;
    let terms = &input.terms;
    terms.validate()?;

    tracing::debug!(ipo_price = %ipo_price, "evaluating IPO outcome");

    if input.ipo_price <= 0.0 {
        warnings.push(format!(
            "IPO price {} is not positive; results are not financially meaningful",
            input.ipo_price
        ));
    } else if ipo_price < DASHBOARD_MIN_PRICE || ipo_price > DASHBOARD_MAX_PRICE {
        warnings.push(format!(
            "IPO price {} is outside the dashboard range \
             [{DASHBOARD_MIN_PRICE}, {DASHBOARD_MAX_PRICE}]",
            input.ipo_price
        ));
    }

    let mut arith = Saturating::default();

    let note = note_outcome(ipo_price, terms, &mut arith)?;
    if ipo_price < terms.note.coverage_price {
        warnings.push(format!(
            "IPO price below coverage price {}; note proceeds are held at the floor",
            terms.note.coverage_price
        ));
    }

    let secondary = secondary_outcome(ipo_price, terms, &mut arith)?;
    if secondary.profit < Decimal::ZERO {
        warnings.push("Secondary position is below its cost basis".into());
    }

    if arith.saturated {
        tracing::debug!(ipo_price = input.ipo_price, "decimal range exceeded");
        warnings.push(
            "Some figures exceed the decimal range and are saturated at its bounds".into(),
        );
    }

    let cash_flows = build_waterfall(&note, &secondary, terms);

    let output = IpoOutcome {
        ipo_price,
        note,
        secondary,
        cash_flows,
    };

    Ok(with_metadata(
        "IPO outcome: convertible note at fixed conversion with price floor, \
         secondary shares marked to IPO price",
        &serde_json::json!({
            "ipo_price": ipo_price.to_string(),
            "note_principal": terms.note.principal.to_string(),
            "interest_rate": terms.note.interest_rate.to_string(),
            "years_held": terms.note.years_held.to_string(),
            "coverage_price": terms.note.coverage_price.to_string(),
            "secondary_shares": terms.secondary.shares,
            "secondary_entry_price": terms.secondary.entry_price.to_string(),
            "secondary_holding_years": terms.secondary.holding_years.to_string(),
        }),
        warnings,
        output,
    ))
}

/// Validate an IPO price and move it into decimal arithmetic.
///
/// Prices too large for a Decimal saturate at its bounds; nonzero prices too
/// small for it are carried as +/-1e-28. Both cases add a warning.
fn to_decimal_price(price: f64, warnings: &mut Vec<String>) -> DealResult<Decimal> {
    if !price.is_finite() {
        return Err(DealError::InvalidInput {
            field: "ipo_price".into(),
            reason: format!("IPO price must be a finite number, got {price}"),
        });
    }

    let converted = Decimal::from_f64(price).filter(|d| !d.is_zero() || price == 0.0);
    match converted {
        Some(d) => Ok(d),
        None if price.abs() < 1.0 => {
            let carried = if price < 0.0 {
                -DECIMAL_EPSILON
            } else {
                DECIMAL_EPSILON
            };
            warnings.push(format!(
                "IPO price {price:e} is below decimal resolution; carried as {carried}"
            ));
            Ok(carried)
        }
        None => {
            let carried = if price < 0.0 { Decimal::MIN } else { Decimal::MAX };
            warnings.push(format!(
                "IPO price {price:e} exceeds the decimal range; carried as {carried}"
            ));
            Ok(carried)
        }
    }
}

/// Decimal arithmetic that clamps to `Decimal::MIN` / `Decimal::MAX` instead
/// of overflowing, remembering whether it had to.
#[derive(Debug, Default)]
struct Saturating {
    saturated: bool,
}

impl Saturating {
    fn mul(&mut self, a: Decimal, b: Decimal) -> Decimal {
        match a.checked_mul(b) {
            Some(v) => v,
            None => self.bound(a.is_sign_negative() != b.is_sign_negative()),
        }
    }

    /// Divisors are validated positive, so `None` means overflow.
    fn div(&mut self, a: Decimal, b: Decimal) -> Decimal {
        match a.checked_div(b) {
            Some(v) => v,
            None => self.bound(a.is_sign_negative() != b.is_sign_negative()),
        }
    }

    fn sub(&mut self, a: Decimal, b: Decimal) -> Decimal {
        match a.checked_sub(b) {
            Some(v) => v,
            None => self.bound(a.is_sign_negative()),
        }
    }

    fn bound(&mut self, negative: bool) -> Decimal {
        self.saturated = true;
        if negative {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    }
}

fn note_outcome(
    ipo_price: Money,
    terms: &DealTerms,
    arith: &mut Saturating,
) -> DealResult<NoteOutcome> {
    let note = &terms.note;

    let accrued_interest = note.accrued_interest()?;
    let total_value = note.total_value()?;
    let conversion_price = note.coverage_price.max(ipo_price);

    // Conversion ratio is fixed at the coverage price; only the sale price moves.
    let shares_converted = note.conversion_shares()?;
    let proceeds = arith.mul(shares_converted, conversion_price);

    Ok(NoteOutcome {
        accrued_interest,
        total_value,
        conversion_price,
        shares_converted,
        proceeds,
        profit: arith.sub(proceeds, note.principal),
        moic: arith.div(proceeds, note.principal),
        irr: note.irr_approximation,
    })
}

fn secondary_outcome(
    ipo_price: Money,
    terms: &DealTerms,
    arith: &mut Saturating,
) -> DealResult<SecondaryOutcome> {
    let secondary = &terms.secondary;

    let market_value = arith.mul(Decimal::from(secondary.shares), ipo_price);
    let cost_basis = secondary.cost_basis()?;
    let moic = arith.div(market_value, cost_basis);

    Ok(SecondaryOutcome {
        market_value,
        cost_basis,
        profit: arith.sub(market_value, cost_basis),
        moic,
        irr: annualised_return(market_value, cost_basis, moic, secondary.holding_years),
    })
}

/// (value / cost)^(1 / years) - 1. A non-positive value is a total loss.
///
/// Multiples below decimal resolution, or beyond what `powd` handles, are
/// annualised in f64 instead.
fn annualised_return(value: Money, cost: Money, moic: Multiple, years: Years) -> Rate {
    if value <= Decimal::ZERO {
        return dec!(-1);
    }
    if moic == Decimal::ONE {
        return Decimal::ZERO;
    }
    if moic > Decimal::ZERO {
        let growth = Decimal::ONE
            .checked_div(years)
            .and_then(|exp| moic.checked_powd(exp));
        if let Some(growth) = growth {
            return growth - Decimal::ONE;
        }
    }

    let ratio = value.to_f64().unwrap_or(f64::MAX) / cost.to_f64().unwrap_or(f64::MAX);
    let years = years.to_f64().unwrap_or(1.0);
    let rate = ratio.powf(1.0 / years) - 1.0;
    Decimal::from_f64(rate).unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_outcome(price: f64) -> ComputationOutput<IpoOutcome> {
        compute(price, &DealTerms::default()).unwrap()
    }

    #[test]
    fn test_accrued_interest() {
        let out = default_outcome(16.0);
        assert_eq!(out.result.note.accrued_interest, dec!(975_000));
        assert_eq!(out.result.note.total_value, dec!(5_975_000));
    }

    #[test]
    fn test_conversion_price_floor_applies() {
        let out = default_outcome(16.0);
        assert_eq!(out.result.note.conversion_price, dec!(22.97));
    }

    #[test]
    fn test_conversion_price_follows_ipo_above_floor() {
        let out = default_outcome(25.0);
        assert_eq!(out.result.note.conversion_price, dec!(25));
    }

    #[test]
    fn test_shares_converted_uses_coverage_divisor() {
        let low = default_outcome(12.0).result.note.shares_converted;
        let high = default_outcome(29.5).result.note.shares_converted;
        assert_eq!(low, high);
        // 5,975,000 / 22.97 ≈ 260,121.9
        assert!((low - dec!(260121.9)).abs() < dec!(0.01));
    }

    #[test]
    fn test_note_at_floor_returns_principal_plus_interest() {
        let note = default_outcome(16.0).result.note;
        assert!((note.proceeds - dec!(5_975_000)).abs() < dec!(0.0001));
        assert!((note.profit - dec!(975_000)).abs() < dec!(0.0001));
        assert!((note.moic - dec!(1.195)).abs() < dec!(0.0000001));
        assert_eq!(note.irr, dec!(0.061));
    }

    #[test]
    fn test_note_above_floor() {
        let note = default_outcome(25.0).result.note;
        // 260,121.898... * 25 = 6,503,047.45
        assert!((note.proceeds - dec!(6503047.45)).abs() < dec!(0.01));
        assert!((note.moic - dec!(1.3006)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_secondary_at_sixteen() {
        let sec = default_outcome(16.0).result.secondary;
        assert_eq!(sec.market_value, dec!(1_272_672));
        assert_eq!(sec.cost_basis, dec!(501910.02));
        assert_eq!(sec.profit, dec!(770761.98));
        // 2.5357^(1/2.25) - 1 ≈ 51.2%
        assert!((sec.irr - dec!(0.512)).abs() < dec!(0.005));
    }

    #[test]
    fn test_annualised_return_unit_multiple() {
        let irr = annualised_return(dec!(100), dec!(100), Decimal::ONE, dec!(2.25));
        assert_eq!(irr, Decimal::ZERO);
    }

    #[test]
    fn test_annualised_return_total_loss() {
        let zero = annualised_return(Decimal::ZERO, dec!(100), Decimal::ZERO, dec!(2.25));
        assert_eq!(zero, dec!(-1));
        let negative = annualised_return(dec!(-50), dec!(100), dec!(-0.5), dec!(2.25));
        assert_eq!(negative, dec!(-1));
    }

    #[test]
    fn test_annualised_return_doubling_over_one_year() {
        let irr = annualised_return(dec!(200), dec!(100), dec!(2), Decimal::ONE);
        assert!((irr - Decimal::ONE).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_annualised_return_multiple_below_resolution() {
        // value/cost rounds to a zero multiple but the position is still worth something
        let irr = annualised_return(DECIMAL_EPSILON, dec!(501910.02), Decimal::ZERO, dec!(2.25));
        assert!(irr > dec!(-1));
        assert!(irr < dec!(-0.999));
    }

    #[test]
    fn test_saturating_arithmetic() {
        let mut arith = Saturating::default();
        assert_eq!(arith.mul(dec!(2), dec!(3)), dec!(6));
        assert!(!arith.saturated);
        assert_eq!(arith.mul(Decimal::MAX, dec!(2)), Decimal::MAX);
        assert_eq!(arith.mul(Decimal::MAX, dec!(-2)), Decimal::MIN);
        assert_eq!(arith.sub(Decimal::MIN, dec!(1000)), Decimal::MIN);
        assert_eq!(arith.div(Decimal::MAX, dec!(0.5)), Decimal::MAX);
        assert!(arith.saturated);
    }

    #[test]
    fn test_huge_price_saturates_with_warning() {
        let out = default_outcome(1e100);
        assert_eq!(out.result.ipo_price, Decimal::MAX);
        assert_eq!(out.result.secondary.market_value, Decimal::MAX);
        assert!(out.warnings.iter().any(|w| w.contains("exceeds the decimal range")));
        assert!(out.warnings.iter().any(|w| w.contains("saturated")));
    }

    #[test]
    fn test_tiny_positive_price_is_not_zeroed() {
        let out = default_outcome(1e-30);
        assert_eq!(out.result.ipo_price, DECIMAL_EPSILON);
        assert!(out.result.secondary.irr > dec!(-1));
        assert!(out.warnings.iter().any(|w| w.contains("below decimal resolution")));
        assert!(!out.warnings.iter().any(|w| w.contains("not positive")));
    }

    #[test]
    fn test_nan_rejected() {
        let err = compute(f64::NAN, &DealTerms::default()).unwrap_err();
        assert!(matches!(err, DealError::InvalidInput { ref field, .. } if field == "ipo_price"));
    }

    #[test]
    fn test_infinity_rejected() {
        assert!(compute(f64::INFINITY, &DealTerms::default()).is_err());
        assert!(compute(f64::NEG_INFINITY, &DealTerms::default()).is_err());
    }

    #[test]
    fn test_zero_price_still_computes() {
        let out = default_outcome(0.0);
        assert_eq!(out.result.secondary.market_value, Decimal::ZERO);
        assert_eq!(out.result.secondary.irr, dec!(-1));
        assert_eq!(out.result.note.conversion_price, dec!(22.97));
        assert!(out.warnings.iter().any(|w| w.contains("not positive")));
    }

    #[test]
    fn test_out_of_range_price_warns() {
        let out = default_outcome(1000.0);
        assert_eq!(out.result.note.conversion_price, dec!(1000));
        assert!(out.warnings.iter().any(|w| w.contains("outside the dashboard range")));
    }

    #[test]
    fn test_in_range_above_floor_has_no_warnings() {
        let out = default_outcome(25.0);
        assert!(out.warnings.is_empty(), "unexpected warnings: {:?}", out.warnings);
    }

    #[test]
    fn test_invalid_terms_rejected() {
        let mut terms = DealTerms::default();
        terms.secondary.shares = 0;
        assert!(compute(16.0, &terms).is_err());
    }
}
