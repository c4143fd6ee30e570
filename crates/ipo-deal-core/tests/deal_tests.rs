use ipo_deal_core::deal::{self, DealTerms, IpoOutcomeInput};
use ipo_deal_core::DealError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn at(price: f64) -> deal::IpoOutcome {
    deal::compute(price, &DealTerms::default()).unwrap().result
}

// ===========================================================================
// Convertible note: floor price and fixed conversion ratio
// ===========================================================================

#[test]
fn test_conversion_price_is_max_of_floor_and_ipo() {
    for (price, expected) in [
        (0.01, dec!(22.97)),
        (10.0, dec!(22.97)),
        (22.75, dec!(22.97)),
        (23.0, dec!(23)),
        (30.0, dec!(30)),
        (1000.0, dec!(1000)),
    ] {
        assert_eq!(
            at(price).note.conversion_price,
            expected,
            "conversion price at {price}"
        );
    }
}

#[test]
fn test_shares_converted_independent_of_ipo_price() {
    let reference = at(16.0).note.shares_converted;
    for price in [0.01, 10.0, 22.97, 25.0, 30.0, 1000.0] {
        assert_eq!(at(price).note.shares_converted, reference);
    }
    // 5,975,000 / 22.97
    assert!((reference - dec!(260_122)).abs() < Decimal::ONE);
}

#[test]
fn test_note_known_answer_at_sixteen() {
    let note = at(16.0).note;
    assert_eq!(note.conversion_price, dec!(22.97));
    assert!((note.proceeds - dec!(5_975_000)).abs() < dec!(0.01));
    assert!((note.profit - dec!(975_000)).abs() < dec!(0.01));
    assert!((note.moic - dec!(1.195)).abs() < dec!(0.001));
}

#[test]
fn test_note_known_answer_at_twenty_five() {
    let note = at(25.0).note;
    assert_eq!(note.conversion_price, dec!(25));
    assert!(
        (note.proceeds - dec!(6_503_050)).abs() < dec!(10),
        "Expected proceeds ~6,503,050, got {}",
        note.proceeds
    );
    assert!((note.moic - dec!(1.301)).abs() < dec!(0.001));
}

#[test]
fn test_note_irr_is_fixed() {
    for price in [10.0, 16.0, 30.0] {
        assert_eq!(at(price).note.irr, dec!(0.061));
    }
}

#[test]
fn test_fixed_divisor_differs_from_conversion_price_divisor() {
    // Dividing by the sale price instead would make proceeds flat above the floor.
    let low = at(25.0).note.proceeds;
    let high = at(30.0).note.proceeds;
    assert!(high > low);
}

// ===========================================================================
// Secondary shares
// ===========================================================================

#[test]
fn test_secondary_break_even_at_entry_price() {
    let sec = at(6.31).secondary;
    assert!((sec.market_value - sec.cost_basis).abs() < dec!(0.000001));
    assert!(sec.profit.abs() < dec!(0.000001));
    assert!((sec.moic - Decimal::ONE).abs() < dec!(0.000000001));
    assert!(sec.irr.abs() < dec!(0.000001));
}

#[test]
fn test_secondary_moic_monotonic() {
    let prices = [1.0, 6.31, 10.0, 16.0, 22.97, 30.0, 100.0];
    let moics: Vec<Decimal> = prices.iter().map(|p| at(*p).secondary.moic).collect();
    for pair in moics.windows(2) {
        assert!(pair[0] < pair[1], "MOIC not increasing: {pair:?}");
    }
}

#[test]
fn test_secondary_irr_negative_below_entry() {
    let sec = at(5.0).secondary;
    assert!(sec.moic < Decimal::ONE);
    assert!(sec.irr < Decimal::ZERO);
    assert!(sec.irr > dec!(-1));
}

#[test]
fn test_secondary_irr_matches_closed_form() {
    // MOIC 2.5357 over 2.25 years
    let sec = at(16.0).secondary;
    let moic = 1_272_672.0_f64 / 501_910.02_f64;
    let expected = moic.powf(1.0 / 2.25) - 1.0;
    let got: f64 = sec.irr.to_string().parse().unwrap();
    assert!((got - expected).abs() < 1e-6, "IRR {got} vs {expected}");
}

// ===========================================================================
// Contract: determinism, out-of-range inputs, invalid inputs
// ===========================================================================

#[test]
fn test_compute_is_deterministic() {
    let terms = DealTerms::default();
    let first = deal::compute(17.25, &terms).unwrap();
    let second = deal::compute(17.25, &terms).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_nan_is_invalid_input() {
    let err = deal::compute(f64::NAN, &DealTerms::default()).unwrap_err();
    assert!(matches!(err, DealError::InvalidInput { .. }));
}

#[test]
fn test_extreme_finite_prices_compute() {
    for price in [0.01, 0.0, -5.0, 1000.0, 1e9] {
        assert!(
            deal::compute(price, &DealTerms::default()).is_ok(),
            "price {price} should compute"
        );
    }
}

// ===========================================================================
// Prices and terms at the edge of the decimal range
// ===========================================================================

fn has_warning(out: &ipo_deal_core::ComputationOutput<deal::IpoOutcome>, needle: &str) -> bool {
    out.warnings.iter().any(|w| w.contains(needle))
}

#[test]
fn test_very_large_prices_compute() {
    for price in [1.5e15, 1e16, 1e20, -1e16] {
        let out = deal::compute(price, &DealTerms::default())
            .unwrap_or_else(|e| panic!("price {price} should compute: {e}"));
        assert!(
            has_warning(&out, "outside the dashboard range") || has_warning(&out, "not positive"),
            "price {price} should be flagged"
        );
    }
}

#[test]
fn test_prices_beyond_decimal_range_saturate() {
    for price in [1e29, 1e100, f64::MAX] {
        let out = deal::compute(price, &DealTerms::default()).unwrap();
        assert_eq!(out.result.ipo_price, Decimal::MAX, "price {price}");
        assert_eq!(out.result.secondary.market_value, Decimal::MAX);
        assert_eq!(out.result.note.proceeds, Decimal::MAX);
        assert!(has_warning(&out, "exceeds the decimal range"));
        assert!(has_warning(&out, "saturated"));
    }

    let out = deal::compute(-1e100, &DealTerms::default()).unwrap();
    assert_eq!(out.result.ipo_price, Decimal::MIN);
    assert_eq!(out.result.secondary.market_value, Decimal::MIN);
    assert_eq!(out.result.secondary.irr, dec!(-1));
}

#[test]
fn test_large_position_at_large_price_saturates() {
    let mut terms = DealTerms::default();
    terms.secondary.shares = 1_000_000_000_000_000;

    let out = deal::compute(1e15, &terms).unwrap();
    assert_eq!(out.result.secondary.market_value, Decimal::MAX);
    assert!(has_warning(&out, "saturated"));
}

#[test]
fn test_overflowing_terms_are_rejected() {
    let mut terms = DealTerms::default();
    terms.secondary.shares = u64::MAX;
    terms.secondary.entry_price = Decimal::MAX;

    let err = deal::compute(16.0, &terms).unwrap_err();
    assert!(matches!(err, DealError::Overflow { .. }));
}

#[test]
fn test_tiny_positive_prices_stay_positive() {
    for price in [1e-30, 5e-324] {
        let out = deal::compute(price, &DealTerms::default()).unwrap();
        let result = &out.result;
        assert!(result.ipo_price > Decimal::ZERO, "price {price}");
        assert!(result.secondary.market_value > Decimal::ZERO);
        assert!(result.secondary.irr > dec!(-1));
        assert!(has_warning(&out, "below decimal resolution"));
        assert!(!has_warning(&out, "not positive"));
    }
}

#[test]
fn test_tiny_negative_price_stays_negative() {
    let out = deal::compute(-1e-30, &DealTerms::default()).unwrap();
    assert!(out.result.ipo_price < Decimal::ZERO);
    assert!(has_warning(&out, "not positive"));
}

#[test]
fn test_alternate_terms_substitute_cleanly() {
    let mut terms = DealTerms::default();
    terms.note.coverage_price = dec!(20);
    terms.note.interest_rate = Decimal::ZERO;

    let note = deal::compute(20.0, &terms).unwrap().result.note;
    assert_eq!(note.accrued_interest, Decimal::ZERO);
    assert_eq!(note.shares_converted, dec!(250_000));
    assert_eq!(note.proceeds, dec!(5_000_000));
}

#[test]
fn test_input_from_json_defaults_terms() {
    let input: IpoOutcomeInput = serde_json::from_str(r#"{"ipo_price": 16.0}"#).unwrap();
    assert_eq!(input.terms, DealTerms::default());
    let out = deal::evaluate_ipo_outcome(&input).unwrap();
    assert_eq!(out.result.ipo_price, dec!(16));
}
