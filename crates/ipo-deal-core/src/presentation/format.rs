//! Display formatting for dashboard figures.
//!
//! Dollar amounts are whole dollars with thousands separators, per-share
//! prices carry two decimals, percentages one. Ties round to even.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Money, Multiple, Rate};

/// `$5,975,000`; negatives as `-$5,501,910`.
pub fn currency(amount: Money) -> String {
    let (negative, body) = fixed(amount, 0);
    format!("{}${}", if negative { "-" } else { "" }, body)
}

/// `+$5,975,000` or `-$5,501,910`. Zero is shown as `+$0`.
pub fn signed_currency(amount: Money) -> String {
    let (negative, body) = fixed(amount, 0);
    format!("{}${}", if negative { "-" } else { "+" }, body)
}

/// Per-share price, e.g. `$22.97`.
pub fn price(value: Money) -> String {
    let (negative, body) = fixed(value, 2);
    format!("{}${}", if negative { "-" } else { "" }, body)
}

/// Decimal rate as a percentage with one decimal, e.g. 0.061 -> `6.1%`.
pub fn percent(rate: Rate) -> String {
    let (negative, body) = fixed(rate.saturating_mul(dec!(100)), 1);
    format!("{}{}%", if negative { "-" } else { "" }, body)
}

/// Multiple with two decimals, e.g. `1.20x`.
pub fn multiple(value: Multiple) -> String {
    let (negative, body) = fixed(value, 2);
    format!("{}{}x", if negative { "-" } else { "" }, body)
}

/// Whole count with thousands separators, e.g. `79,542`.
pub fn count(value: Decimal) -> String {
    let (negative, body) = fixed(value, 0);
    format!("{}{}", if negative { "-" } else { "" }, body)
}

/// Round to `dp` places and group the integer digits. Returns the sign
/// separately so callers can place it before a currency symbol.
fn fixed(value: Decimal, dp: u32) -> (bool, String) {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", dp as usize, rounded.abs());

    let body = match text.split_once('.') {
        Some((int_part, frac_part)) => format!("{}.{}", group_thousands(int_part), frac_part),
        None => group_thousands(&text),
    };
    (negative, body)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
