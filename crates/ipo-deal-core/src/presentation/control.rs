use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The IPO price input offered by the dashboard.
///
/// Purely a presentation concern; the calculator accepts any finite price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceControl {
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
    pub default: Decimal,
}

impl Default for PriceControl {
    fn default() -> Self {
        Self {
            min: dec!(10.00),
            max: dec!(30.00),
            step: dec!(0.25),
            default: dec!(16.00),
        }
    }
}

impl PriceControl {
    /// Whether `price` is a position the control can take.
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max && ((price - self.min) % self.step).is_zero()
    }

    /// Nearest admissible position, clamped to the range.
    pub fn snap(&self, price: Decimal) -> Decimal {
        let clamped = price.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).min(self.max)
    }

    /// Every admissible position from `min` to `max`.
    pub fn ticks(&self) -> Vec<Decimal> {
        let mut ticks = Vec::new();
        let mut price = self.min;
        while price <= self.max {
            ticks.push(price);
            price += self.step;
        }
        ticks
    }
}
