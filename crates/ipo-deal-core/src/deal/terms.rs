use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DealError;
use crate::types::*;
use crate::DealResult;

// ---------------------------------------------------------------------------
// Convertible Note
// ---------------------------------------------------------------------------

/// Terms of the convertible promissory note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteTerms {
    /// Note face value.
    pub principal: Money,
    /// Annual simple interest rate (e.g. 0.06 = 6%).
    pub interest_rate: Rate,
    /// Years between issuance and the IPO.
    pub years_held: Years,
    /// Guaranteed floor price per share. Also the fixed conversion price.
    pub coverage_price: Money,
    /// Quoted annualised return for the note. Not derived from the outcome.
    pub irr_approximation: Rate,
}

impl Default for NoteTerms {
    fn default() -> Self {
        Self {
            principal: dec!(5_000_000),
            interest_rate: dec!(0.06),
            years_held: dec!(3.25),
            coverage_price: dec!(22.97),
            irr_approximation: dec!(0.061),
        }
    }
}

impl NoteTerms {
    /// Simple interest accrued over the holding period.
    pub fn accrued_interest(&self) -> DealResult<Money> {
        self.principal
            .checked_mul(self.interest_rate)
            .and_then(|v| v.checked_mul(self.years_held))
            .ok_or_else(|| overflow("note.accrued_interest"))
    }

    /// Principal plus accrued interest.
    pub fn total_value(&self) -> DealResult<Money> {
        self.principal
            .checked_add(self.accrued_interest()?)
            .ok_or_else(|| overflow("note.total_value"))
    }

    /// Shares received on conversion: total value over the coverage price.
    pub fn conversion_shares(&self) -> DealResult<Decimal> {
        self.total_value()?
            .checked_div(self.coverage_price)
            .ok_or_else(|| overflow("note.conversion_shares"))
    }
}

// ---------------------------------------------------------------------------
// Secondary Shares
// ---------------------------------------------------------------------------

/// Terms of the secondary share purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryTerms {
    /// Shares bought from an existing holder.
    pub shares: u64,
    /// Price paid per share.
    pub entry_price: Money,
    /// Years between the purchase and the IPO.
    pub holding_years: Years,
}

impl Default for SecondaryTerms {
    fn default() -> Self {
        Self {
            shares: 79_542,
            entry_price: dec!(6.31),
            holding_years: dec!(2.25),
        }
    }
}

impl SecondaryTerms {
    /// Cost basis of the position.
    pub fn cost_basis(&self) -> DealResult<Money> {
        Decimal::from(self.shares)
            .checked_mul(self.entry_price)
            .ok_or_else(|| overflow("secondary.cost_basis"))
    }
}

// ---------------------------------------------------------------------------
// Deal
// ---------------------------------------------------------------------------

/// The fixed parameters of both instruments.
///
/// `DealTerms::default()` carries the terms of the deal as struck. Files and
/// JSON documents may override any subset of fields; missing fields keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealTerms {
    /// Company name shown in dashboard titles.
    pub deal_name: String,
    /// Footer line under the dashboard.
    pub caption: String,
    pub note: NoteTerms,
    pub secondary: SecondaryTerms,
}

impl Default for DealTerms {
    fn default() -> Self {
        Self {
            deal_name: "MNTN".to_string(),
            caption: "Crafted by BULLVC Apprentice".to_string(),
            note: NoteTerms::default(),
            secondary: SecondaryTerms::default(),
        }
    }
}

fn overflow(context: &str) -> DealError {
    DealError::Overflow {
        context: context.into(),
    }
}

impl DealTerms {
    /// Note principal plus secondary cost basis.
    pub fn total_invested(&self) -> DealResult<Money> {
        self.note
            .principal
            .checked_add(self.secondary.cost_basis()?)
            .ok_or_else(|| overflow("total_invested"))
    }

    /// Reject terms under which the outcome formulas are undefined.
    pub fn validate(&self) -> DealResult<()> {
        if self.note.principal <= Decimal::ZERO {
            return Err(DealError::InvalidInput {
                field: "note.principal".into(),
                reason: "Note principal must be positive".into(),
            });
        }
        if self.note.interest_rate < Decimal::ZERO {
            return Err(DealError::InvalidInput {
                field: "note.interest_rate".into(),
                reason: "Interest rate cannot be negative".into(),
            });
        }
        if self.note.years_held < Decimal::ZERO {
            return Err(DealError::InvalidInput {
                field: "note.years_held".into(),
                reason: "Holding period cannot be negative".into(),
            });
        }
        if self.note.coverage_price.is_zero() {
            return Err(DealError::DivisionByZero {
                context: "note.coverage_price is the conversion divisor".into(),
            });
        }
        if self.note.coverage_price < Decimal::ZERO {
            return Err(DealError::InvalidInput {
                field: "note.coverage_price".into(),
                reason: "Coverage price must be positive".into(),
            });
        }
        if self.secondary.shares == 0 || self.secondary.entry_price.is_zero() {
            return Err(DealError::DivisionByZero {
                context: "secondary cost basis is the MOIC divisor".into(),
            });
        }
        if self.secondary.entry_price < Decimal::ZERO {
            return Err(DealError::InvalidInput {
                field: "secondary.entry_price".into(),
                reason: "Entry price must be positive".into(),
            });
        }
        if self.secondary.holding_years <= Decimal::ZERO {
            return Err(DealError::InvalidInput {
                field: "secondary.holding_years".into(),
                reason: "Holding period must be positive to annualise returns".into(),
            });
        }

        // Every figure derived from the terms alone must fit in a Decimal
        self.note.conversion_shares()?;
        self.total_invested()?;
        Ok(())
    }
}
