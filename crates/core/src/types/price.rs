//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Percentage saved when moving from `self` (the original price) to
    /// `discounted`, rounded to the nearest whole percent.
    ///
    /// Returns `None` when the discounted price is not lower or the original
    /// price is zero.
    #[must_use]
    pub fn discount_percent(&self, discounted: &Self) -> Option<u8> {
        if self.amount <= Decimal::ZERO || discounted.amount >= self.amount {
            return None;
        }
        let saved = (self.amount - discounted.amount) / self.amount * Decimal::ONE_HUNDRED;
        saved.round().to_u8()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency_code.decimal_places();
        let amount = self.amount.round_dp(dp);
        match self.currency_code {
            CurrencyCode::XOF => write!(f, "{amount} FCFA"),
            CurrencyCode::EUR => write!(f, "{amount:.2} €"),
            CurrencyCode::USD => write!(f, "${amount:.2}"),
        }
    }
}

/// ISO 4217 currency codes accepted by T-Express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// West African CFA franc (no minor unit).
    #[default]
    XOF,
    EUR,
    USD,
}

impl CurrencyCode {
    /// Number of decimal places used when displaying amounts.
    #[must_use]
    pub const fn decimal_places(self) -> u32 {
        match self {
            Self::XOF => 0,
            Self::EUR | Self::USD => 2,
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "XOF" | "FCFA" => Ok(Self::XOF),
            "EUR" => Ok(Self::EUR),
            "USD" => Ok(Self::USD),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}
