//! Rupiah price representation using decimal arithmetic.
//!
//! Prices are stored as `Decimal` so that `unit price × quantity` sums never
//! pick up binary floating-point error. On the wire (the cart cookie, order
//! hand-off fields) a price is a plain JSON number, which is what the browser
//! side has always written.

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Currency prefix used when displaying prices.
pub const CURRENCY_PREFIX: &str = "Rp";

/// Errors that can occur when parsing a price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("invalid price: {0}")]
    Invalid(String),
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative price in rupiah.
///
/// Deserialization goes through [`Price::new`], so a negative number on the
/// wire is rejected rather than smuggled past the invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of rupiah.
    #[must_use]
    pub fn from_whole(amount: u64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Multiply by a quantity, saturating at the decimal maximum.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Plain numeric form for machine consumers (e.g. `45000`, `12.5`).
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        self.0.normalize().to_string()
    }

    /// Display form, truncated to whole rupiah (e.g. `Rp 45000`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_PREFIX} {}", self.0.trunc())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| PriceError::Invalid(s.to_string()))?;
        Self::new(amount)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, price| Self(acc.0.saturating_add(price.0)))
    }
}
