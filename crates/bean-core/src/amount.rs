//! # Monetary Amounts
//!
//! Exact decimal amounts, serialized the way the gateway expects:
//! fixed-point strings with exactly two fraction digits (`"50.00"`).
//! Floats are never accepted.

use crate::error::{GatewayError, GatewayResult};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A monetary amount with exact decimal semantics.
///
/// Formatting rounds half-away-from-zero to two places: `19.999`
/// serializes as `"20.00"` and `0.005` as `"0.01"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    /// Wrap an exact decimal value.
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Whole currency units: `Amount::from_units(50)` is `"50.00"`.
    pub fn from_units(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    /// Smallest currency units: `Amount::from_cents(1999)` is `"19.99"`.
    pub fn from_cents(value: i64) -> Self {
        Self(Decimal::new(value, 2))
    }

    /// The underlying decimal value, unrounded.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Wire representation: two fraction digits, half-away-from-zero.
    pub fn format(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.2}", rounded)
    }
}

impl FromStr for Amount {
    type Err = GatewayError;

    fn from_str(s: &str) -> GatewayResult<Self> {
        Decimal::from_str(s)
            .map(Self)
            .map_err(|e| GatewayError::Validation(format!("invalid amount '{}': {}", s, e)))
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self::from_units(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}
