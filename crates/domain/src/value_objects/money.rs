//! Exact money amounts.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Upper bound for a single transaction, in whole currency units.
const MAX_AMOUNT_UNITS: i64 = 1_000_000_000;

/// A strictly positive amount with at most two fractional digits.
///
/// Persisted as integer cents so that sums never lose precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value <= Decimal::ZERO {
            return Err(DomainError::validation("Amount must be greater than zero"));
        }
        if value.round_dp(2) != value {
            return Err(DomainError::validation(
                "Amount cannot have more than two decimal places",
            ));
        }
        if value > Decimal::from(MAX_AMOUNT_UNITS) {
            return Err(DomainError::validation(format!(
                "Amount cannot exceed {MAX_AMOUNT_UNITS}"
            )));
        }
        Ok(Self(value.round_dp(2)))
    }

    /// Rebuilds an amount from its stored cent value.
    pub fn from_cents(cents: i64) -> Result<Self, DomainError> {
        Self::new(Decimal::new(cents, 2))
    }

    pub fn to_cents(self) -> i64 {
        // Bounded by MAX_AMOUNT_UNITS, so the conversion cannot fail.
        (self.0 * Decimal::ONE_HUNDRED).to_i64().unwrap_or(i64::MAX)
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Decimal {
        amount.0
    }
}
