//! Whole-currency amounts converted into gateway minor units.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PaymentError;

/// Number of minor units (paise) in one rupee.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Amount in the smallest currency unit, as the gateway expects it.
///
/// Always strictly positive; the only way to build one is through
/// [`MinorUnits::from_major`] or [`MinorUnits::new`], both of which reject
/// zero and negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl MinorUnits {
    /// Wraps a value that is already expressed in minor units.
    pub fn new(amount: i64) -> Result<Self, PaymentError> {
        if amount <= 0 {
            return Err(PaymentError::Validation(format!(
                "amount must be positive, got {amount} minor units"
            )));
        }
        Ok(Self(amount))
    }

    /// Converts a whole-currency amount (e.g. rupees) into minor units.
    ///
    /// The result is `round(amount * 100)`, so integer inputs are exact and
    /// fractional inputs such as `19.99` do not drift to `1998`.
    pub fn from_major(amount: f64) -> Result<Self, PaymentError> {
        if !amount.is_finite() {
            return Err(PaymentError::Validation(format!(
                "amount must be a finite number, got {amount}"
            )));
        }
        if amount <= 0.0 {
            return Err(PaymentError::Validation(format!(
                "amount must be positive, got {amount}"
            )));
        }

        let minor = (amount * MINOR_UNITS_PER_MAJOR as f64).round();
        if minor >= i64::MAX as f64 {
            return Err(PaymentError::Validation(format!(
                "amount {amount} is too large"
            )));
        }

        Self::new(minor as i64)
    }

    /// Returns the raw minor-unit value.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.0 / MINOR_UNITS_PER_MAJOR;
        let minor = self.0 % MINOR_UNITS_PER_MAJOR;
        write!(f, "₹{}.{:02}", major, minor)
    }
}
