// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monetary amounts and percentages.
//!
//! Amounts are held as integer minor units (cents/paise) so that pricing
//! arithmetic is exact. Conversion from the decimal values carried in API
//! payloads happens exactly once, at the boundary, via [`Money::from_major`].

use crate::error::DomainError;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

const MINOR_PER_MAJOR: i64 = 100;
const BASIS_POINTS_PER_WHOLE: i64 = 10_000;

/// A non-fractional amount of currency in minor units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Converts a decimal amount (as carried in JSON) into minor units.
    ///
    /// The value is rounded to the nearest minor unit.
    ///
    /// # Arguments
    ///
    /// * `field` - The input field name, used in the error
    /// * `amount` - The decimal amount
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the value is negative,
    /// not finite, or too large to represent.
    pub fn from_major(field: &'static str, amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() {
            return Err(DomainError::InvalidAmount {
                field,
                reason: String::from("amount must be a finite number"),
            });
        }
        if amount < 0.0 {
            return Err(DomainError::InvalidAmount {
                field,
                reason: format!("amount must not be negative (got {amount})"),
            });
        }

        let scale: f64 = MINOR_PER_MAJOR.to_f64().unwrap_or(100.0);
        let minor: i64 = (amount * scale)
            .round()
            .to_i64()
            .ok_or_else(|| DomainError::InvalidAmount {
                field,
                reason: format!("amount {amount} is out of range"),
            })?;

        Ok(Self(minor))
    }

    /// Returns the amount as a decimal value for presentation.
    #[must_use]
    pub fn as_major(self) -> f64 {
        let minor: f64 = self.0.to_f64().unwrap_or_default();
        let scale: f64 = MINOR_PER_MAJOR.to_f64().unwrap_or(100.0);
        minor / scale
    }

    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Multiplies a unit price by a quantity.
    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    /// Applies a percentage to this amount, rounding half-up to a minor unit.
    ///
    /// Negative amounts are not expected here; the result for them is
    /// rounded toward positive infinity.
    #[must_use]
    pub fn percent_of(self, percentage: Percentage) -> Option<Self> {
        let scaled: i64 = self.0.checked_mul(i64::from(percentage.basis_points()))?;
        let rounded: i64 = scaled.checked_add(BASIS_POINTS_PER_WHOLE / 2)?;
        Some(Self(rounded.div_euclid(BASIS_POINTS_PER_WHOLE)))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign: &str = if self.0 < 0 { "-" } else { "" };
        let abs: u64 = self.0.unsigned_abs();
        let per: u64 = MINOR_PER_MAJOR.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / per, abs % per)
    }
}

/// A percentage with two decimal places of precision (basis points).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percentage(u32);

impl Percentage {
    /// Creates a percentage from a decimal value such as `10` or `12.5`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside `0..=100` or not finite.
    pub fn from_percent(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(DomainError::InvalidField {
                field: "percentage",
                reason: format!("percentage must be between 0 and 100 (got {value})"),
            });
        }
        let bp: u32 = (value * 100.0)
            .round()
            .to_u32()
            .ok_or_else(|| DomainError::InvalidField {
                field: "percentage",
                reason: format!("percentage {value} is out of range"),
            })?;
        Ok(Self(bp))
    }

    /// Creates a percentage from basis points (1/100th of a percent).
    ///
    /// # Errors
    ///
    /// Returns an error if the value exceeds 100%.
    pub fn from_basis_points(bp: u32) -> Result<Self, DomainError> {
        if i64::from(bp) > BASIS_POINTS_PER_WHOLE {
            return Err(DomainError::InvalidField {
                field: "percentage",
                reason: format!("{bp} basis points exceeds 100%"),
            });
        }
        Ok(Self(bp))
    }

    #[must_use]
    pub const fn basis_points(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_percent(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_rounds_to_minor_units() {
        assert_eq!(Money::from_major("subtotal", 1000.0), Ok(Money::from_minor(100_000)));
        assert_eq!(Money::from_major("subtotal", 19.99), Ok(Money::from_minor(1999)));
        assert_eq!(Money::from_major("subtotal", 0.1), Ok(Money::from_minor(10)));
    }

    #[test]
    fn test_from_major_rejects_negative_and_nan() {
        assert!(Money::from_major("subtotal", -1.0).is_err());
        assert!(Money::from_major("subtotal", f64::NAN).is_err());
        assert!(Money::from_major("subtotal", f64::INFINITY).is_err());
    }

    #[test]
    fn test_percent_of_rounds_half_up() {
        let ten: Percentage = Percentage::from_percent(10.0).unwrap();
        assert_eq!(
            Money::from_minor(100_000).percent_of(ten),
            Some(Money::from_minor(10_000))
        );

        // 12.5% of 0.99 = 0.12375 -> 0.12
        let twelve_and_half: Percentage = Percentage::from_percent(12.5).unwrap();
        assert_eq!(
            Money::from_minor(99).percent_of(twelve_and_half),
            Some(Money::from_minor(12))
        );

        // 50% of 0.05 = 0.025 -> 0.03
        let half: Percentage = Percentage::from_percent(50.0).unwrap();
        assert_eq!(
            Money::from_minor(5).percent_of(half),
            Some(Money::from_minor(3))
        );
    }

    #[test]
    fn test_percentage_bounds() {
        assert!(Percentage::from_percent(100.0).is_ok());
        assert!(Percentage::from_percent(100.01).is_err());
        assert!(Percentage::from_percent(-0.5).is_err());
        assert!(Percentage::from_basis_points(10_001).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(90_000).to_string(), "900.00");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-150).to_string(), "-1.50");
    }
}
