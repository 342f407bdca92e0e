//! # Money Module
//!
//! Provides the `Money` type for handling euro amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Daily rate €92.50 × 3 totems × 7 days in f64 drifts by fractions of   │
//! │  a cent, and a quote printed twice can disagree with itself.           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    9250 × 3 × 7 = 194250 cents = €1942.50, exactly                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The persisted inventory stores daily rates as decimal euros, so the
//! [`euros`] serde adapter converts at the JSON boundary and nowhere else.
//!
//! ## Usage
//! ```rust
//! use totem_core::money::Money;
//!
//! let rate = Money::from_euros(95);
//! let rental = rate.multiply_quantity(3).multiply_quantity(2);
//! assert_eq!(rental.cents(), 57_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in euro cents.
///
/// Serializes as the raw cent count. Use [`euros`] for fields that must stay
/// compatible with the decimal-euro inventory format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use totem_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(9250).to_string(), "€92.50");
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole euros.
    #[inline]
    pub const fn from_euros(euros: i64) -> Self {
        Money(euros * 100)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-euro portion (truncated toward zero).
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cent portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity (totems, days, legs of a trip).
    ///
    /// ```rust
    /// use totem_core::money::Money;
    ///
    /// let per_km = Money::from_euros(1);
    /// assert_eq!(per_km.multiply_quantity(2 * 412).cents(), 82_400);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Like [`multiply_quantity`](Self::multiply_quantity), but `None` when
    /// the product does not fit in an `i64` of cents.
    #[inline]
    pub const fn checked_multiply(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Splits the amount into `parts` equal shares, rounded half away from
    /// zero to the nearest cent.
    ///
    /// Returns `None` for zero parts.
    ///
    /// ```rust
    /// use totem_core::money::Money;
    ///
    /// // €100.00 over 3 totems = €33.33 each
    /// assert_eq!(Money::from_euros(100).split(3), Some(Money::from_cents(3333)));
    /// // €0.05 over 2 = 2.5 cents → 3 cents
    /// assert_eq!(Money::from_cents(5).split(2), Some(Money::from_cents(3)));
    /// ```
    pub fn split(&self, parts: u32) -> Option<Money> {
        if parts == 0 {
            return None;
        }
        let parts = parts as i128;
        let value = self.0 as i128;
        let half = parts / 2;
        let rounded = if value >= 0 {
            (value + half) / parts
        } else {
            (value - half) / parts
        };
        Some(Money(rounded as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug/CLI rendering. Localized formatting belongs to the front end.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}€{}.{:02}", sign, self.euros().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Decimal-Euro Serde Adapter
// =============================================================================

/// Serde adapter that reads and writes Money as a decimal euro number.
///
/// ```text
///   JSON  {"dailyRate": 92.5}   ⇄   Money(9250)
///   JSON  {"dailyRate": 100}    ⇄   Money(10000)
/// ```
///
/// Whole-euro values are written as integers so a round trip through the
/// shared inventory leaves untouched rows byte-identical.
pub mod euros {
    use super::Money;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        if value.cents_part() == 0 {
            serializer.serialize_i64(value.euros())
        } else {
            serializer.serialize_f64(value.cents() as f64 / 100.0)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        if !raw.is_finite() {
            return Err(D::Error::custom("euro amount must be a finite number"));
        }
        Ok(Money::from_cents((raw * 100.0).round() as i64))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Rate {
        #[serde(with = "euros")]
        rate: Money,
    }

    #[test]
    fn test_from_euros_and_parts() {
        let money = Money::from_cents(9250);
        assert_eq!(money.euros(), 92);
        assert_eq!(money.cents_part(), 50);
        assert_eq!(Money::from_euros(300).cents(), 30_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(9250).to_string(), "€92.50");
        assert_eq!(Money::from_euros(500).to_string(), "€500.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-€5.50");
        assert_eq!(Money::zero().to_string(), "€0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_euros(10);
        let b = Money::from_euros(5);
        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3u32).cents(), 3000);
        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total, Money::from_euros(20));
    }

    #[test]
    fn test_split_rounds_to_nearest_cent() {
        assert_eq!(Money::from_euros(300).split(2), Some(Money::from_euros(150)));
        assert_eq!(Money::from_euros(10).split(3), Some(Money::from_cents(333)));
        assert_eq!(Money::from_euros(20).split(3), Some(Money::from_cents(667)));
        assert_eq!(Money::from_cents(-5).split(2), Some(Money::from_cents(-3)));
        assert_eq!(Money::from_euros(1).split(0), None);
    }

    #[test]
    fn test_euro_adapter_reads_integers_and_decimals() {
        let whole: Rate = serde_json::from_str(r#"{"rate":100}"#).unwrap();
        assert_eq!(whole.rate, Money::from_euros(100));

        let decimal: Rate = serde_json::from_str(r#"{"rate":92.5}"#).unwrap();
        assert_eq!(decimal.rate, Money::from_cents(9250));

        // 0.1 + 0.2 style noise must land on the nearest cent
        let noisy: Rate = serde_json::from_str(r#"{"rate":0.30000000000000004}"#).unwrap();
        assert_eq!(noisy.rate, Money::from_cents(30));
    }

    #[test]
    fn test_euro_adapter_writes_compact_numbers() {
        let json = serde_json::to_string(&Rate { rate: Money::from_euros(95) }).unwrap();
        assert_eq!(json, r#"{"rate":95}"#);

        let json = serde_json::to_string(&Rate { rate: Money::from_cents(9250) }).unwrap();
        assert_eq!(json, r#"{"rate":92.5}"#);
    }

    #[test]
    fn test_money_serializes_as_cents() {
        assert_eq!(serde_json::to_string(&Money::from_cents(1234)).unwrap(), "1234");
    }
}
