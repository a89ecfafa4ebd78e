//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer smallest units                                   │
//! │    Rp15.000 × 2 = 30000 units, exactly                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rupiah has no minor unit in practice, so one unit is one rupiah. Other
//! currencies work the same way as long as every amount is kept in its
//! smallest unit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: stock adjustments and refunds may need negatives
/// - **Single field tuple struct**: serializes as a bare JSON integer
/// - **Checked multiplication**: a subtotal that overflows is an error, never a wrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from smallest units.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// let price = Money::from_units(15_000);
    /// assert_eq!(price.units(), 15_000);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in smallest units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies a unit price by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// let unit_price = Money::from_units(3_000);
    /// assert_eq!(unit_price.checked_multiply_quantity(3), Some(Money::from_units(9_000)));
    /// assert_eq!(Money::from_units(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Product: es teh Rp3.000
    /// Quantity: 3
    ///      │
    ///      ▼
    /// checked_multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Subtotal: Rp9.000
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Rupiah-style display with `.` as thousands separator: `Rp15.000`.
///
/// ## Note
/// This is for logs and receipts. API clients receive the raw integer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}Rp{}", sign, grouped)
    }
}

/// Default money is zero.
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl From<i64> for Money {
    fn from(units: i64) -> Self {
        Money(units)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units() {
        let money = Money::from_units(15_000);
        assert_eq!(money.units(), 15_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_units(15_000).to_string(), "Rp15.000");
        assert_eq!(Money::from_units(1_234_567).to_string(), "Rp1.234.567");
        assert_eq!(Money::from_units(500).to_string(), "Rp500");
        assert_eq!(Money::from_units(0).to_string(), "Rp0");
        assert_eq!(Money::from_units(-5_500).to_string(), "-Rp5.500");
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_units(12_000);
        assert_eq!(price.checked_multiply_quantity(5).map(|m| m.units()), Some(60_000));
        assert_eq!(Money::from_units(i64::MAX).checked_multiply_quantity(2), None);
        assert_eq!(Money::from_units(i64::MAX).checked_add(Money::from_units(1)), None);
    }

    #[test]
    fn test_sum() {
        let total: Money = [1_000, 2_000, 3_000].into_iter().map(Money::from).sum();
        assert_eq!(total.units(), 6_000);
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&Money::from_units(30_000)).unwrap();
        assert_eq!(json, "30000");
    }
}
