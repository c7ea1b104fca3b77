//! # Money Module
//!
//! `Money` holds an amount as whole cents. Every price, discount, tax line
//! and tip in QuickServe is one of these.
//!
//! ## Rounding Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Percentages are basis points (Rate), never f64                         │
//! │                                                                         │
//! │    cents × bps ──► i128 product ──► round half-up once ──► cents        │
//! │                                                                         │
//! │    $2.49 at 50%:  249 × 5000 = 1_245_000                                │
//! │                   (1_245_000 + 5000) / 10_000 = 125                     │
//! │                                                                         │
//! │  Multi-term discounts sum raw products first, then round              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quickserve_core::money::Money;
//! use quickserve_core::types::Rate;
//!
//! let fries = Money::from_cents(249); // $2.49
//! let half = fries.percent_of(Rate::from_percent(50));
//! assert_eq!(half.cents(), 125); // $1.245 rounds half-up
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::Rate;

/// Basis points in 100%.
pub const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// An amount in US cents. Signed so refunds and running balances can go
/// below zero; serializes as a bare integer.
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  MenuItem.final_price ──► OrderLine.unit_price ──► Order.subtotal       │
/// │                                                        │                │
/// │                              DiscountResolver ◄────────┘                │
/// │                                     │                                   │
/// │  Order.total = subtotal + fee − discount + tax + tip ──► Payment.amount │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Wraps a raw cent count.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Builds `$dollars.cents`. The sign lives on `dollars` only, so
    /// `(-5, 50)` is -$5.50.
    ///
    /// ```rust
    /// use quickserve_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(8, 99).cents(), 899);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a `cents × basis points` product back to cents, rounding
    /// half away from zero.
    ///
    /// Rules that accumulate several percentage terms (BOGO over many items)
    /// sum the raw products first and round once here.
    pub fn from_bps_product(raw: i128) -> Money {
        let half = BPS_SCALE / 2;
        let cents = if raw >= 0 {
            (raw + half) / BPS_SCALE
        } else {
            (raw - half) / BPS_SCALE
        };
        Money(cents as i64)
    }

    /// Raw cent count.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole dollars, truncated toward zero.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Cents after the decimal point, 0..=99 regardless of sign.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Strictly above zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Strictly below zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns `rate` percent of this amount, rounded half-up to the cent.
    ///
    /// ## Implementation
    /// Integer math only: `(cents * bps + 5000) / 10000`
    ///
    /// ## Example
    /// ```rust
    /// use quickserve_core::money::Money;
    /// use quickserve_core::types::Rate;
    ///
    /// let total = Money::from_cents(2000); // $20.00
    /// let off = total.percent_of(Rate::from_percent(15));
    /// assert_eq!(off.cents(), 300); // $3.00
    /// ```
    pub fn percent_of(&self, rate: Rate) -> Money {
        Money::from_bps_product(self.0 as i128 * rate.bps() as i128)
    }

    /// Sales tax on a post-discount, pre-tip amount. Same rounding as
    /// [`Money::percent_of`].
    #[inline]
    pub fn calculate_tax(&self, rate: Rate) -> Money {
        self.percent_of(rate)
    }

    /// Line total for `qty` units.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Subtracts `other`, flooring the result at zero.
    ///
    /// ## Example
    /// ```rust
    /// use quickserve_core::money::Money;
    ///
    /// let total = Money::from_cents(500);
    /// assert_eq!(total.sub_floor_zero(Money::from_cents(800)), Money::zero());
    /// ```
    #[inline]
    pub fn sub_floor_zero(&self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }

    /// Clamps this amount into `0..=ceiling`.
    #[inline]
    pub fn clamp_to(&self, ceiling: Money) -> Money {
        Money(self.0.min(ceiling.0).max(0))
    }

    /// Decimal dollars for reporting (never used for arithmetic).
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as `$4.99` / `-$5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollar_and_cent_parts() {
        let combo = Money::from_cents(1299);
        assert_eq!(combo.dollars(), 12);
        assert_eq!(combo.cents_part(), 99);

        let refund = Money::from_cents(-307);
        assert_eq!(refund.dollars(), -3);
        assert_eq!(refund.cents_part(), 7);
    }

    #[test]
    fn test_receipt_formatting() {
        assert_eq!(Money::from_cents(599).to_string(), "$5.99");
        assert_eq!(Money::from_cents(1200).to_string(), "$12.00");
        assert_eq!(Money::from_cents(-307).to_string(), "-$3.07");
        assert_eq!(Money::default().to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_percent_of_rounds_half_up() {
        // $2.49 at 50% = $1.245 → $1.25
        assert_eq!(Money::from_cents(249).percent_of(Rate::from_percent(50)).cents(), 125);
        // $10.00 at 8.25% = $0.825 → $0.83
        assert_eq!(Money::from_cents(1000).percent_of(Rate::from_bps(825)).cents(), 83);
        // $9.22 at 15% = $1.383 → $1.38
        assert_eq!(Money::from_cents(922).percent_of(Rate::from_percent(15)).cents(), 138);
    }

    #[test]
    fn test_from_bps_product_single_rounding() {
        // Two BOGO terms of 124.5 cents each sum to 249 exactly
        let raw = 249i128 * 5000 + 249i128 * 5000;
        assert_eq!(Money::from_bps_product(raw).cents(), 249);
        assert_eq!(Money::from_bps_product(-12_450).cents(), -1);
    }

    #[test]
    fn test_tax_calculation() {
        let amount = Money::from_cents(1000);
        assert_eq!(amount.calculate_tax(Rate::from_percent(8)).cents(), 80);
    }

    #[test]
    fn test_floor_and_clamp() {
        let five = Money::from_cents(500);
        assert_eq!(five.sub_floor_zero(Money::from_cents(300)).cents(), 200);
        assert!(five.sub_floor_zero(Money::from_cents(900)).is_zero());

        assert_eq!(Money::from_cents(900).clamp_to(five), five);
        assert_eq!(Money::from_cents(-10).clamp_to(five), Money::zero());
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_positive() && !Money::zero().is_negative());

        let refund = Money::from_cents(-250);
        assert!(refund.is_negative());
        assert_eq!(refund.abs(), Money::from_cents(250));
        assert_eq!(Money::from_major_minor(-2, 50), refund);
    }

    #[test]
    fn test_serializes_as_plain_cents() {
        let json = serde_json::to_string(&Money::from_cents(899)).unwrap();
        assert_eq!(json, "899");
    }
}
