//! # Shared Types
//!
//! Small value types used throughout QuickServe.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Shared Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │      Rate       │   │    LineItem     │   │ CustomerAttributes  │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  bps (u32)      │   │  name           │   │  customer_type      │   │
//! │  │  1500 = 15%     │   │  quantity       │   │  loyalty_tier       │   │
//! │  │                 │   │  unit_price     │   │  ... (open map)     │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! │                                                                         │
//! │  LineItem + CustomerAttributes are the discount resolver's inputs;     │
//! │  Rate drives every percentage (discounts, tax, card fees).             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = 15% (student discount), 800 bps = 8% (sales tax)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from whole percent.
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        Rate(percent * 100)
    }

    /// Creates a rate from a decimal percentage (for config input).
    pub fn from_percentage(pct: f64) -> Self {
        Rate((pct * 100.0).round().max(0.0) as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

/// `15%` for whole percentages, `8.25%` otherwise.
impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One line of an order as seen by the discount resolver.
///
/// The unit price is frozen at the moment the line was produced; later menu
/// price changes do not affect an order already in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Display name, e.g. "French Fries (Medium)"
    pub name: String,

    /// Units ordered (>= 1)
    pub quantity: i64,

    /// Price of a single unit
    pub unit_price: Money,
}

impl LineItem {
    /// Creates a new line item.
    pub fn new(name: impl Into<String>, quantity: i64, unit_price: Money) -> Self {
        LineItem {
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// Sums the line totals of a slice of items.
pub fn items_total(items: &[LineItem]) -> Money {
    items.iter().map(LineItem::line_total).sum()
}

// =============================================================================
// Customer Attributes
// =============================================================================

/// Attribute key carrying the customer category ("regular", "loyalty", "vip", "student").
pub const ATTR_CUSTOMER_TYPE: &str = "customer_type";

/// Attribute key carrying the loyalty tier ("bronze" .. "platinum").
pub const ATTR_LOYALTY_TIER: &str = "loyalty_tier";

/// Open string-keyed attributes describing the customer placing an order.
///
/// ## Example
/// ```rust
/// use quickserve_core::types::CustomerAttributes;
///
/// let attrs = CustomerAttributes::new()
///     .with("customer_type", "student")
///     .with("loyalty_tier", "Gold");
///
/// assert_eq!(attrs.loyalty_tier(), Some("Gold"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerAttributes(BTreeMap<String, String>);

impl CustomerAttributes {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Inserts or replaces an attribute.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Looks up an attribute.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The `loyalty_tier` attribute, if present.
    pub fn loyalty_tier(&self) -> Option<&str> {
        self.get(ATTR_LOYALTY_TIER)
    }

    /// The `customer_type` attribute, if present.
    pub fn customer_type(&self) -> Option<&str> {
        self.get(ATTR_CUSTOMER_TYPE)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CustomerAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        CustomerAttributes(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_conversions() {
        let rate = Rate::from_percent(15);
        assert_eq!(rate.bps(), 1500);
        assert_eq!(rate.percentage(), 15.0);

        assert_eq!(Rate::from_percentage(8.25).bps(), 825);
        assert_eq!(Rate::from_percentage(-3.0).bps(), 0);
        assert!(Rate::default().is_zero());
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::from_percent(20).to_string(), "20%");
        assert_eq!(Rate::from_bps(825).to_string(), "8.25%");
        assert_eq!(Rate::from_bps(1250).to_string(), "12.50%");
    }

    #[test]
    fn test_line_item_totals() {
        let items = vec![
            LineItem::new("French Fries (Large)", 2, Money::from_cents(299)),
            LineItem::new("McChicken", 1, Money::from_cents(399)),
        ];
        assert_eq!(items[0].line_total().cents(), 598);
        assert_eq!(items_total(&items).cents(), 997);
    }

    #[test]
    fn test_customer_attributes() {
        let attrs: CustomerAttributes = [("customer_type", "student"), ("loyalty_tier", "bronze")]
            .into_iter()
            .collect();

        assert_eq!(attrs.customer_type(), Some("student"));
        assert_eq!(attrs.loyalty_tier(), Some("bronze"));
        assert_eq!(attrs.get("missing"), None);
        assert_eq!(attrs.iter().count(), 2);
        assert!(CustomerAttributes::new().is_empty());
    }
}
