//! # Customers
//!
//! Customer records and the loyalty program.
//!
//! ## Loyalty Ladder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Regular ──(upgrade: 1 pt per whole $ already spent)──► Loyalty         │
//! │                                                                         │
//! │  Loyalty tiers by points:                                               │
//! │    Bronze    0 – 499      5%                                            │
//! │    Silver  500 – 1999     8%                                            │
//! │    Gold   2000 – 4999    12%                                            │
//! │    Platinum     5000+    15%                                            │
//! │                                                                         │
//! │  Vip: always Platinum, never below 10 000 points, 20%                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tier is recomputed after every point change, so redeeming points can
//! drop a loyalty member to a lower tier.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

use crate::context::RestaurantContext;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CustomerAttributes, Rate, ATTR_CUSTOMER_TYPE, ATTR_LOYALTY_TIER};
use crate::validation::{validate_email, validate_phone};

/// Points granted on app signup.
pub const SIGNUP_BONUS_POINTS: u64 = 100;

/// VIP balances are topped up to at least this many points.
pub const VIP_MIN_POINTS: u64 = 10_000;

// =============================================================================
// Loyalty Tier
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoyaltyTier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyTier {
    pub fn from_points(points: u64) -> Self {
        match points {
            0..=499 => LoyaltyTier::Bronze,
            500..=1_999 => LoyaltyTier::Silver,
            2_000..=4_999 => LoyaltyTier::Gold,
            _ => LoyaltyTier::Platinum,
        }
    }

    /// Order discount for the tier.
    pub fn discount_rate(&self) -> Rate {
        match self {
            LoyaltyTier::Bronze => Rate::from_percent(5),
            LoyaltyTier::Silver => Rate::from_percent(8),
            LoyaltyTier::Gold => Rate::from_percent(12),
            LoyaltyTier::Platinum => Rate::from_percent(15),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoyaltyTier::Bronze => "bronze",
            LoyaltyTier::Silver => "silver",
            LoyaltyTier::Gold => "gold",
            LoyaltyTier::Platinum => "platinum",
        }
    }

    pub fn benefits(&self) -> &'static [&'static str] {
        match self {
            LoyaltyTier::Bronze => &["5% discount on orders", "Birthday reward", "Exclusive offers"],
            LoyaltyTier::Silver => &[
                "8% discount on orders",
                "Free fries every 10th visit",
                "Priority customer service",
                "Early access to new items",
            ],
            LoyaltyTier::Gold => &[
                "12% discount on orders",
                "Free menu item monthly",
                "Skip the line service",
                "Double points on Fridays",
            ],
            LoyaltyTier::Platinum => &[
                "15% discount on orders",
                "Free meal quarterly",
                "VIP customer service",
                "Triple points weekends",
                "Exclusive platinum events",
            ],
        }
    }
}

impl fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Customer Kind
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    Regular,
    Loyalty,
    Vip,
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CustomerType::Regular => "regular",
            CustomerType::Loyalty => "loyalty",
            CustomerType::Vip => "vip",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomerKind {
    Regular {
        visits: u32,
    },
    Loyalty {
        points: u64,
        tier: LoyaltyTier,
    },
    Vip {
        code: String,
        manager: String,
        points: u64,
    },
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    id: String,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    kind: CustomerKind,
    total_spent: Money,
    order_history: Vec<String>,
    points_redeemed: u64,
    preferences: BTreeMap<String, String>,
}

impl Customer {
    fn build(
        ctx: &mut RestaurantContext,
        name: &str,
        phone: Option<&str>,
        email: Option<&str>,
        kind: CustomerKind,
    ) -> CoreResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            }
            .into());
        }
        let phone = phone.map(validate_phone).transpose()?;
        if let Some(email) = email {
            validate_email(email)?;
        }

        let customer = Customer {
            id: ctx.next_customer_id(),
            name: name.to_string(),
            phone,
            email: email.map(|e| e.trim().to_lowercase()),
            kind,
            total_spent: Money::zero(),
            order_history: Vec::new(),
            points_redeemed: 0,
            preferences: BTreeMap::new(),
        };
        info!(customer_id = %customer.id, customer_type = %customer.customer_type(), "Customer created");
        Ok(customer)
    }

    /// Anonymous counter customer.
    pub fn walk_in(ctx: &mut RestaurantContext, name: &str) -> CoreResult<Self> {
        let mut customer = Self::build(ctx, name, None, None, CustomerKind::Regular { visits: 0 })?;
        customer
            .preferences
            .insert("service_type".to_string(), "walk_in".to_string());
        Ok(customer)
    }

    pub fn regular(
        ctx: &mut RestaurantContext,
        name: &str,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> CoreResult<Self> {
        Self::build(ctx, name, phone, email, CustomerKind::Regular { visits: 0 })
    }

    /// Loyalty member signing up through the app: starts with 100 points.
    pub fn app_signup(ctx: &mut RestaurantContext, name: &str, phone: &str, email: &str) -> CoreResult<Self> {
        let mut customer = Self::build(
            ctx,
            name,
            Some(phone),
            Some(email),
            CustomerKind::Loyalty {
                points: SIGNUP_BONUS_POINTS,
                tier: LoyaltyTier::from_points(SIGNUP_BONUS_POINTS),
            },
        )?;
        customer
            .preferences
            .insert("signup_channel".to_string(), "mobile_app".to_string());
        Ok(customer)
    }

    pub fn vip(
        ctx: &mut RestaurantContext,
        name: &str,
        phone: Option<&str>,
        code: &str,
        manager: &str,
    ) -> CoreResult<Self> {
        Self::build(
            ctx,
            name,
            phone,
            None,
            CustomerKind::Vip {
                code: code.to_string(),
                manager: manager.to_string(),
                points: VIP_MIN_POINTS,
            },
        )
    }

    /// Converts a regular customer to a loyalty member, crediting one point
    /// per whole dollar already spent. Other kinds are returned unchanged.
    pub fn upgrade_to_loyalty(mut self) -> Self {
        if let CustomerKind::Regular { .. } = self.kind {
            let points = self.total_spent.dollars().max(0) as u64;
            self.kind = CustomerKind::Loyalty {
                points,
                tier: LoyaltyTier::from_points(points),
            };
            info!(customer_id = %self.id, points, "Customer upgraded to loyalty");
        }
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn kind(&self) -> &CustomerKind {
        &self.kind
    }

    pub fn total_spent(&self) -> Money {
        self.total_spent
    }

    pub fn order_history(&self) -> &[String] {
        &self.order_history
    }

    pub fn order_count(&self) -> usize {
        self.order_history.len()
    }

    pub fn customer_type(&self) -> CustomerType {
        match self.kind {
            CustomerKind::Regular { .. } => CustomerType::Regular,
            CustomerKind::Loyalty { .. } => CustomerType::Loyalty,
            CustomerKind::Vip { .. } => CustomerType::Vip,
        }
    }

    pub fn is_vip(&self) -> bool {
        matches!(self.kind, CustomerKind::Vip { .. })
    }

    /// Points balance; zero for regular customers.
    pub fn points(&self) -> u64 {
        match self.kind {
            CustomerKind::Regular { .. } => 0,
            CustomerKind::Loyalty { points, .. } | CustomerKind::Vip { points, .. } => points,
        }
    }

    pub fn points_redeemed(&self) -> u64 {
        self.points_redeemed
    }

    /// `None` for regular customers; VIPs are always Platinum.
    pub fn tier(&self) -> Option<LoyaltyTier> {
        match self.kind {
            CustomerKind::Regular { .. } => None,
            CustomerKind::Loyalty { tier, .. } => Some(tier),
            CustomerKind::Vip { .. } => Some(LoyaltyTier::Platinum),
        }
    }

    pub fn discount_rate(&self) -> Rate {
        match &self.kind {
            CustomerKind::Regular { .. } => Rate::zero(),
            CustomerKind::Loyalty { tier, .. } => tier.discount_rate(),
            CustomerKind::Vip { .. } => Rate::from_percent(20),
        }
    }

    /// Attributes handed to the discount resolver.
    pub fn attributes(&self) -> CustomerAttributes {
        let mut attrs = CustomerAttributes::new().with(ATTR_CUSTOMER_TYPE, self.customer_type().to_string());
        if let Some(tier) = self.tier() {
            attrs.insert(ATTR_LOYALTY_TIER, tier.as_str());
        }
        attrs
    }

    // =========================================================================
    // Contact & Preferences
    // =========================================================================

    pub fn set_phone(&mut self, phone: &str) -> CoreResult<()> {
        self.phone = Some(validate_phone(phone)?);
        Ok(())
    }

    pub fn set_email(&mut self, email: &str) -> CoreResult<()> {
        validate_email(email)?;
        self.email = Some(email.trim().to_lowercase());
        Ok(())
    }

    pub fn set_preference(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.preferences.insert(key.into(), value.into());
    }

    pub fn preference(&self, key: &str) -> Option<&str> {
        self.preferences.get(key).map(String::as_str)
    }

    // =========================================================================
    // Orders & Points
    // =========================================================================

    /// Records a paid order. Regular customers also get a visit counted.
    pub fn record_order(&mut self, order_id: impl Into<String>, amount: Money) {
        let order_id = order_id.into();
        self.total_spent += amount;
        if let CustomerKind::Regular { visits } = &mut self.kind {
            *visits += 1;
        }
        info!(customer_id = %self.id, order_id = %order_id, amount = %amount, "Customer order recorded");
        self.order_history.push(order_id);
    }

    /// Credits one point per whole dollar, scaled by `multiplier_bps`
    /// (10 000 = 1×, 20 000 = double points). Returns the points earned;
    /// regular customers earn nothing.
    pub fn earn_points(&mut self, amount: Money, multiplier_bps: u32) -> u64 {
        let base = amount.dollars().max(0) as u64;
        let earned = base * multiplier_bps as u64 / 10_000;

        match &mut self.kind {
            CustomerKind::Regular { .. } => return 0,
            CustomerKind::Loyalty { points, tier } => {
                *points += earned;
                let new_tier = LoyaltyTier::from_points(*points);
                if new_tier != *tier {
                    info!(customer_id = %self.id, from = %tier, to = %new_tier, "Loyalty tier changed");
                    *tier = new_tier;
                }
            }
            CustomerKind::Vip { points, .. } => *points += earned,
        }
        earned
    }

    /// Spends points. Tier is recomputed and may go down.
    pub fn redeem_points(&mut self, requested: u64) -> CoreResult<()> {
        let available = self.points();
        if requested > available || matches!(self.kind, CustomerKind::Regular { .. }) {
            return Err(CoreError::InsufficientPoints { available, requested });
        }

        match &mut self.kind {
            CustomerKind::Loyalty { points, tier } => {
                *points -= requested;
                *tier = LoyaltyTier::from_points(*points);
            }
            CustomerKind::Vip { points, .. } => *points -= requested,
            CustomerKind::Regular { .. } => {}
        }
        self.points_redeemed += requested;
        info!(customer_id = %self.id, points = requested, "Points redeemed");
        Ok(())
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.id, self.customer_type())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(LoyaltyTier::from_points(0), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::from_points(499), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::from_points(500), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::from_points(2_000), LoyaltyTier::Gold);
        assert_eq!(LoyaltyTier::from_points(5_000), LoyaltyTier::Platinum);
        assert_eq!(LoyaltyTier::Gold.discount_rate().bps(), 1_200);
    }

    #[test]
    fn test_walk_in_and_regular() {
        let mut ctx = RestaurantContext::default();
        let walk_in = Customer::walk_in(&mut ctx, "Guest").unwrap();
        assert_eq!(walk_in.id(), "CUST00001");
        assert_eq!(walk_in.preference("service_type"), Some("walk_in"));
        assert!(walk_in.discount_rate().is_zero());
        assert_eq!(walk_in.attributes().loyalty_tier(), None);
        assert_eq!(walk_in.attributes().customer_type(), Some("regular"));

        let regular = Customer::regular(&mut ctx, "Ann", Some("(555) 123-4567"), Some("Ann@Example.com")).unwrap();
        assert_eq!(regular.phone(), Some("5551234567"));
        assert_eq!(regular.email(), Some("ann@example.com"));

        assert!(Customer::regular(&mut ctx, "Bad", Some("123"), None).is_err());
        assert!(Customer::regular(&mut ctx, "Bad", None, Some("nope")).is_err());
        assert!(Customer::walk_in(&mut ctx, "  ").is_err());
    }

    #[test]
    fn test_app_signup_bonus() {
        let mut ctx = RestaurantContext::default();
        let customer = Customer::app_signup(&mut ctx, "Bo", "+1 555 000 1111", "bo@example.com").unwrap();
        assert_eq!(customer.points(), 100);
        assert_eq!(customer.tier(), Some(LoyaltyTier::Bronze));
        assert_eq!(customer.discount_rate().bps(), 500);
        assert_eq!(customer.attributes().loyalty_tier(), Some("bronze"));
    }

    #[test]
    fn test_upgrade_credits_spend() {
        let mut ctx = RestaurantContext::default();
        let mut customer = Customer::regular(&mut ctx, "Cy", None, None).unwrap();
        customer.record_order("ORD000001", Money::from_cents(45_099));
        customer.record_order("ORD000002", Money::from_cents(10_000));
        assert_eq!(customer.kind(), &CustomerKind::Regular { visits: 2 });

        let loyal = customer.upgrade_to_loyalty();
        assert_eq!(loyal.points(), 550);
        assert_eq!(loyal.tier(), Some(LoyaltyTier::Silver));
        assert_eq!(loyal.order_count(), 2);
    }

    #[test]
    fn test_earn_and_redeem() {
        let mut ctx = RestaurantContext::default();
        let mut customer = Customer::app_signup(&mut ctx, "Di", "5550001111", "di@example.com").unwrap();

        assert_eq!(customer.earn_points(Money::from_cents(5_099), 20_000), 100);
        assert_eq!(customer.points(), 200);

        assert_eq!(customer.earn_points(Money::from_cents(30_000), 10_000), 300);
        assert_eq!(customer.tier(), Some(LoyaltyTier::Silver));

        customer.redeem_points(100).unwrap();
        assert_eq!(customer.tier(), Some(LoyaltyTier::Bronze));
        assert_eq!(customer.points_redeemed(), 100);

        let err = customer.redeem_points(1_000).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientPoints {
                available: 400,
                requested: 1_000
            }
        ));

        let mut regular = Customer::walk_in(&mut ctx, "Ed").unwrap();
        assert_eq!(regular.earn_points(Money::from_cents(10_000), 10_000), 0);
        assert!(regular.redeem_points(0).is_err());
    }

    #[test]
    fn test_vip_stays_platinum() {
        let mut ctx = RestaurantContext::default();
        let mut vip = Customer::vip(&mut ctx, "Star", None, "VIP001", "Manager Kim").unwrap();
        assert_eq!(vip.points(), VIP_MIN_POINTS);
        assert_eq!(vip.discount_rate().bps(), 2_000);

        vip.redeem_points(9_500).unwrap();
        assert_eq!(vip.tier(), Some(LoyaltyTier::Platinum));
        assert_eq!(vip.attributes().customer_type(), Some("vip"));
        assert_eq!(vip.attributes().loyalty_tier(), Some("platinum"));
        assert!(vip.is_vip());
    }

    #[test]
    fn test_tier_benefits() {
        assert_eq!(LoyaltyTier::Platinum.benefits().len(), 5);
        assert!(LoyaltyTier::Silver.benefits()[0].starts_with("8%"));
    }
}
