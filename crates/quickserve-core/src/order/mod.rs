//! # Orders
//!
//! An order is a list of priced lines plus the way it is served.
//!
//! ## Status Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Pending ──► Confirmed ──► InPreparation ──► Ready ──► Completed        │
//! │     │            │               │                                      │
//! │     └────────────┴───────────────┴──────────► Cancelled                 │
//! │                                                                         │
//! │  Lines may only be edited while Pending or Confirmed.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! ```text
//! subtotal    = Σ unit_price × quantity
//! discounted  = max(0, subtotal + service_fee − discount)
//! tax         = discounted × tax_rate          (half-up, cents)
//! total       = discounted + tax + tip
//! ```

mod factory;

pub use factory::{
    DeliveryFactory, DeliveryRequest, DineInFactory, DineInRequest, DriveThruFactory, DriveThruRequest,
    FactoryRecord, OrderFactory, SeatingStatus, TakeoutFactory, TakeoutRequest,
};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::discount::DiscountOutcome;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{LineItem, Rate};
use crate::validation::{validate_item_name, validate_order_size, validate_price_cents, validate_quantity};
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_LINES};

/// Drive-thru orders are capped at this many units.
pub const DRIVE_THRU_MAX_ITEMS: i64 = 15;

/// Delivery radius in meters.
pub const DELIVERY_MAX_DISTANCE_M: u32 = 20_000;

/// Smallest delivery subtotal.
pub const DELIVERY_MIN_SUBTOTAL: Money = Money::from_cents(1_500);

const DELIVERY_BASE_FEE: Money = Money::from_cents(299);
const DELIVERY_CENTS_PER_KM: i64 = 50;
const EXPRESS_SURCHARGE: Money = Money::from_cents(499);

/// Kitchen estimates never exceed this.
const MAX_PREP_MINUTES: u32 = 30;

// =============================================================================
// Status
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    InPreparation,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, InPreparation)
                | (InPreparation, Ready)
                | (Ready, Completed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (InPreparation, Cancelled)
        )
    }

    /// Completed and cancelled orders never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn is_editable(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InPreparation => "in_preparation",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Order Kind
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    DineIn,
    Takeout,
    DriveThru,
    Delivery,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderType::DineIn => "dine_in",
            OrderType::Takeout => "takeout",
            OrderType::DriveThru => "drive_thru",
            OrderType::Delivery => "delivery",
        };
        f.write_str(s)
    }
}

/// How the order is served, with the data each channel needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderKind {
    DineIn {
        table: u32,
        party_size: u32,
    },
    Takeout {
        pickup_at: Option<NaiveDateTime>,
    },
    DriveThru {
        lane: u32,
        vehicle: String,
    },
    Delivery {
        address: String,
        distance_m: u32,
        express: bool,
    },
}

impl OrderKind {
    pub fn order_type(&self) -> OrderType {
        match self {
            OrderKind::DineIn { .. } => OrderType::DineIn,
            OrderKind::Takeout { .. } => OrderType::Takeout,
            OrderKind::DriveThru { .. } => OrderType::DriveThru,
            OrderKind::Delivery { .. } => OrderType::Delivery,
        }
    }

    /// Delivery charges $2.99 + $0.50/km (+$4.99 express); everything else is free.
    pub fn service_fee(&self) -> Money {
        match self {
            OrderKind::Delivery {
                distance_m,
                express,
                ..
            } => {
                let distance = (DELIVERY_CENTS_PER_KM * *distance_m as i64 + 500) / 1_000;
                let mut fee = DELIVERY_BASE_FEE + Money::from_cents(distance);
                if *express {
                    fee += EXPRESS_SURCHARGE;
                }
                fee
            }
            _ => Money::zero(),
        }
    }
}

// =============================================================================
// Priority & Complexity
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// Kitchen workload class by unit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderComplexity {
    Simple,
    Medium,
    Complex,
    Catering,
}

impl OrderComplexity {
    pub fn from_units(units: i64) -> Self {
        match units {
            i64::MIN..=3 => OrderComplexity::Simple,
            4..=7 => OrderComplexity::Medium,
            8..=19 => OrderComplexity::Complex,
            _ => OrderComplexity::Catering,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    #[serde(default)]
    pub customizations: Vec<String>,
}

impl OrderLine {
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: String,
    customer_id: Option<String>,
    kind: OrderKind,
    status: OrderStatus,
    lines: Vec<OrderLine>,
    discount: Money,
    discount_reasons: Vec<String>,
    tip: Money,
    tax_rate: Rate,
    special_instructions: String,
    assigned_staff: Vec<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Reporting view of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub customer_id: Option<String>,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub items_count: i64,
    pub subtotal: Money,
    pub service_fee: Money,
    pub discount: Money,
    pub tax: Money,
    pub tip: Money,
    pub total: Money,
    pub estimated_minutes: u32,
}

impl Order {
    /// Usually called through an [`OrderFactory`], which also issues the id.
    pub fn new(
        id: impl Into<String>,
        customer_id: Option<String>,
        kind: OrderKind,
        tax_rate: Rate,
        now: NaiveDateTime,
    ) -> Self {
        Order {
            id: id.into(),
            customer_id,
            kind,
            status: OrderStatus::Pending,
            lines: Vec::new(),
            discount: Money::zero(),
            discount_reasons: Vec::new(),
            tip: Money::zero(),
            tax_rate,
            special_instructions: String::new(),
            assigned_staff: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    pub fn kind(&self) -> &OrderKind {
        &self.kind
    }

    pub fn order_type(&self) -> OrderType {
        self.kind.order_type()
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn discount_reasons(&self) -> &[String] {
        &self.discount_reasons
    }

    pub fn tip(&self) -> Money {
        self.tip
    }

    pub fn tax_rate(&self) -> Rate {
        self.tax_rate
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    pub fn special_instructions(&self) -> &str {
        &self.special_instructions
    }

    pub fn set_special_instructions(&mut self, text: impl Into<String>) {
        self.special_instructions = text.into();
    }

    pub fn assigned_staff(&self) -> &[String] {
        &self.assigned_staff
    }

    /// Adds an employee to the order once.
    pub fn assign_staff(&mut self, employee_id: impl Into<String>) {
        let employee_id = employee_id.into();
        if !self.assigned_staff.contains(&employee_id) {
            self.assigned_staff.push(employee_id);
        }
    }

    /// Total number of units across all lines.
    pub fn items_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // =========================================================================
    // Line Editing
    // =========================================================================

    fn ensure_editable(&self) -> CoreResult<()> {
        if self.status.is_editable() {
            Ok(())
        } else {
            Err(CoreError::OrderLocked {
                order_id: self.id.clone(),
                status: self.status.to_string(),
            })
        }
    }

    /// Adds a line, merging into an identical existing line.
    ///
    /// ## Errors
    /// - `Validation` for a bad name, quantity or price
    /// - `OrderTooLarge` when the line limit is reached
    /// - `OrderLocked` once the kitchen has started
    pub fn add_item(
        &mut self,
        name: &str,
        quantity: i64,
        unit_price: Money,
        customizations: Vec<String>,
    ) -> CoreResult<()> {
        self.ensure_editable()?;
        validate_item_name(name)?;
        validate_quantity(quantity)?;
        validate_price_cents(unit_price.cents())?;

        let name = name.trim();
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.name == name && l.unit_price == unit_price && l.customizations == customizations)
        {
            let merged = line.quantity + quantity;
            if merged > MAX_ITEM_QUANTITY {
                return Err(ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 1,
                    max: MAX_ITEM_QUANTITY,
                }
                .into());
            }
            line.quantity = merged;
        } else {
            validate_order_size(self.lines.len()).map_err(|_| CoreError::OrderTooLarge {
                max: MAX_ORDER_LINES,
            })?;
            self.lines.push(OrderLine {
                name: name.to_string(),
                quantity,
                unit_price,
                customizations,
            });
        }

        debug!(order_id = %self.id, item = name, quantity, price = %unit_price, "Item added");
        Ok(())
    }

    /// Adds a priced [`LineItem`], e.g. one produced by the menu.
    pub fn add_line_item(&mut self, item: &LineItem) -> CoreResult<()> {
        self.add_item(&item.name, item.quantity, item.unit_price, Vec::new())
    }

    /// Removes `quantity` units of the first line named `name`; the line
    /// disappears when nothing is left.
    pub fn remove_item(&mut self, name: &str, quantity: i64) -> CoreResult<()> {
        self.ensure_editable()?;
        validate_quantity(quantity)?;

        let idx = self.line_index(name)?;
        if self.lines[idx].quantity <= quantity {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity -= quantity;
        }
        debug!(order_id = %self.id, item = name, quantity, "Item removed");
        Ok(())
    }

    /// Replaces the customizations of the first line named `name`.
    pub fn customize_item(&mut self, name: &str, customizations: Vec<String>) -> CoreResult<()> {
        self.ensure_editable()?;
        let idx = self.line_index(name)?;
        self.lines[idx].customizations = customizations;
        Ok(())
    }

    fn line_index(&self, name: &str) -> CoreResult<usize> {
        self.lines
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| CoreError::ItemNotInOrder {
                order_id: self.id.clone(),
                item: name.to_string(),
            })
    }

    // =========================================================================
    // Discount & Tip
    // =========================================================================

    /// Applies a resolver outcome. Returns the amount added to the order's
    /// discount (zero when the outcome did not apply).
    pub fn apply_discount(&mut self, outcome: &DiscountOutcome) -> CoreResult<Money> {
        if !outcome.applicable || outcome.discount_amount.is_zero() {
            return Ok(Money::zero());
        }
        let reason = format!("{}: {}", outcome.rule_name, outcome.reason);
        self.apply_discount_amount(outcome.discount_amount, reason)?;
        Ok(outcome.discount_amount)
    }

    /// Adds a manual discount. Discounts accumulate.
    pub fn apply_discount_amount(&mut self, amount: Money, reason: impl Into<String>) -> CoreResult<()> {
        if amount.is_negative() {
            return Err(ValidationError::MustBePositive {
                field: "discount".to_string(),
            }
            .into());
        }
        let reason = reason.into();
        self.discount += amount;
        info!(order_id = %self.id, amount = %amount, reason = %reason, "Discount applied");
        self.discount_reasons.push(reason);
        Ok(())
    }

    /// Sets the tip, replacing any earlier tip.
    pub fn add_tip(&mut self, amount: Money) -> CoreResult<()> {
        if amount.is_negative() {
            return Err(ValidationError::MustBePositive {
                field: "tip".to_string(),
            }
            .into());
        }
        self.tip = amount;
        Ok(())
    }

    // =========================================================================
    // Totals
    // =========================================================================

    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    pub fn service_fee(&self) -> Money {
        self.kind.service_fee()
    }

    /// Subtotal plus service fee minus discount, never below zero.
    pub fn discounted_subtotal(&self) -> Money {
        (self.subtotal() + self.service_fee()).sub_floor_zero(self.discount)
    }

    pub fn tax(&self) -> Money {
        self.discounted_subtotal().calculate_tax(self.tax_rate)
    }

    pub fn total(&self) -> Money {
        self.discounted_subtotal() + self.tax() + self.tip
    }

    /// Lines in the shape the discount resolver consumes.
    pub fn line_items(&self) -> Vec<LineItem> {
        self.lines
            .iter()
            .map(|l| LineItem::new(l.name.clone(), l.quantity, l.unit_price))
            .collect()
    }

    /// `max(3, 2 × units) × (1 + 0.1 × lines)`, truncated and capped at 30.
    pub fn estimated_prep_minutes(&self) -> u32 {
        let units = self.items_count().max(0) as u64;
        let base = (units * 2).max(3);
        let scaled = base * (10 + self.lines.len() as u64) / 10;
        scaled.min(MAX_PREP_MINUTES as u64) as u32
    }

    pub fn complexity(&self) -> OrderComplexity {
        OrderComplexity::from_units(self.items_count())
    }

    // =========================================================================
    // Validation & Status
    // =========================================================================

    /// Checks the rules of the order's channel.
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |reason: &str| CoreError::InvalidOrder {
            order_id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.lines.is_empty() {
            return Err(invalid("Order cannot be empty"));
        }

        match &self.kind {
            OrderKind::DineIn { table, party_size } => {
                if *table == 0 {
                    return Err(invalid("Invalid table number"));
                }
                if *party_size == 0 {
                    return Err(invalid("Invalid party size"));
                }
            }
            OrderKind::Takeout { .. } => {}
            OrderKind::DriveThru { .. } => {
                if self.items_count() > DRIVE_THRU_MAX_ITEMS {
                    return Err(invalid("Drive-thru orders are limited to 15 items"));
                }
            }
            OrderKind::Delivery {
                address,
                distance_m,
                ..
            } => {
                if address.trim().is_empty() {
                    return Err(invalid("Delivery address is required"));
                }
                if *distance_m > DELIVERY_MAX_DISTANCE_M {
                    return Err(invalid("Delivery distance exceeds 20km limit"));
                }
                if self.subtotal() < DELIVERY_MIN_SUBTOTAL {
                    return Err(invalid("Minimum $15.00 order for delivery"));
                }
            }
        }
        Ok(())
    }

    /// Moves the order along the status machine.
    pub fn transition(&mut self, next: OrderStatus, at: NaiveDateTime) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidStatusTransition {
                order_id: self.id.clone(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        info!(order_id = %self.id, from = %self.status, to = %next, "Order status changed");
        self.status = next;
        self.updated_at = at;
        Ok(())
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            order_id: self.id.clone(),
            customer_id: self.customer_id.clone(),
            order_type: self.order_type(),
            status: self.status,
            items_count: self.items_count(),
            subtotal: self.subtotal(),
            service_fee: self.service_fee(),
            discount: self.discount,
            tax: self.tax(),
            tip: self.tip,
            total: self.total(),
            estimated_minutes: self.estimated_prep_minutes(),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order {} ({}, {}) - {} items, {}",
            self.id,
            self.order_type(),
            self.status,
            self.items_count(),
            self.total()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::{DiscountOutcome, RuleKind};
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 6)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn takeout() -> Order {
        Order::new(
            "ORD000001",
            Some("CUST00001".into()),
            OrderKind::Takeout { pickup_at: None },
            Rate::from_bps(800),
            noon(),
        )
    }

    fn delivery(distance_m: u32, express: bool) -> Order {
        Order::new(
            "ORD000002",
            None,
            OrderKind::Delivery {
                address: "1 Main St".into(),
                distance_m,
                express,
            },
            Rate::from_bps(800),
            noon(),
        )
    }

    #[test]
    fn test_status_machine() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::InPreparation.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Pending));
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_transition_enforced() {
        let mut order = takeout();
        order.add_item("Big Mac", 1, Money::from_cents(499), vec![]).unwrap();
        order.transition(OrderStatus::Confirmed, noon()).unwrap();
        order.transition(OrderStatus::InPreparation, noon()).unwrap();

        let err = order.transition(OrderStatus::Completed, noon()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatusTransition { .. }));
        assert_eq!(order.status(), OrderStatus::InPreparation);

        assert!(matches!(
            order.add_item("Fries", 1, Money::from_cents(249), vec![]),
            Err(CoreError::OrderLocked { .. })
        ));
    }

    #[test]
    fn test_totals_with_discount_tax_and_tip() {
        let mut order = takeout();
        order.add_item("Big Mac", 2, Money::from_cents(499), vec![]).unwrap();
        order.add_item("Coca-Cola", 1, Money::from_cents(179), vec![]).unwrap();
        assert_eq!(order.subtotal().cents(), 1177);

        order.apply_discount_amount(Money::from_cents(177), "manager").unwrap();
        assert_eq!(order.discounted_subtotal().cents(), 1000);
        assert_eq!(order.tax().cents(), 80);

        order.add_tip(Money::from_cents(150)).unwrap();
        assert_eq!(order.total().cents(), 1230);
        assert!(order.add_tip(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_discount_never_makes_total_negative() {
        let mut order = takeout();
        order.add_item("Apple Pie", 1, Money::from_cents(149), vec![]).unwrap();
        order.apply_discount_amount(Money::from_cents(500), "promo").unwrap();
        assert_eq!(order.discounted_subtotal(), Money::zero());
        assert_eq!(order.total(), Money::zero());
    }

    #[test]
    fn test_apply_outcome() {
        let mut order = takeout();
        order.add_item("Big Mac", 4, Money::from_cents(500), vec![]).unwrap();

        let outcome = DiscountOutcome::applied(
            "Student",
            RuleKind::Percentage,
            Money::from_cents(300),
            "15% discount applied",
            Default::default(),
        );
        assert_eq!(order.apply_discount(&outcome).unwrap().cents(), 300);
        assert_eq!(order.discount_reasons(), ["Student: 15% discount applied"]);

        assert!(order.apply_discount(&DiscountOutcome::none()).unwrap().is_zero());
        assert_eq!(order.discount().cents(), 300);
    }

    #[test]
    fn test_add_merge_remove_customize() {
        let mut order = takeout();
        order.add_item("Fries", 1, Money::from_cents(249), vec![]).unwrap();
        order.add_item("Fries", 2, Money::from_cents(249), vec![]).unwrap();
        order
            .add_item("Fries", 1, Money::from_cents(249), vec!["no salt".into()])
            .unwrap();
        assert_eq!(order.lines().len(), 2);
        assert_eq!(order.lines()[0].quantity, 3);

        order.remove_item("Fries", 2).unwrap();
        assert_eq!(order.lines()[0].quantity, 1);
        order.remove_item("Fries", 5).unwrap();
        assert_eq!(order.lines().len(), 1);
        assert_eq!(order.lines()[0].customizations, vec!["no salt".to_string()]);

        order.customize_item("Fries", vec!["extra salt".into()]).unwrap();
        assert_eq!(order.lines()[0].customizations, vec!["extra salt".to_string()]);

        assert!(matches!(
            order.remove_item("Shake", 1),
            Err(CoreError::ItemNotInOrder { .. })
        ));
        assert!(order.add_item("Fries", 0, Money::from_cents(249), vec![]).is_err());
        assert!(order.add_item("Fries", 1, Money::from_cents(-1), vec![]).is_err());
        assert!(order.add_item("  ", 1, Money::from_cents(1), vec![]).is_err());
    }

    #[test]
    fn test_line_limit() {
        let mut order = takeout();
        for i in 0..MAX_ORDER_LINES {
            order
                .add_item(&format!("Item {}", i), 1, Money::from_cents(100), vec![])
                .unwrap();
        }
        assert!(matches!(
            order.add_item("One More", 1, Money::from_cents(100), vec![]),
            Err(CoreError::OrderTooLarge { .. })
        ));
        // merging into an existing line is still allowed at the limit
        order.add_item("Item 0", 2, Money::from_cents(100), vec![]).unwrap();
        assert_eq!(order.lines().len(), MAX_ORDER_LINES);
    }

    #[test]
    fn test_delivery_fee() {
        assert_eq!(delivery(5_000, false).service_fee().cents(), 549);
        assert_eq!(delivery(5_000, true).service_fee().cents(), 1048);
        assert_eq!(delivery(2_300, false).service_fee().cents(), 414);
        assert!(takeout().service_fee().is_zero());
    }

    #[test]
    fn test_delivery_validation() {
        let mut order = delivery(5_000, false);
        order.add_item("Big Mac", 1, Money::from_cents(499), vec![]).unwrap();
        assert!(matches!(order.validate(), Err(CoreError::InvalidOrder { .. })));

        order.add_item("Big Mac", 3, Money::from_cents(499), vec![]).unwrap();
        assert!(order.validate().is_ok());

        let mut far = delivery(25_000, false);
        far.add_item("Big Mac", 4, Money::from_cents(499), vec![]).unwrap();
        assert!(far.validate().is_err());
    }

    #[test]
    fn test_channel_validation() {
        let mut empty = takeout();
        assert!(empty.validate().is_err());
        empty.add_item("Pie", 1, Money::from_cents(149), vec![]).unwrap();
        assert!(empty.validate().is_ok());

        let mut drive = Order::new(
            "ORD000003",
            None,
            OrderKind::DriveThru {
                lane: 2,
                vehicle: "car".into(),
            },
            Rate::from_bps(800),
            noon(),
        );
        drive.add_item("Nuggets", 16, Money::from_cents(100), vec![]).unwrap();
        assert!(drive.validate().is_err());

        let mut table0 = Order::new(
            "ORD000004",
            None,
            OrderKind::DineIn {
                table: 0,
                party_size: 2,
            },
            Rate::from_bps(800),
            noon(),
        );
        table0.add_item("Pie", 1, Money::from_cents(149), vec![]).unwrap();
        assert!(table0.validate().is_err());
    }

    #[test]
    fn test_prep_estimate_and_complexity() {
        let mut order = takeout();
        order.add_item("Pie", 1, Money::from_cents(149), vec![]).unwrap();
        // max(3, 2) × 1.1 = 3.3
        assert_eq!(order.estimated_prep_minutes(), 3);

        order.add_item("Big Mac", 4, Money::from_cents(499), vec![]).unwrap();
        // 10 × 1.2 = 12
        assert_eq!(order.estimated_prep_minutes(), 12);
        assert_eq!(order.complexity(), OrderComplexity::Medium);

        order.add_item("Nuggets", 20, Money::from_cents(100), vec![]).unwrap();
        assert_eq!(order.estimated_prep_minutes(), 30);
        assert_eq!(order.complexity(), OrderComplexity::Catering);
    }

    #[test]
    fn test_line_items_and_summary() {
        let mut order = takeout();
        order.add_item("Big Mac", 1, Money::from_cents(499), vec![]).unwrap();
        let items = order.line_items();
        assert_eq!(items[0].name, "Big Mac");

        let summary = order.summary();
        assert_eq!(summary.order_type, OrderType::Takeout);
        assert_eq!(summary.total.cents(), 539);
        assert_eq!(order.to_string(), "Order ORD000001 (takeout, pending) - 1 items, $5.39");
    }
}
