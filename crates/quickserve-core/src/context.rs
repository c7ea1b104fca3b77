//! # Restaurant Context
//!
//! The single owner of restaurant-wide counters and id issuance.
//!
//! Factories, the tracker and the order service all take `&mut RestaurantContext`
//! instead of touching shared statics, so two restaurants (or two tests) never
//! see each other's numbering.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ RestaurantContext                                        │
//! │   next_order_id(type)    ORD000001, ORD000002, ...       │
//! │                          counted in total and per type   │
//! │   next_customer_id()     CUST00001, ...                  │
//! │   next_notification_id() NOT000001, ...                  │
//! │   record_payment(amount) count + running amount          │
//! │   tax_rate               8% unless configured            │
//! │   now()                  shared clock                    │
//! └──────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::money::Money;
use crate::order::OrderType;
use crate::types::Rate;
use crate::DEFAULT_TAX_BPS;

/// Counters snapshot, suitable for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextCounters {
    pub orders_created: u64,
    pub orders_by_type: BTreeMap<OrderType, u64>,
    pub customers_created: u64,
    pub notifications_sent: u64,
    pub payments_processed: u64,
    pub payments_amount: Money,
}

#[derive(Debug, Clone)]
pub struct RestaurantContext {
    restaurant_id: String,
    tax_rate: Rate,
    clock: Arc<dyn Clock>,
    counters: ContextCounters,
}

impl Default for RestaurantContext {
    fn default() -> Self {
        Self::new("QS001")
    }
}

impl RestaurantContext {
    pub fn new(restaurant_id: impl Into<String>) -> Self {
        RestaurantContext {
            restaurant_id: restaurant_id.into(),
            tax_rate: Rate::from_bps(DEFAULT_TAX_BPS),
            clock: Arc::new(SystemClock),
            counters: ContextCounters::default(),
        }
    }

    pub fn with_tax_rate(mut self, rate: Rate) -> Self {
        self.tax_rate = rate;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
    }

    /// The clock itself, for sharing with a discount resolver.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn restaurant_id(&self) -> &str {
        &self.restaurant_id
    }

    pub fn tax_rate(&self) -> Rate {
        self.tax_rate
    }

    pub fn set_tax_rate(&mut self, rate: Rate) {
        self.tax_rate = rate;
    }

    pub fn counters(&self) -> &ContextCounters {
        &self.counters
    }

    // =========================================================================
    // Id Issuance
    // =========================================================================

    /// Issues the next order id and counts the order under `order_type`.
    pub fn next_order_id(&mut self, order_type: OrderType) -> String {
        self.counters.orders_created += 1;
        *self.counters.orders_by_type.entry(order_type).or_insert(0) += 1;
        format!("ORD{:06}", self.counters.orders_created)
    }

    pub fn next_customer_id(&mut self) -> String {
        self.counters.customers_created += 1;
        format!("CUST{:05}", self.counters.customers_created)
    }

    pub fn next_notification_id(&mut self) -> String {
        self.counters.notifications_sent += 1;
        format!("NOT{:06}", self.counters.notifications_sent)
    }

    pub fn record_payment(&mut self, amount: Money) {
        self.counters.payments_processed += 1;
        self.counters.payments_amount += amount;
    }

    pub fn orders_of_type(&self, order_type: OrderType) -> u64 {
        self.counters
            .orders_by_type
            .get(&order_type)
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_formats() {
        let mut ctx = RestaurantContext::default();
        assert_eq!(ctx.next_order_id(OrderType::DineIn), "ORD000001");
        assert_eq!(ctx.next_order_id(OrderType::Delivery), "ORD000002");
        assert_eq!(ctx.next_customer_id(), "CUST00001");
        assert_eq!(ctx.next_notification_id(), "NOT000001");
    }

    #[test]
    fn test_counters_are_per_context() {
        let mut a = RestaurantContext::new("A");
        let mut b = RestaurantContext::new("B");
        a.next_order_id(OrderType::Takeout);
        a.next_order_id(OrderType::Takeout);
        assert_eq!(b.next_order_id(OrderType::Takeout), "ORD000001");
        assert_eq!(a.orders_of_type(OrderType::Takeout), 2);
        assert_eq!(a.orders_of_type(OrderType::DriveThru), 0);
    }

    #[test]
    fn test_payment_totals_and_tax() {
        let mut ctx = RestaurantContext::new("QS002").with_tax_rate(Rate::from_bps(825));
        ctx.record_payment(Money::from_cents(1099));
        ctx.record_payment(Money::from_cents(501));
        assert_eq!(ctx.counters().payments_processed, 2);
        assert_eq!(ctx.counters().payments_amount.cents(), 1600);
        assert_eq!(ctx.tax_rate().bps(), 825);
    }

    #[test]
    fn test_shared_clock() {
        let fixed = crate::clock::FixedClock::at(2024, 3, 6, 15, 0).unwrap();
        let ctx = RestaurantContext::default().with_clock(Arc::new(fixed));
        assert_eq!(ctx.now(), fixed.now());
        assert_eq!(ctx.clock().now(), fixed.now());
    }
}
