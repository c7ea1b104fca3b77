//! # Order Service
//!
//! The front counter in one object. It owns the restaurant context, the
//! discount resolver and the order tracker, and moves orders from placement
//! through payment, the kitchen queue and completion.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  place_order ──► validate ──► resolve discount ──► priority ──► queue   │
//! │                                                          │              │
//! │                                                   track (OrderCreated)  │
//! │                                                                         │
//! │  pay ──► amount == total? ──► Payment::process ──► Confirmed            │
//! │                                                                         │
//! │  next_for_preparation ──► first Confirmed in queue ──► InPreparation    │
//! │                                                                         │
//! │  update_status(Ready) ──► update_status(Completed) ──► completed list   │
//! │                                                                         │
//! │  cancel / cancel_expired ──► Cancelled (removed from queue)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Queue Ordering
//! Higher priority goes first; orders with equal priority keep arrival order.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::context::RestaurantContext;
use crate::customer::{Customer, CustomerType};
use crate::discount::{DailyStats, DiscountOutcome, DiscountResolver, ResolutionMode};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::order::{Order, OrderPriority, OrderStatus, OrderSummary, OrderType};
use crate::payment::{Payment, PaymentReceipt};
use crate::tracking::{OrderTracker, TrackingSummary};

pub const DEFAULT_MAX_ACTIVE_ORDERS: usize = 50;

/// Orders with more units than this are bumped to high priority.
pub const LARGE_ORDER_ITEMS: i64 = 10;

// =============================================================================
// Service Types
// =============================================================================

#[derive(Debug, Clone)]
struct ActiveOrder {
    order: Order,
    priority: OrderPriority,
    paid: bool,
}

/// What `place_order` hands back to the counter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedOrder {
    pub summary: OrderSummary,
    pub discount: DiscountOutcome,
    pub priority: OrderPriority,
    /// 1-based position in the kitchen queue.
    pub queue_position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatistics {
    pub restaurant_id: String,
    pub active_orders: usize,
    pub active_by_status: BTreeMap<String, usize>,
    pub active_by_type: BTreeMap<OrderType, usize>,
    pub queued_orders: usize,
    pub completed_orders: usize,
    pub cancelled_orders: usize,
    pub revenue: Money,
    pub average_order_value: Money,
    pub discounts: DailyStats,
    pub tracking: TrackingSummary,
}

// =============================================================================
// Order Service
// =============================================================================

#[derive(Debug)]
pub struct OrderService {
    ctx: RestaurantContext,
    resolver: DiscountResolver,
    tracker: OrderTracker,
    mode: ResolutionMode,
    active: BTreeMap<String, ActiveOrder>,
    queue: Vec<String>,
    completed: Vec<OrderSummary>,
    cancelled: usize,
    revenue: Money,
    max_active: usize,
}

impl OrderService {
    /// Builds a service around a context and a configured resolver.
    ///
    /// The resolver is switched to the context's clock so discounts and
    /// order timestamps agree on the time.
    pub fn new(ctx: RestaurantContext, mut resolver: DiscountResolver) -> Self {
        resolver.set_clock(Box::new(ctx.clock()));
        OrderService {
            ctx,
            resolver,
            tracker: OrderTracker::new(),
            mode: ResolutionMode::Best,
            active: BTreeMap::new(),
            queue: Vec::new(),
            completed: Vec::new(),
            cancelled: 0,
            revenue: Money::zero(),
            max_active: DEFAULT_MAX_ACTIVE_ORDERS,
        }
    }

    pub fn with_resolution_mode(mut self, mode: ResolutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_active_orders(mut self, max: usize) -> Self {
        self.max_active = max;
        self
    }

    pub fn resolution_mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Replaces the time source for both the context and the resolver.
    pub fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.resolver.set_clock(Box::new(Arc::clone(&clock)));
        self.ctx.set_clock(clock);
    }

    pub fn context(&self) -> &RestaurantContext {
        &self.ctx
    }

    /// Factories and customer constructors need the context mutably.
    pub fn context_mut(&mut self) -> &mut RestaurantContext {
        &mut self.ctx
    }

    pub fn resolver(&self) -> &DiscountResolver {
        &self.resolver
    }

    pub fn tracker(&self) -> &OrderTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut OrderTracker {
        &mut self.tracker
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// Accepts a pending order: validates it, grants the discount, queues it
    /// for the kitchen and starts tracking it.
    pub fn place_order(&mut self, mut order: Order, customer: Option<&Customer>) -> CoreResult<PlacedOrder> {
        if self.active.len() >= self.max_active {
            return Err(CoreError::TooManyActiveOrders { max: self.max_active });
        }
        if self.active.contains_key(order.id()) {
            return Err(ValidationError::Duplicate {
                field: "order_id".to_string(),
                value: order.id().to_string(),
            }
            .into());
        }
        if order.status() != OrderStatus::Pending {
            return Err(CoreError::OrderLocked {
                order_id: order.id().to_string(),
                status: order.status().to_string(),
            });
        }
        order.validate()?;

        let attributes = customer.map(Customer::attributes);
        let outcome = self
            .resolver
            .resolve(self.mode, order.subtotal(), &order.line_items(), attributes.as_ref());
        order.apply_discount(&outcome)?;

        let priority = Self::priority_for(&order, customer);
        let position = self.enqueue(order.id(), priority);
        self.tracker.track_order(&mut self.ctx, &order, priority);

        info!(
            order_id = %order.id(),
            priority = ?priority,
            discount = %order.discount(),
            total = %order.total(),
            queue_position = position,
            "Order placed"
        );

        let placed = PlacedOrder {
            summary: order.summary(),
            discount: outcome,
            priority,
            queue_position: position,
        };
        self.active.insert(
            order.id().to_string(),
            ActiveOrder {
                order,
                priority,
                paid: false,
            },
        );
        Ok(placed)
    }

    /// VIPs are urgent; loyalty members, deliveries and large orders are high.
    pub fn priority_for(order: &Order, customer: Option<&Customer>) -> OrderPriority {
        match customer.map(Customer::customer_type) {
            Some(CustomerType::Vip) => OrderPriority::Urgent,
            Some(CustomerType::Loyalty) => OrderPriority::High,
            _ if order.order_type() == OrderType::Delivery => OrderPriority::High,
            _ if order.items_count() > LARGE_ORDER_ITEMS => OrderPriority::High,
            _ => OrderPriority::Normal,
        }
    }

    /// Inserts behind every order of equal or higher priority. Returns the
    /// 1-based position.
    fn enqueue(&mut self, order_id: &str, priority: OrderPriority) -> usize {
        let position = self
            .queue
            .iter()
            .position(|id| self.active.get(id).is_some_and(|a| a.priority < priority))
            .unwrap_or(self.queue.len());
        self.queue.insert(position, order_id.to_string());
        position + 1
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Moves an active order to `status` and notifies observers. Completed
    /// and cancelled orders leave the active set.
    pub fn update_status(&mut self, order_id: &str, status: OrderStatus) -> CoreResult<()> {
        let now = self.ctx.now();
        let active = self
            .active
            .get_mut(order_id)
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;
        active.order.transition(status, now)?;
        self.tracker.update_order_status(&mut self.ctx, order_id, status)?;

        if !status.is_editable() {
            self.queue.retain(|id| id != order_id);
        }

        match status {
            OrderStatus::Completed => {
                if let Some(done) = self.active.remove(order_id) {
                    self.completed.push(done.order.summary());
                }
                self.tracker.complete_tracking(order_id);
                info!(order_id, "Order completed");
            }
            OrderStatus::Cancelled => {
                if let Some(cancelled) = self.active.remove(order_id) {
                    if cancelled.paid {
                        warn!(order_id, total = %cancelled.order.total(), "Cancelled order was paid; refund required");
                    }
                }
                self.cancelled += 1;
                self.tracker.complete_tracking(order_id);
            }
            _ => {}
        }
        Ok(())
    }

    /// Starts the first queued order that has been confirmed. Pending
    /// orders ahead of it keep their place.
    pub fn next_for_preparation(&mut self) -> CoreResult<Option<OrderSummary>> {
        let next = self
            .queue
            .iter()
            .find(|id| {
                self.active
                    .get(*id)
                    .is_some_and(|a| a.order.status() == OrderStatus::Confirmed)
            })
            .cloned();

        let Some(order_id) = next else {
            return Ok(None);
        };
        self.update_status(&order_id, OrderStatus::InPreparation)?;
        Ok(self.active.get(&order_id).map(|a| a.order.summary()))
    }

    pub fn cancel(&mut self, order_id: &str, reason: &str) -> CoreResult<()> {
        info!(order_id, reason, "Cancelling order");
        self.update_status(order_id, OrderStatus::Cancelled)
    }

    /// Cancels every active order older than `timeout_minutes` that can
    /// still be cancelled. Returns the cancelled ids.
    pub fn cancel_expired(&mut self, timeout_minutes: i64) -> CoreResult<Vec<String>> {
        let cutoff = self.ctx.now() - Duration::minutes(timeout_minutes);
        let expired: Vec<String> = self
            .active
            .values()
            .filter(|a| a.order.created_at() < cutoff && a.order.status().can_transition_to(OrderStatus::Cancelled))
            .map(|a| a.order.id().to_string())
            .collect();

        for order_id in &expired {
            self.cancel(order_id, "Order timeout")?;
        }
        Ok(expired)
    }

    // =========================================================================
    // Payment
    // =========================================================================

    /// Charges a pending payment for the full order total. A successful
    /// payment confirms a pending order. Loyalty points and customer spend
    /// are recorded by the caller.
    pub fn pay(&mut self, order_id: &str, payment: &mut Payment, today: NaiveDate) -> CoreResult<PaymentReceipt> {
        let active = self
            .active
            .get(order_id)
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;
        if active.paid {
            return Err(CoreError::OrderAlreadyPaid {
                order_id: order_id.to_string(),
            });
        }
        let total = active.order.total();
        if payment.amount() != total {
            return Err(CoreError::InvalidPaymentAmount {
                reason: format!("payment of {} does not match order total {}", payment.amount(), total),
            });
        }
        let status = active.order.status();

        match payment.process(today) {
            Ok(receipt) => {
                self.ctx.record_payment(receipt.amount);
                self.revenue += receipt.net;
                if let Some(active) = self.active.get_mut(order_id) {
                    active.paid = true;
                }
                self.tracker.notify_payment(&mut self.ctx, order_id, receipt.amount, true);
                info!(order_id, method = %receipt.method, amount = %receipt.amount, "Payment processed");

                if status == OrderStatus::Pending {
                    self.update_status(order_id, OrderStatus::Confirmed)?;
                }
                Ok(receipt)
            }
            Err(err) => {
                self.tracker.notify_payment(&mut self.ctx, order_id, payment.amount(), false);
                warn!(order_id, error = %err, "Payment failed");
                Err(err)
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn order(&self, order_id: &str) -> Option<&Order> {
        self.active.get(order_id).map(|a| &a.order)
    }

    pub fn orders_by_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.active
            .values()
            .map(|a| &a.order)
            .filter(|o| o.status() == status)
            .collect()
    }

    pub fn orders_by_type(&self, order_type: OrderType) -> Vec<&Order> {
        self.active
            .values()
            .map(|a| &a.order)
            .filter(|o| o.order_type() == order_type)
            .collect()
    }

    /// Kitchen queue, front first.
    pub fn queue(&self) -> Vec<&str> {
        self.queue.iter().map(String::as_str).collect()
    }

    pub fn completed(&self) -> &[OrderSummary] {
        &self.completed
    }

    pub fn statistics(&self) -> ServiceStatistics {
        let mut active_by_status = BTreeMap::new();
        let mut active_by_type = BTreeMap::new();
        for active in self.active.values() {
            *active_by_status.entry(active.order.status().to_string()).or_insert(0) += 1;
            *active_by_type.entry(active.order.order_type()).or_insert(0) += 1;
        }

        let completed_value: Money = self.completed.iter().map(|s| s.total).sum();
        let average_order_value = if self.completed.is_empty() {
            Money::zero()
        } else {
            Money::from_cents(completed_value.cents() / self.completed.len() as i64)
        };

        ServiceStatistics {
            restaurant_id: self.ctx.restaurant_id().to_string(),
            active_orders: self.active.len(),
            active_by_status,
            active_by_type,
            queued_orders: self.queue.len(),
            completed_orders: self.completed.len(),
            cancelled_orders: self.cancelled,
            revenue: self.revenue,
            average_order_value,
            discounts: self.resolver.daily_stats(),
            tracking: self.tracker.summary(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
