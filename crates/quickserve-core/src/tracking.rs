//! # Order Tracking
//!
//! Broadcasts order and payment events to whoever is watching: kitchen
//! screens, customer phones, the drive-thru board.
//!
//! ## Notification Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrderService ──► OrderTracker::notify(event)                           │
//! │                        │                                                │
//! │                        ├── auto-notify off? ──► queue (process_queue)   │
//! │                        │                                                │
//! │                        ▼  id NOT000001.., timestamp from context        │
//! │                   for each observer:                                    │
//! │                     active && is_interested_in(n) ──► update(n)         │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   history += (notification, delivered count)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Observers are owned by the tracker as trait objects; typed access for
//! inspection goes through [`OrderTracker::observer`].

use chrono::NaiveDateTime;
use serde::Serialize;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::context::RestaurantContext;
use crate::discount::Details;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::order::{Order, OrderPriority, OrderStatus, OrderType};

/// Tickets a kitchen screen can show at once.
pub const KITCHEN_DISPLAY_CAPACITY: usize = 20;

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OrderCreated,
    OrderConfirmed,
    OrderInPreparation,
    OrderReady,
    OrderCompleted,
    OrderCancelled,
    PaymentProcessed,
    PaymentFailed,
    KitchenAlert,
    DriveThruAlert,
}

impl NotificationKind {
    pub fn for_status(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => NotificationKind::OrderCreated,
            OrderStatus::Confirmed => NotificationKind::OrderConfirmed,
            OrderStatus::InPreparation => NotificationKind::OrderInPreparation,
            OrderStatus::Ready => NotificationKind::OrderReady,
            OrderStatus::Completed => NotificationKind::OrderCompleted,
            OrderStatus::Cancelled => NotificationKind::OrderCancelled,
        }
    }

    pub fn is_payment(&self) -> bool {
        matches!(self, NotificationKind::PaymentProcessed | NotificationKind::PaymentFailed)
    }

    pub fn is_alert(&self) -> bool {
        matches!(self, NotificationKind::KitchenAlert | NotificationKind::DriveThruAlert)
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationKind::OrderCreated => "order_created",
            NotificationKind::OrderConfirmed => "order_confirmed",
            NotificationKind::OrderInPreparation => "order_in_preparation",
            NotificationKind::OrderReady => "order_ready",
            NotificationKind::OrderCompleted => "order_completed",
            NotificationKind::OrderCancelled => "order_cancelled",
            NotificationKind::PaymentProcessed => "payment_processed",
            NotificationKind::PaymentFailed => "payment_failed",
            NotificationKind::KitchenAlert => "kitchen_alert",
            NotificationKind::DriveThruAlert => "drive_thru_alert",
        };
        f.write_str(s)
    }
}

/// Something that happened, before the tracker stamps it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEvent {
    pub kind: NotificationKind,
    pub order_id: String,
    pub customer_id: Option<String>,
    pub order_type: Option<OrderType>,
    pub data: Details,
}

impl OrderEvent {
    pub fn new(kind: NotificationKind, order_id: impl Into<String>) -> Self {
        OrderEvent {
            kind,
            order_id: order_id.into(),
            customer_id: None,
            order_type: None,
            data: Details::new(),
        }
    }

    pub fn customer(mut self, customer_id: Option<&str>) -> Self {
        self.customer_id = customer_id.map(str::to_string);
        self
    }

    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    pub fn with(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

/// A delivered (or deliverable) notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub order_id: String,
    pub customer_id: Option<String>,
    pub order_type: Option<OrderType>,
    pub data: Details,
    pub timestamp: NaiveDateTime,
}

impl Notification {
    fn str_data(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }
}

// =============================================================================
// Observer Trait
// =============================================================================

/// Receives notifications from an [`OrderTracker`].
pub trait OrderObserver: fmt::Debug {
    /// Unique within a tracker.
    fn id(&self) -> &str;

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    fn is_interested_in(&self, notification: &Notification) -> bool;

    fn update(&mut self, notification: &Notification);

    /// For downcasting to the concrete observer.
    fn as_any(&self) -> &dyn Any;
}

// =============================================================================
// Tracker
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub at: NaiveDateTime,
}

/// What the tracker remembers about an order it follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedOrder {
    pub order_id: String,
    pub customer_id: Option<String>,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub priority: OrderPriority,
    pub items_count: i64,
    pub tracked_since: NaiveDateTime,
    pub status_changes: Vec<StatusChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryRecord {
    pub notification: Notification,
    pub delivered: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackingSummary {
    pub active_orders: usize,
    pub total_observers: usize,
    pub active_observers: usize,
    pub notifications_sent: usize,
    pub queued_notifications: usize,
}

#[derive(Debug)]
pub struct OrderTracker {
    observers: Vec<Box<dyn OrderObserver>>,
    active_orders: BTreeMap<String, TrackedOrder>,
    queue: Vec<OrderEvent>,
    history: Vec<DeliveryRecord>,
    auto_notify: bool,
}

impl Default for OrderTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderTracker {
    pub fn new() -> Self {
        OrderTracker {
            observers: Vec::new(),
            active_orders: BTreeMap::new(),
            queue: Vec::new(),
            history: Vec::new(),
            auto_notify: true,
        }
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes an observer. Returns false (and drops it) if one with the
    /// same id is already attached.
    pub fn attach(&mut self, observer: Box<dyn OrderObserver>) -> bool {
        if self.observers.iter().any(|o| o.id() == observer.id()) {
            return false;
        }
        debug!(observer_id = observer.id(), "Observer attached");
        self.observers.push(observer);
        true
    }

    pub fn detach(&mut self, observer_id: &str) -> Option<Box<dyn OrderObserver>> {
        let idx = self.observers.iter().position(|o| o.id() == observer_id)?;
        debug!(observer_id, "Observer detached");
        Some(self.observers.remove(idx))
    }

    /// Typed view of an attached observer.
    pub fn observer<T: OrderObserver + 'static>(&self, observer_id: &str) -> Option<&T> {
        self.observers
            .iter()
            .find(|o| o.id() == observer_id)
            .and_then(|o| o.as_any().downcast_ref::<T>())
    }

    pub fn set_observer_active(&mut self, observer_id: &str, active: bool) -> bool {
        match self.observers.iter_mut().find(|o| o.id() == observer_id) {
            Some(observer) => {
                observer.set_active(active);
                true
            }
            None => false,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // =========================================================================
    // Notification
    // =========================================================================

    pub fn auto_notify(&self) -> bool {
        self.auto_notify
    }

    /// With auto-notify off, events are queued until [`process_queue`](Self::process_queue).
    pub fn set_auto_notify(&mut self, enabled: bool) {
        self.auto_notify = enabled;
    }

    /// Sends an event to every active, interested observer and returns how
    /// many received it. Queued events return 0.
    pub fn notify(&mut self, ctx: &mut RestaurantContext, event: OrderEvent) -> usize {
        if !self.auto_notify {
            debug!(kind = %event.kind, order_id = %event.order_id, "Notification queued");
            self.queue.push(event);
            return 0;
        }
        self.deliver(ctx, event)
    }

    /// Delivers everything queued, oldest first, regardless of the
    /// auto-notify switch. Returns the total delivery count.
    pub fn process_queue(&mut self, ctx: &mut RestaurantContext) -> usize {
        let queued = std::mem::take(&mut self.queue);
        queued.into_iter().map(|event| self.deliver(ctx, event)).sum()
    }

    fn deliver(&mut self, ctx: &mut RestaurantContext, event: OrderEvent) -> usize {
        let notification = Notification {
            id: ctx.next_notification_id(),
            kind: event.kind,
            order_id: event.order_id,
            customer_id: event.customer_id,
            order_type: event.order_type,
            data: event.data,
            timestamp: ctx.now(),
        };

        let mut delivered = 0;
        for observer in self.observers.iter_mut() {
            if observer.is_active() && observer.is_interested_in(&notification) {
                observer.update(&notification);
                delivered += 1;
            }
        }

        debug!(
            notification_id = %notification.id,
            kind = %notification.kind,
            delivered,
            total = self.observers.len(),
            "Notification sent"
        );
        self.history.push(DeliveryRecord {
            notification,
            delivered,
        });
        delivered
    }

    // =========================================================================
    // Order Tracking
    // =========================================================================

    /// Starts following an order and announces it.
    pub fn track_order(&mut self, ctx: &mut RestaurantContext, order: &Order, priority: OrderPriority) -> usize {
        let tracked = TrackedOrder {
            order_id: order.id().to_string(),
            customer_id: order.customer_id().map(str::to_string),
            order_type: order.order_type(),
            status: order.status(),
            priority,
            items_count: order.items_count(),
            tracked_since: ctx.now(),
            status_changes: Vec::new(),
        };
        let event = Self::event_for(&tracked, NotificationKind::OrderCreated)
            .with("total_cents", order.total().cents())
            .with("estimated_minutes", order.estimated_prep_minutes());
        self.active_orders.insert(tracked.order_id.clone(), tracked);
        self.notify(ctx, event)
    }

    /// Records a status change and notifies the matching event.
    pub fn update_order_status(
        &mut self,
        ctx: &mut RestaurantContext,
        order_id: &str,
        status: OrderStatus,
    ) -> CoreResult<usize> {
        let now = ctx.now();
        let tracked = self
            .active_orders
            .get_mut(order_id)
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;

        let from = tracked.status;
        tracked.status = status;
        tracked.status_changes.push(StatusChange { from, to: status, at: now });

        let event = Self::event_for(tracked, NotificationKind::for_status(status))
            .with("old_status", from.to_string())
            .with("new_status", status.to_string());
        Ok(self.notify(ctx, event))
    }

    /// Announces a payment outcome for a tracked or untracked order.
    pub fn notify_payment(
        &mut self,
        ctx: &mut RestaurantContext,
        order_id: &str,
        amount: Money,
        success: bool,
    ) -> usize {
        let kind = if success {
            NotificationKind::PaymentProcessed
        } else {
            NotificationKind::PaymentFailed
        };
        let event = match self.active_orders.get(order_id) {
            Some(tracked) => Self::event_for(tracked, kind),
            None => OrderEvent::new(kind, order_id),
        };
        self.notify(ctx, event.with("amount_cents", amount.cents()))
    }

    /// Stops following an order. Returns what was tracked.
    pub fn complete_tracking(&mut self, order_id: &str) -> Option<TrackedOrder> {
        let tracked = self.active_orders.remove(order_id)?;
        debug!(order_id, "Tracking completed");
        Some(tracked)
    }

    fn event_for(tracked: &TrackedOrder, kind: NotificationKind) -> OrderEvent {
        OrderEvent::new(kind, tracked.order_id.clone())
            .customer(tracked.customer_id.as_deref())
            .order_type(tracked.order_type)
            .with("items_count", tracked.items_count)
            .with("priority", priority_label(tracked.priority))
    }

    pub fn tracked(&self, order_id: &str) -> Option<&TrackedOrder> {
        self.active_orders.get(order_id)
    }

    pub fn history(&self) -> &[DeliveryRecord] {
        &self.history
    }

    pub fn summary(&self) -> TrackingSummary {
        TrackingSummary {
            active_orders: self.active_orders.len(),
            total_observers: self.observers.len(),
            active_observers: self.observers.iter().filter(|o| o.is_active()).count(),
            notifications_sent: self.history.len(),
            queued_notifications: self.queue.len(),
        }
    }
}

fn priority_label(priority: OrderPriority) -> &'static str {
    match priority {
        OrderPriority::Low => "low",
        OrderPriority::Normal => "normal",
        OrderPriority::High => "high",
        OrderPriority::Urgent => "urgent",
    }
}

// =============================================================================
// Kitchen Display
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KitchenTicket {
    pub order_id: String,
    pub items_count: i64,
    pub priority: bool,
    pub status: OrderStatus,
}

/// Shows confirmed orders until they are completed or cancelled.
/// High and urgent orders go ahead of regular ones.
#[derive(Debug, Clone)]
pub struct KitchenDisplay {
    id: String,
    station: String,
    active: bool,
    tickets: Vec<KitchenTicket>,
    alerts: Vec<String>,
}

impl KitchenDisplay {
    pub fn new(id: impl Into<String>, station: impl Into<String>) -> Self {
        KitchenDisplay {
            id: id.into(),
            station: station.into(),
            active: true,
            tickets: Vec::new(),
            alerts: Vec::new(),
        }
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    pub fn tickets(&self) -> &[KitchenTicket] {
        &self.tickets
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    fn add_ticket(&mut self, n: &Notification) {
        let priority = matches!(n.str_data("priority"), Some("high") | Some("urgent"));
        let ticket = KitchenTicket {
            order_id: n.order_id.clone(),
            items_count: n.data.get("items_count").and_then(|v| v.as_i64()).unwrap_or(0),
            priority,
            status: OrderStatus::Confirmed,
        };
        if priority {
            let pos = self.tickets.iter().take_while(|t| t.priority).count();
            self.tickets.insert(pos, ticket);
        } else {
            self.tickets.push(ticket);
        }
        self.tickets.truncate(KITCHEN_DISPLAY_CAPACITY);
    }

    fn set_status(&mut self, order_id: &str, status: OrderStatus) {
        if let Some(ticket) = self.tickets.iter_mut().find(|t| t.order_id == order_id) {
            ticket.status = status;
        }
    }
}

impl OrderObserver for KitchenDisplay {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_interested_in(&self, n: &Notification) -> bool {
        matches!(
            n.kind,
            NotificationKind::OrderConfirmed
                | NotificationKind::OrderInPreparation
                | NotificationKind::OrderReady
                | NotificationKind::OrderCompleted
                | NotificationKind::OrderCancelled
                | NotificationKind::KitchenAlert
        )
    }

    fn update(&mut self, n: &Notification) {
        match n.kind {
            NotificationKind::OrderConfirmed => self.add_ticket(n),
            NotificationKind::OrderInPreparation => self.set_status(&n.order_id, OrderStatus::InPreparation),
            NotificationKind::OrderReady => self.set_status(&n.order_id, OrderStatus::Ready),
            NotificationKind::OrderCompleted | NotificationKind::OrderCancelled => {
                self.tickets.retain(|t| t.order_id != n.order_id)
            }
            NotificationKind::KitchenAlert => {
                let message = n.str_data("message").unwrap_or("Kitchen alert").to_string();
                self.alerts.push(message);
            }
            _ => {}
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Customer App
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppMessage {
    pub notification_id: String,
    pub title: String,
    pub body: String,
    pub high_priority: bool,
    pub read: bool,
}

/// One customer's phone: order and payment updates for that customer only.
#[derive(Debug, Clone)]
pub struct CustomerApp {
    id: String,
    customer_id: String,
    active: bool,
    inbox: Vec<AppMessage>,
}

impl CustomerApp {
    pub fn new(id: impl Into<String>, customer_id: impl Into<String>) -> Self {
        CustomerApp {
            id: id.into(),
            customer_id: customer_id.into(),
            active: true,
            inbox: Vec::new(),
        }
    }

    pub fn inbox(&self) -> &[AppMessage] {
        &self.inbox
    }

    pub fn unread_count(&self) -> usize {
        self.inbox.iter().filter(|m| !m.read).count()
    }

    /// Most recent first.
    pub fn recent(&self, limit: usize) -> Vec<&AppMessage> {
        self.inbox.iter().rev().take(limit).collect()
    }

    pub fn mark_read(&mut self, notification_id: &str) -> bool {
        match self.inbox.iter_mut().find(|m| m.notification_id == notification_id) {
            Some(message) => {
                message.read = true;
                true
            }
            None => false,
        }
    }

    fn render(n: &Notification) -> (&'static str, String) {
        let id = &n.order_id;
        match n.kind {
            NotificationKind::OrderCreated => ("Order Placed", format!("Your order {} has been placed.", id)),
            NotificationKind::OrderConfirmed => ("Order Confirmed", format!("Your order {} has been confirmed.", id)),
            NotificationKind::OrderInPreparation => (
                "Order Being Prepared",
                format!("Your order {} is being prepared in our kitchen.", id),
            ),
            NotificationKind::OrderReady => ("Order Ready!", format!("Your order {} is ready for pickup!", id)),
            NotificationKind::OrderCompleted => (
                "Order Complete",
                format!("Your order {} has been completed. Thank you!", id),
            ),
            NotificationKind::OrderCancelled => ("Order Cancelled", format!("Your order {} has been cancelled.", id)),
            NotificationKind::PaymentProcessed => (
                "Payment Successful",
                format!("Payment for order {} was successful.", id),
            ),
            NotificationKind::PaymentFailed => (
                "Payment Failed",
                format!("Payment for order {} failed. Please try again.", id),
            ),
            NotificationKind::KitchenAlert | NotificationKind::DriveThruAlert => ("Update", format!("Order {}", id)),
        }
    }
}

impl OrderObserver for CustomerApp {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_interested_in(&self, n: &Notification) -> bool {
        n.customer_id.as_deref() == Some(self.customer_id.as_str()) && !n.kind.is_alert()
    }

    fn update(&mut self, n: &Notification) {
        let (title, body) = Self::render(n);
        self.inbox.push(AppMessage {
            notification_id: n.id.clone(),
            title: title.to_string(),
            body,
            high_priority: matches!(
                n.kind,
                NotificationKind::OrderReady | NotificationKind::OrderCancelled | NotificationKind::PaymentFailed
            ),
            read: false,
        });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Drive-Thru Board
// =============================================================================

/// Outdoor board: drive-thru cars waiting and orders ready at the window.
#[derive(Debug, Clone)]
pub struct DriveThruBoard {
    id: String,
    active: bool,
    waiting: Vec<String>,
    ready: Vec<String>,
    alerts: Vec<String>,
}

impl DriveThruBoard {
    pub fn new(id: impl Into<String>) -> Self {
        DriveThruBoard {
            id: id.into(),
            active: true,
            waiting: Vec::new(),
            ready: Vec::new(),
            alerts: Vec::new(),
        }
    }

    pub fn waiting(&self) -> &[String] {
        &self.waiting
    }

    pub fn ready(&self) -> &[String] {
        &self.ready
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }
}

impl OrderObserver for DriveThruBoard {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_interested_in(&self, n: &Notification) -> bool {
        if n.kind == NotificationKind::DriveThruAlert {
            return true;
        }
        n.order_type == Some(OrderType::DriveThru)
            && matches!(
                n.kind,
                NotificationKind::OrderCreated
                    | NotificationKind::OrderReady
                    | NotificationKind::OrderCompleted
                    | NotificationKind::OrderCancelled
            )
    }

    fn update(&mut self, n: &Notification) {
        match n.kind {
            NotificationKind::OrderCreated => self.waiting.push(n.order_id.clone()),
            NotificationKind::OrderReady => {
                self.waiting.retain(|id| *id != n.order_id);
                self.ready.push(n.order_id.clone());
            }
            NotificationKind::OrderCompleted | NotificationKind::OrderCancelled => {
                self.waiting.retain(|id| *id != n.order_id);
                self.ready.retain(|id| *id != n.order_id);
            }
            NotificationKind::DriveThruAlert => {
                let message = n.str_data("message").unwrap_or("Drive-thru alert").to_string();
                self.alerts.push(message);
            }
            _ => {}
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::order::OrderKind;
    use crate::types::Rate;
    use std::sync::Arc;

    fn ctx() -> RestaurantContext {
        RestaurantContext::default().with_clock(Arc::new(FixedClock::at(2024, 3, 6, 12, 0).unwrap()))
    }

    fn order(ctx: &mut RestaurantContext, kind: OrderKind, customer: Option<&str>) -> Order {
        let id = ctx.next_order_id(kind.order_type());
        let mut order = Order::new(id, customer.map(str::to_string), kind, Rate::from_bps(800), ctx.now());
        order.add_item("Big Mac", 2, Money::from_cents(499), vec![]).unwrap();
        order
    }

    fn drive_thru() -> OrderKind {
        OrderKind::DriveThru {
            lane: 2,
            vehicle: "car".into(),
        }
    }

    fn tracker_with_observers() -> OrderTracker {
        let mut tracker = OrderTracker::new();
        assert!(tracker.attach(Box::new(KitchenDisplay::new("kds-1", "grill"))));
        assert!(tracker.attach(Box::new(CustomerApp::new("app-1", "CUST00001"))));
        assert!(tracker.attach(Box::new(DriveThruBoard::new("board-1"))));
        tracker
    }

    #[test]
    fn test_attach_dedupes_and_detach() {
        let mut tracker = tracker_with_observers();
        assert!(!tracker.attach(Box::new(KitchenDisplay::new("kds-1", "fryer"))));
        assert_eq!(tracker.observer_count(), 3);

        assert!(tracker.detach("board-1").is_some());
        assert!(tracker.detach("board-1").is_none());
        assert_eq!(tracker.summary().total_observers, 2);
    }

    #[test]
    fn test_notification_routing() {
        let mut ctx = ctx();
        let mut tracker = tracker_with_observers();
        let order = order(&mut ctx, drive_thru(), Some("CUST00001"));

        // Created: customer app + drive-thru board, kitchen not interested.
        assert_eq!(tracker.track_order(&mut ctx, &order, OrderPriority::Normal), 2);

        // Confirmed: kitchen + app.
        assert_eq!(
            tracker
                .update_order_status(&mut ctx, order.id(), OrderStatus::Confirmed)
                .unwrap(),
            2
        );
        // Ready: all three.
        tracker
            .update_order_status(&mut ctx, order.id(), OrderStatus::InPreparation)
            .unwrap();
        assert_eq!(
            tracker.update_order_status(&mut ctx, order.id(), OrderStatus::Ready).unwrap(),
            3
        );

        let board = tracker.observer::<DriveThruBoard>("board-1").unwrap();
        assert_eq!(board.ready(), [order.id().to_string()]);
        assert!(board.waiting().is_empty());

        let kitchen = tracker.observer::<KitchenDisplay>("kds-1").unwrap();
        assert_eq!(kitchen.tickets()[0].status, OrderStatus::Ready);
        assert_eq!(kitchen.tickets()[0].items_count, 2);

        let app = tracker.observer::<CustomerApp>("app-1").unwrap();
        assert_eq!(app.inbox().len(), 4);
        assert_eq!(app.unread_count(), 4);
        assert_eq!(app.recent(1)[0].title, "Order Ready!");

        tracker
            .update_order_status(&mut ctx, order.id(), OrderStatus::Completed)
            .unwrap();
        assert!(tracker
            .observer::<KitchenDisplay>("kds-1")
            .unwrap()
            .tickets()
            .is_empty());

        assert_eq!(tracker.history().len(), 5);
        assert_eq!(tracker.history()[0].notification.id, "NOT000001");
        let status_changes = &tracker.tracked(order.id()).unwrap().status_changes;
        assert_eq!(status_changes.len(), 4);
        assert!(tracker.complete_tracking(order.id()).is_some());
        assert!(tracker.complete_tracking(order.id()).is_none());
    }

    #[test]
    fn test_customer_app_ignores_other_customers() {
        let mut ctx = ctx();
        let mut tracker = tracker_with_observers();
        let other = order(
            &mut ctx,
            OrderKind::Takeout { pickup_at: None },
            Some("CUST00002"),
        );
        assert_eq!(tracker.track_order(&mut ctx, &other, OrderPriority::Normal), 0);
        assert_eq!(tracker.notify_payment(&mut ctx, other.id(), Money::from_cents(1078), true), 0);
        assert!(tracker.observer::<CustomerApp>("app-1").unwrap().inbox().is_empty());
    }

    #[test]
    fn test_inactive_observer_skipped() {
        let mut ctx = ctx();
        let mut tracker = tracker_with_observers();
        assert!(tracker.set_observer_active("app-1", false));
        assert!(!tracker.set_observer_active("nobody", false));

        let order = order(&mut ctx, drive_thru(), Some("CUST00001"));
        assert_eq!(tracker.track_order(&mut ctx, &order, OrderPriority::Normal), 1);
        assert_eq!(tracker.summary().active_observers, 2);
    }

    #[test]
    fn test_queue_when_auto_notify_off() {
        let mut ctx = ctx();
        let mut tracker = tracker_with_observers();
        tracker.set_auto_notify(false);

        let order = order(&mut ctx, drive_thru(), Some("CUST00001"));
        assert_eq!(tracker.track_order(&mut ctx, &order, OrderPriority::Normal), 0);
        assert_eq!(tracker.summary().queued_notifications, 1);
        assert!(tracker.history().is_empty());

        assert_eq!(tracker.process_queue(&mut ctx), 2);
        assert_eq!(tracker.summary().queued_notifications, 0);
        assert_eq!(tracker.summary().notifications_sent, 1);
    }

    #[test]
    fn test_kitchen_priority_and_alerts() {
        let mut ctx = ctx();
        let mut tracker = tracker_with_observers();
        let normal = order(&mut ctx, OrderKind::Takeout { pickup_at: None }, None);
        let urgent = order(&mut ctx, OrderKind::Takeout { pickup_at: None }, None);

        tracker.track_order(&mut ctx, &normal, OrderPriority::Normal);
        tracker.track_order(&mut ctx, &urgent, OrderPriority::Urgent);
        tracker
            .update_order_status(&mut ctx, normal.id(), OrderStatus::Confirmed)
            .unwrap();
        tracker
            .update_order_status(&mut ctx, urgent.id(), OrderStatus::Confirmed)
            .unwrap();

        let kitchen = tracker.observer::<KitchenDisplay>("kds-1").unwrap();
        assert_eq!(kitchen.tickets()[0].order_id, urgent.id());
        assert!(kitchen.tickets()[0].priority);

        let alert = OrderEvent::new(NotificationKind::KitchenAlert, "").with("message", "Fryer down");
        assert_eq!(tracker.notify(&mut ctx, alert), 1);
        let kitchen = tracker.observer::<KitchenDisplay>("kds-1").unwrap();
        assert_eq!(kitchen.alerts(), ["Fryer down".to_string()]);

        assert!(matches!(
            tracker.update_order_status(&mut ctx, "ORD999999", OrderStatus::Ready),
            Err(CoreError::OrderNotFound(_))
        ));
    }

    #[test]
    fn test_mark_read() {
        let mut app = CustomerApp::new("app-1", "CUST00001");
        let n = Notification {
            id: "NOT000001".into(),
            kind: NotificationKind::PaymentFailed,
            order_id: "ORD000001".into(),
            customer_id: Some("CUST00001".into()),
            order_type: None,
            data: Details::new(),
            timestamp: chrono::NaiveDate::from_ymd_opt(2024, 3, 6)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        };
        assert!(app.is_interested_in(&n));
        app.update(&n);
        assert!(app.inbox()[0].high_priority);
        assert!(app.mark_read("NOT000001"));
        assert!(!app.mark_read("NOT000002"));
        assert_eq!(app.unread_count(), 0);
    }
}
