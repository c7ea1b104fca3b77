//! # Restaurant
//!
//! One location: its opening state, the crew roster, registered customers
//! and the order service that runs the counter.
//!
//! ## Status Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Maintenance ◄──► Closed ──► Opening ──► Open ◄──► Busy                │
//! │                      ▲                     │         │                  │
//! │                      │                     ▼         ▼                  │
//! │                      ├──────────────── Closing ◄─────┘                  │
//! │                      │                                                  │
//! │                      └──────────── EmergencyClosed ◄── Open / Busy      │
//! │                                                                         │
//! │  open():  Closed ──► Opening ──► Open   (needs 3 staff on shift)        │
//! │  close(): Open/Busy ──► Closing ──► finish kitchen ──► end shifts       │
//! │           ──► DailyReport ──► Closed                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Orders are only accepted while the restaurant is open or busy. Payments
//! taken through the restaurant are credited to the registered customer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{info, warn};

use crate::customer::Customer;
use crate::discount::DailyStats;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::order::{Order, OrderStatus, OrderType};
use crate::payment::{Payment, PaymentReceipt};
use crate::service::{OrderService, PlacedOrder};
use crate::staff::{Employee, StaffRole};

/// Staff that must be on shift before the doors open.
pub const MIN_OPENING_STAFF: usize = 3;

/// Average prep time the kitchen is measured against.
pub const TARGET_PREP_MINUTES: f64 = 5.0;

/// Points multiplier for purchases (10 000 = one point per dollar).
const BASE_POINTS_BPS: u32 = 10_000;

// =============================================================================
// Restaurant Status
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestaurantStatus {
    #[default]
    Closed,
    Opening,
    Open,
    Busy,
    Closing,
    Maintenance,
    EmergencyClosed,
}

impl RestaurantStatus {
    pub fn can_transition_to(self, next: RestaurantStatus) -> bool {
        use RestaurantStatus::*;
        matches!(
            (self, next),
            (Closed, Opening)
                | (Closed, Maintenance)
                | (Maintenance, Closed)
                | (Opening, Open)
                | (Opening, Closed)
                | (Open, Busy)
                | (Busy, Open)
                | (Open | Busy, Closing)
                | (Open | Busy, EmergencyClosed)
                | (Closing, Closed)
                | (EmergencyClosed, Closed)
        )
    }

    /// Taking orders.
    pub fn is_open(self) -> bool {
        matches!(self, RestaurantStatus::Open | RestaurantStatus::Busy)
    }
}

impl fmt::Display for RestaurantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RestaurantStatus::Closed => "closed",
            RestaurantStatus::Opening => "opening",
            RestaurantStatus::Open => "open",
            RestaurantStatus::Busy => "busy",
            RestaurantStatus::Closing => "closing",
            RestaurantStatus::Maintenance => "maintenance",
            RestaurantStatus::EmergencyClosed => "emergency_closed",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Daily Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    pub revenue: Money,
    pub orders_completed: usize,
    pub customers_served: usize,
    pub average_order_value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffSummary {
    pub total: usize,
    pub on_duty: usize,
    pub on_duty_peak: usize,
    /// Active staff per role key (`cashier`, `kitchen`, ...).
    pub by_role: BTreeMap<String, usize>,
}

/// End-of-day figures, built from the order service statistics plus the
/// restaurant's own roster and payment tallies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub restaurant_id: String,
    pub location: String,
    pub status: RestaurantStatus,
    pub sales: SalesSummary,
    /// Completed orders per type.
    pub completed_by_type: BTreeMap<OrderType, usize>,
    pub active_orders: usize,
    pub cancelled_orders: usize,
    pub payments_by_method: BTreeMap<String, u64>,
    pub payment_transactions: u64,
    pub staff: StaffSummary,
    pub minutes_open: i64,
    /// 100.0 when completed orders average the target prep time or less.
    pub kitchen_efficiency: f64,
    pub discounts: DailyStats,
}

// =============================================================================
// Restaurant
// =============================================================================

#[derive(Debug)]
pub struct Restaurant {
    location: String,
    status: RestaurantStatus,
    opened_at: Option<NaiveDateTime>,
    service: OrderService,
    staff: BTreeMap<String, Employee>,
    on_shift: BTreeSet<String>,
    on_duty_peak: usize,
    customers: BTreeMap<String, Customer>,
    payments_by_method: BTreeMap<String, u64>,
    reports: Vec<DailyReport>,
}

impl Restaurant {
    pub fn new(location: impl Into<String>, service: OrderService) -> Self {
        Restaurant {
            location: location.into(),
            status: RestaurantStatus::Closed,
            opened_at: None,
            service,
            staff: BTreeMap::new(),
            on_shift: BTreeSet::new(),
            on_duty_peak: 0,
            customers: BTreeMap::new(),
            payments_by_method: BTreeMap::new(),
            reports: Vec::new(),
        }
    }

    pub fn restaurant_id(&self) -> &str {
        self.service.context().restaurant_id()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn status(&self) -> RestaurantStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    pub fn opened_at(&self) -> Option<NaiveDateTime> {
        self.opened_at
    }

    pub fn service(&self) -> &OrderService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut OrderService {
        &mut self.service
    }

    /// Reports produced by earlier `close` calls, oldest first.
    pub fn reports(&self) -> &[DailyReport] {
        &self.reports
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Moves to `next` if the status machine allows it.
    pub fn set_status(&mut self, next: RestaurantStatus) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidRestaurantStatus {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        info!(
            restaurant_id = %self.restaurant_id(),
            from = %self.status,
            to = %next,
            "Restaurant status changed"
        );
        self.status = next;
        Ok(())
    }

    /// Opens for business once enough staff are on shift.
    pub fn open(&mut self) -> CoreResult<()> {
        if self.status != RestaurantStatus::Closed {
            return Err(CoreError::InvalidRestaurantStatus {
                from: self.status.to_string(),
                to: RestaurantStatus::Opening.to_string(),
            });
        }
        if self.on_shift.len() < MIN_OPENING_STAFF {
            warn!(
                on_shift = self.on_shift.len(),
                required = MIN_OPENING_STAFF,
                "Opening check failed"
            );
            return Err(CoreError::NotReadyToOpen {
                reason: format!(
                    "{} staff on shift, {} required",
                    self.on_shift.len(),
                    MIN_OPENING_STAFF
                ),
            });
        }

        self.set_status(RestaurantStatus::Opening)?;
        self.opened_at = Some(self.service.context().now());
        self.on_duty_peak = self.on_shift.len();
        self.payments_by_method.clear();
        self.set_status(RestaurantStatus::Open)
    }

    /// Finishes every confirmed, in-preparation or ready order, ends all
    /// shifts and closes. Returns the day's report, which is also kept in
    /// [`reports`](Self::reports). Unpaid pending orders stay active.
    pub fn close(&mut self) -> CoreResult<DailyReport> {
        if !self.is_open() {
            return Err(CoreError::InvalidRestaurantStatus {
                from: self.status.to_string(),
                to: RestaurantStatus::Closing.to_string(),
            });
        }
        self.set_status(RestaurantStatus::Closing)?;

        self.finish_remaining_orders()?;
        let employees: Vec<String> = self.on_shift.iter().cloned().collect();
        for employee_id in employees {
            self.end_shift(&employee_id);
        }

        let report = self.generate_daily_report();
        info!(
            restaurant_id = %report.restaurant_id,
            revenue = %report.sales.revenue,
            orders = report.sales.orders_completed,
            "End of day"
        );
        self.reports.push(report.clone());
        self.set_status(RestaurantStatus::Closed)?;
        self.opened_at = None;
        Ok(report)
    }

    fn finish_remaining_orders(&mut self) -> CoreResult<()> {
        let in_kitchen: Vec<(String, OrderStatus)> = [
            OrderStatus::Confirmed,
            OrderStatus::InPreparation,
            OrderStatus::Ready,
        ]
        .into_iter()
        .flat_map(|status| self.service.orders_by_status(status))
        .map(|order| (order.id().to_string(), order.status()))
        .collect();

        for (order_id, status) in in_kitchen {
            let remaining: &[OrderStatus] = match status {
                OrderStatus::Confirmed => &[OrderStatus::InPreparation, OrderStatus::Ready, OrderStatus::Completed],
                OrderStatus::InPreparation => &[OrderStatus::Ready, OrderStatus::Completed],
                _ => &[OrderStatus::Completed],
            };
            for next in remaining {
                self.service.update_status(&order_id, *next)?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Staff
    // =========================================================================

    pub fn hire(&mut self, employee: Employee) -> CoreResult<()> {
        if self.staff.contains_key(employee.id()) {
            return Err(ValidationError::Duplicate {
                field: "employee id".to_string(),
                value: employee.id().to_string(),
            }
            .into());
        }
        info!(employee_id = %employee.id(), role = %employee.role(), "Staff hired");
        self.staff.insert(employee.id().to_string(), employee);
        Ok(())
    }

    /// Removes the employee from the roster and any current shift and hands
    /// back the deactivated record.
    pub fn terminate(&mut self, employee_id: &str, reason: &str) -> CoreResult<Employee> {
        let mut employee = self
            .staff
            .remove(employee_id)
            .ok_or_else(|| CoreError::EmployeeNotFound(employee_id.to_string()))?;
        employee.set_active(false);
        self.on_shift.remove(employee_id);
        info!(employee_id, reason, "Staff terminated");
        Ok(employee)
    }

    pub fn start_shift(&mut self, employee_id: &str) -> CoreResult<()> {
        let employee = self
            .staff
            .get(employee_id)
            .ok_or_else(|| CoreError::EmployeeNotFound(employee_id.to_string()))?;
        if !employee.is_active() {
            return Err(CoreError::EmployeeInactive(employee_id.to_string()));
        }
        if self.on_shift.insert(employee_id.to_string()) {
            info!(employee_id, "Shift started");
        }
        self.on_duty_peak = self.on_duty_peak.max(self.on_shift.len());
        Ok(())
    }

    /// `false` when the employee was not on shift.
    pub fn end_shift(&mut self, employee_id: &str) -> bool {
        let ended = self.on_shift.remove(employee_id);
        if ended {
            info!(employee_id, "Shift ended");
        }
        ended
    }

    pub fn employee(&self, employee_id: &str) -> Option<&Employee> {
        self.staff.get(employee_id)
    }

    pub fn staff(&self) -> impl Iterator<Item = &Employee> {
        self.staff.values()
    }

    /// Active staff with the same role as `role`; kitchen staff match
    /// regardless of station.
    pub fn staff_by_role(&self, role: &StaffRole) -> Vec<&Employee> {
        self.staff
            .values()
            .filter(|e| e.is_active() && e.role().key() == role.key())
            .collect()
    }

    pub fn on_duty(&self) -> Vec<&Employee> {
        self.on_shift.iter().filter_map(|id| self.staff.get(id)).collect()
    }

    // =========================================================================
    // Customers
    // =========================================================================

    pub fn register_customer(&mut self, customer: Customer) -> CoreResult<()> {
        if self.customers.contains_key(customer.id()) {
            return Err(ValidationError::Duplicate {
                field: "customer id".to_string(),
                value: customer.id().to_string(),
            }
            .into());
        }
        info!(customer_id = %customer.id(), customer_type = %customer.customer_type(), "Customer registered");
        self.customers.insert(customer.id().to_string(), customer);
        Ok(())
    }

    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customers.get(customer_id)
    }

    pub fn customer_mut(&mut self, customer_id: &str) -> Option<&mut Customer> {
        self.customers.get_mut(customer_id)
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    pub fn vip_customers(&self) -> Vec<&Customer> {
        self.customers.values().filter(|c| c.is_vip()).collect()
    }

    // =========================================================================
    // Orders & Payments
    // =========================================================================

    /// Places an order through the service, using the registered customer
    /// (if any) for discounts and priority.
    pub fn place_order(&mut self, order: Order) -> CoreResult<PlacedOrder> {
        if !self.is_open() {
            return Err(CoreError::RestaurantNotOpen {
                status: self.status.to_string(),
            });
        }
        if let Some(id) = order.customer_id() {
            if !self.customers.contains_key(id) {
                return Err(CoreError::CustomerNotFound(id.to_string()));
            }
        }
        let customer = order.customer_id().and_then(|id| self.customers.get(id));
        self.service.place_order(order, customer)
    }

    /// Takes payment and credits the registered customer with the spend and
    /// one loyalty point per dollar.
    pub fn pay(&mut self, order_id: &str, payment: &mut Payment, today: NaiveDate) -> CoreResult<PaymentReceipt> {
        let receipt = self.service.pay(order_id, payment, today)?;
        *self
            .payments_by_method
            .entry(payment.method().label().to_string())
            .or_insert(0) += 1;

        let customer_id = self
            .service
            .order(order_id)
            .and_then(|o| o.customer_id())
            .map(str::to_string);
        if let Some(customer) = customer_id.and_then(|id| self.customers.get_mut(&id)) {
            customer.record_order(order_id, receipt.amount);
            customer.earn_points(receipt.amount, BASE_POINTS_BPS);
        }
        Ok(receipt)
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    pub fn generate_daily_report(&self) -> DailyReport {
        let stats = self.service.statistics();
        let completed = self.service.completed();
        let now = self.service.context().now();

        let mut completed_by_type = BTreeMap::new();
        for summary in completed {
            *completed_by_type.entry(summary.order_type).or_insert(0) += 1;
        }

        let known: BTreeSet<&str> = completed.iter().filter_map(|s| s.customer_id.as_deref()).collect();
        let guests = completed.iter().filter(|s| s.customer_id.is_none()).count();

        let mut by_role = BTreeMap::new();
        for employee in self.staff.values().filter(|e| e.is_active()) {
            *by_role.entry(employee.role().key().to_string()).or_insert(0) += 1;
        }

        let kitchen_efficiency = if completed.is_empty() {
            0.0
        } else {
            let total: u32 = completed.iter().map(|s| s.estimated_minutes).sum();
            let average = f64::from(total) / completed.len() as f64;
            let efficiency = (TARGET_PREP_MINUTES / average.max(1.0) * 100.0).min(100.0);
            (efficiency * 10.0).round() / 10.0
        };

        DailyReport {
            date: now.date(),
            restaurant_id: self.restaurant_id().to_string(),
            location: self.location.clone(),
            status: self.status,
            sales: SalesSummary {
                revenue: stats.revenue,
                orders_completed: stats.completed_orders,
                customers_served: known.len() + guests,
                average_order_value: stats.average_order_value,
            },
            completed_by_type,
            active_orders: stats.active_orders,
            cancelled_orders: stats.cancelled_orders,
            payment_transactions: self.payments_by_method.values().sum(),
            payments_by_method: self.payments_by_method.clone(),
            staff: StaffSummary {
                total: self.staff.len(),
                on_duty: self.on_shift.len(),
                on_duty_peak: self.on_duty_peak,
                by_role,
            },
            minutes_open: self.opened_at.map_or(0, |at| (now - at).num_minutes()),
            kitchen_efficiency,
            discounts: stats.discounts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::context::RestaurantContext;
    use crate::discount::DiscountResolver;
    use crate::order::{OrderFactory, TakeoutFactory, TakeoutRequest};
    use std::sync::Arc;

    fn restaurant() -> Restaurant {
        let ctx = RestaurantContext::new("QS001").with_clock(Arc::new(FixedClock::at(2024, 3, 6, 7, 0).unwrap()));
        Restaurant::new("12 Station Square", OrderService::new(ctx, DiscountResolver::new()))
    }

    fn staffed() -> Restaurant {
        let mut restaurant = restaurant();
        let crew = [
            Employee::new("EMP1001", "Casey", StaffRole::Cashier).unwrap(),
            Employee::new("EMP1002", "Riley", StaffRole::Kitchen { station: "grill".into() }).unwrap(),
            Employee::new("EMP1003", "Jesse", StaffRole::Kitchen { station: "fryer".into() }).unwrap(),
            Employee::new("EMP1004", "Robin", StaffRole::ShiftManager).unwrap(),
        ];
        for employee in crew {
            let id = employee.id().to_string();
            restaurant.hire(employee).unwrap();
            restaurant.start_shift(&id).unwrap();
        }
        restaurant
    }

    fn takeout(restaurant: &mut Restaurant, customer_id: Option<&str>) -> Order {
        let mut order = TakeoutFactory::new()
            .create_order(
                restaurant.service_mut().context_mut(),
                TakeoutRequest {
                    customer_id: customer_id.map(str::to_string),
                    pickup_at: None,
                },
            )
            .unwrap();
        order.add_item("Big Mac", 2, Money::from_cents(499), vec![]).unwrap();
        order
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
    }

    #[test]
    fn test_status_transitions() {
        use RestaurantStatus::*;
        assert!(Closed.can_transition_to(Opening));
        assert!(Busy.can_transition_to(Open));
        assert!(Open.can_transition_to(EmergencyClosed));
        assert!(!Closed.can_transition_to(Open));
        assert!(!Maintenance.can_transition_to(Open));
        assert!(!Closing.can_transition_to(Open));

        let mut restaurant = restaurant();
        assert!(matches!(
            restaurant.set_status(Open),
            Err(CoreError::InvalidRestaurantStatus { .. })
        ));
        restaurant.set_status(Maintenance).unwrap();
        assert!(restaurant.open().is_err());
        restaurant.set_status(Closed).unwrap();
        assert_eq!(restaurant.status().to_string(), "closed");
    }

    #[test]
    fn test_open_needs_enough_staff_on_shift() {
        let mut restaurant = restaurant();
        restaurant
            .hire(Employee::new("EMP1001", "Casey", StaffRole::Cashier).unwrap())
            .unwrap();
        restaurant.start_shift("EMP1001").unwrap();
        assert!(matches!(restaurant.open(), Err(CoreError::NotReadyToOpen { .. })));
        assert_eq!(restaurant.status(), RestaurantStatus::Closed);

        let mut restaurant = staffed();
        restaurant.open().unwrap();
        assert!(restaurant.is_open());
        assert!(restaurant.opened_at().is_some());
        assert!(restaurant.open().is_err());
    }

    #[test]
    fn test_roster_and_shifts() {
        let mut restaurant = staffed();
        assert!(matches!(
            restaurant.hire(Employee::new("EMP1001", "Again", StaffRole::Cashier).unwrap()),
            Err(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));

        let kitchen = restaurant.staff_by_role(&StaffRole::Kitchen { station: "assembly".into() });
        assert_eq!(kitchen.len(), 2);
        assert_eq!(restaurant.staff_by_role(&StaffRole::GeneralManager).len(), 0);
        assert_eq!(restaurant.on_duty().len(), 4);

        let fired = restaurant.terminate("EMP1003", "No call, no show").unwrap();
        assert!(!fired.is_active());
        assert_eq!(restaurant.on_duty().len(), 3);
        assert!(restaurant.employee("EMP1003").is_none());
        assert!(matches!(
            restaurant.start_shift("EMP1003"),
            Err(CoreError::EmployeeNotFound(_))
        ));

        assert!(restaurant.end_shift("EMP1001"));
        assert!(!restaurant.end_shift("EMP1001"));
    }

    #[test]
    fn test_inactive_employee_cannot_start_shift() {
        let mut restaurant = restaurant();
        let mut on_leave = Employee::new("EMP1009", "Sky", StaffRole::Cashier).unwrap();
        on_leave.set_active(false);
        restaurant.hire(on_leave).unwrap();
        assert!(matches!(
            restaurant.start_shift("EMP1009"),
            Err(CoreError::EmployeeInactive(_))
        ));
    }

    #[test]
    fn test_customer_registry() {
        let mut restaurant = restaurant();
        let ctx = restaurant.service_mut().context_mut();
        let walk_in = Customer::walk_in(ctx, "Alex").unwrap();
        let vip = Customer::vip(ctx, "Sam", None, "VIP001", "Manager Lee").unwrap();
        let vip_id = vip.id().to_string();
        let duplicate = walk_in.clone();

        restaurant.register_customer(walk_in).unwrap();
        restaurant.register_customer(vip).unwrap();
        assert!(restaurant.register_customer(duplicate).is_err());

        assert_eq!(restaurant.customers().count(), 2);
        let vips = restaurant.vip_customers();
        assert_eq!(vips.len(), 1);
        assert_eq!(vips[0].id(), vip_id);
        assert!(restaurant.customer("CUST09999").is_none());
    }

    #[test]
    fn test_orders_only_while_open() {
        let mut restaurant = staffed();
        let order = takeout(&mut restaurant, None);
        assert!(matches!(
            restaurant.place_order(order.clone()),
            Err(CoreError::RestaurantNotOpen { .. })
        ));

        restaurant.open().unwrap();
        let stranger = takeout(&mut restaurant, Some("CUST00042"));
        assert!(matches!(
            restaurant.place_order(stranger),
            Err(CoreError::CustomerNotFound(_))
        ));
        restaurant.place_order(order).unwrap();
    }

    #[test]
    fn test_day_from_open_to_daily_report() {
        let mut restaurant = staffed();
        let member = Customer::app_signup(
            restaurant.service_mut().context_mut(),
            "Jordan",
            "5550001111",
            "jordan@example.com",
        )
        .unwrap();
        let member_id = member.id().to_string();
        restaurant.register_customer(member).unwrap();
        restaurant.open().unwrap();

        // Paid member order, paid guest order, unpaid guest order
        let order = takeout(&mut restaurant, Some(&member_id));
        let placed = restaurant.place_order(order).unwrap();
        let mut payment = Payment::exact_cash(placed.summary.total).unwrap();
        let cash = restaurant.pay(&placed.summary.order_id, &mut payment, today()).unwrap();

        let order = takeout(&mut restaurant, None);
        let guest = restaurant.place_order(order).unwrap();
        let mut card = Payment::card(guest.summary.total, "4111111111111111", 12, 2030, "123").unwrap();
        let visa = restaurant.pay(&guest.summary.order_id, &mut card, today()).unwrap();

        let order = takeout(&mut restaurant, None);
        restaurant.place_order(order).unwrap();

        // $9.98 + 8% tax = $10.78
        let member = restaurant.customer(&member_id).unwrap();
        assert_eq!(member.total_spent(), Money::from_cents(1078));
        assert_eq!(member.points(), 110);
        assert_eq!(member.order_history().len(), 1);

        restaurant
            .service_mut()
            .set_clock(Arc::new(FixedClock::at(2024, 3, 6, 22, 30).unwrap()));
        let report = restaurant.close().unwrap();

        assert_eq!(restaurant.status(), RestaurantStatus::Closed);
        assert!(restaurant.on_duty().is_empty());
        assert_eq!(restaurant.reports().len(), 1);

        assert_eq!(report.sales.orders_completed, 2);
        // Revenue is net of the 2.9% card fee
        assert_eq!(report.sales.revenue, cash.net + visa.net);
        assert_eq!(visa.net, Money::from_cents(1047));
        assert_eq!(report.sales.customers_served, 2);
        assert_eq!(report.completed_by_type.get(&OrderType::Takeout), Some(&2));
        assert_eq!(report.active_orders, 1);
        assert_eq!(report.payment_transactions, 2);
        assert_eq!(report.payments_by_method.get("card"), Some(&1));
        assert_eq!(report.staff.total, 4);
        assert_eq!(report.staff.on_duty, 0);
        assert_eq!(report.staff.on_duty_peak, 4);
        assert_eq!(report.staff.by_role.get("kitchen"), Some(&2));
        assert_eq!(report.minutes_open, 15 * 60 + 30);
        assert!(report.kitchen_efficiency > 0.0 && report.kitchen_efficiency <= 100.0);
        assert_eq!(report.status, RestaurantStatus::Closing);
    }
}
