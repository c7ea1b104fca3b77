//! # Demo Scenarios
//!
//! A scripted lunch service. Everything runs against the configured rule
//! set and clock; nothing touches the disk.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Discount showcase   two baskets, best vs stacked                    │
//! │  2. Restaurant day      crew on shift ──► open ──► customers registered │
//! │                         factories ──► place ──► pay ──► kitchen queue   │
//! │  3. Back office         payroll, manager-approved refund, close of day  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Datelike;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use quickserve_core::clock::{Clock, FixedClock, SystemClock};
use quickserve_core::context::RestaurantContext;
use quickserve_core::customer::Customer;
use quickserve_core::discount::{DiscountOutcome, DiscountResolver, ResolutionMode};
use quickserve_core::menu::{ItemSize, Menu};
use quickserve_core::order::{
    DeliveryFactory, DeliveryRequest, DineInFactory, DineInRequest, DriveThruFactory, DriveThruRequest, Order,
    OrderFactory, OrderPriority, OrderStatus, OrderType, TakeoutFactory, TakeoutRequest,
};
use quickserve_core::payment::{Payment, Refund};
use quickserve_core::restaurant::{DailyReport, Restaurant};
use quickserve_core::service::{OrderService, PlacedOrder, ServiceStatistics};
use quickserve_core::staff::{Employee, StaffRole, WeeklyPay};
use quickserve_core::tracking::{CustomerApp, DriveThruBoard, KitchenDisplay};
use quickserve_core::{CoreError, CustomerAttributes, LineItem, Money};

use crate::config::AppConfig;
use crate::error::DemoResult;

// =============================================================================
// Report Types
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DiscountCheck {
    pub label: String,
    pub subtotal: Money,
    pub best: DiscountOutcome,
    pub stacked: DiscountOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderLog {
    pub order_id: String,
    pub order_type: OrderType,
    pub customer: String,
    pub priority: OrderPriority,
    pub discount_rule: String,
    pub discount: Money,
    pub total: Money,
    pub payment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayrollLine {
    pub employee: String,
    pub role: String,
    pub hours: u32,
    pub pay: WeeklyPay,
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub restaurant: String,
    pub mode: ResolutionMode,
    pub discount_checks: Vec<DiscountCheck>,
    pub orders: Vec<OrderLog>,
    pub cancelled: Vec<String>,
    pub customer_app_unread: usize,
    pub jordan_points: u64,
    pub payroll: Vec<PayrollLine>,
    pub refund: Refund,
    pub statistics: ServiceStatistics,
    pub daily: DailyReport,
}

// =============================================================================
// Setup
// =============================================================================

/// The configured fixed time, or the system clock.
pub fn demo_clock(config: &AppConfig) -> DemoResult<Arc<dyn Clock>> {
    let clock: Arc<dyn Clock> = match config.demo_time()? {
        Some(at) => Arc::new(FixedClock::new(at)) as Arc<dyn Clock>,
        None => Arc::new(SystemClock) as Arc<dyn Clock>,
    };
    Ok(clock)
}

pub fn build_resolver(config: &AppConfig, clock: Arc<dyn Clock>) -> DemoResult<DiscountResolver> {
    let mut resolver = DiscountResolver::with_clock(Box::new(clock));
    for rule in config.build_rules()? {
        resolver.register_boxed(rule);
    }
    Ok(resolver)
}

pub fn build_service(config: &AppConfig) -> DemoResult<OrderService> {
    let clock = demo_clock(config)?;
    let ctx = RestaurantContext::new(config.restaurant.id.as_str())
        .with_tax_rate(config.tax_rate())
        .with_clock(Arc::clone(&clock));
    let resolver = build_resolver(config, clock)?;

    let mut service = OrderService::new(ctx, resolver)
        .with_resolution_mode(config.discounts.mode())
        .with_max_active_orders(config.restaurant.max_active_orders);
    service
        .tracker_mut()
        .attach(Box::new(KitchenDisplay::new("kds-grill", "grill")));
    service
        .tracker_mut()
        .attach(Box::new(DriveThruBoard::new("drive-thru-board")));
    Ok(service)
}

// =============================================================================
// 1. Discount Showcase
// =============================================================================

pub fn discount_showcase(config: &AppConfig) -> DemoResult<Vec<DiscountCheck>> {
    let mut resolver = build_resolver(config, demo_clock(config)?)?;

    let baskets = [
        (
            "Student lunch",
            vec![
                LineItem::new("Big Mac", 1, Money::from_cents(499)),
                LineItem::new("French Fries (Medium)", 1, Money::from_cents(249)),
                LineItem::new("Coca-Cola", 1, Money::from_cents(179)),
            ],
            CustomerAttributes::new()
                .with("customer_type", "student")
                .with("loyalty_tier", "bronze"),
        ),
        (
            "Gold member fries",
            vec![
                LineItem::new("French Fries (Large)", 2, Money::from_cents(299)),
                LineItem::new("McChicken", 1, Money::from_cents(399)),
            ],
            CustomerAttributes::new()
                .with("customer_type", "loyalty")
                .with("loyalty_tier", "gold"),
        ),
    ];

    let checks = baskets
        .into_iter()
        .map(|(label, items, attrs)| {
            let subtotal = quickserve_core::items_total(&items);
            DiscountCheck {
                label: label.to_string(),
                subtotal,
                best: resolver.resolve_best(subtotal, &items, Some(&attrs)),
                stacked: resolver.resolve_stacked(subtotal, &items, Some(&attrs)),
            }
        })
        .collect();
    Ok(checks)
}

// =============================================================================
// 2. Restaurant Day
// =============================================================================

fn add_items(order: &mut Order, menu: &Menu, service: &OrderService, items: &[(&str, i64)]) -> DemoResult<()> {
    let at = service.context().now().time();
    for (name, quantity) in items {
        let line = menu.line_item(name, ItemSize::Medium, *quantity, at)?;
        order.add_line_item(&line)?;
    }
    Ok(())
}

fn log_order(placed: &PlacedOrder, customer: &str, payment: String) -> OrderLog {
    let summary = &placed.summary;
    info!(order_id = %summary.order_id, total = %summary.total, "Order paid");
    OrderLog {
        order_id: summary.order_id.clone(),
        order_type: summary.order_type,
        customer: customer.to_string(),
        priority: placed.priority,
        discount_rule: placed.discount.rule_name.clone(),
        discount: summary.discount,
        total: summary.total,
        payment,
    }
}

pub fn run_day(config: &AppConfig) -> DemoResult<DemoReport> {
    let menu = Menu::classic()?;
    let mut restaurant = Restaurant::new(config.restaurant.name.as_str(), build_service(config)?);
    let today = restaurant.service().context().now().date();

    // Crew clocks in and the doors open
    for employee in crew()? {
        let id = employee.id().to_string();
        restaurant.hire(employee)?;
        restaurant.start_shift(&id)?;
    }
    restaurant.open()?;

    // Customers
    let ctx = restaurant.service_mut().context_mut();
    let alex = Customer::walk_in(ctx, "Alex")?;
    let jordan = Customer::app_signup(ctx, "Jordan", "5550001111", "jordan@example.com")?;
    let sam = Customer::vip(ctx, "Sam", Some("5550002222"), "VIP001", "Manager Lee")?;
    let (alex_id, jordan_id, sam_id) = (alex.id().to_string(), jordan.id().to_string(), sam.id().to_string());
    restaurant
        .service_mut()
        .tracker_mut()
        .attach(Box::new(CustomerApp::new("app-jordan", jordan.id())));
    for customer in [alex, jordan, sam] {
        restaurant.register_customer(customer)?;
    }

    let mut dine_in = DineInFactory::new();
    let mut drive_thru = DriveThruFactory::default();
    let mut takeout = TakeoutFactory::new();
    let mut delivery = DeliveryFactory::new();
    let mut orders = Vec::new();

    // Dine-in, cash
    let mut order = dine_in.create_order(
        restaurant.service_mut().context_mut(),
        DineInRequest {
            customer_id: Some(alex_id.clone()),
            party_size: 2,
            table: None,
        },
    )?;
    add_items(
        &mut order,
        &menu,
        restaurant.service(),
        &[("Big Mac", 2), ("French Fries (Medium)", 2), ("Coca-Cola", 2)],
    )?;
    let placed = restaurant.place_order(order)?;
    let mut payment = Payment::cash(placed.summary.total, Money::from_cents(5_000))?;
    let receipt = restaurant.pay(&placed.summary.order_id, &mut payment, today)?;
    orders.push(log_order(&placed, "Alex", receipt.method));

    // Drive-thru express, mobile
    let mut order = drive_thru.create_order(
        restaurant.service_mut().context_mut(),
        DriveThruRequest {
            customer_id: Some(jordan_id.clone()),
            vehicle: "blue hatchback".into(),
            express: true,
        },
    )?;
    add_items(
        &mut order,
        &menu,
        restaurant.service(),
        &[("McChicken", 1), ("French Fries (Large)", 2)],
    )?;
    let placed = restaurant.place_order(order)?;
    let mut payment = Payment::mobile(placed.summary.total, "Apple_Pay", "iphone-15-a1b2c3")?;
    let receipt = restaurant.pay(&placed.summary.order_id, &mut payment, today)?;
    let drive_thru_order = placed.summary.order_id.clone();
    orders.push(log_order(&placed, "Jordan", receipt.method));

    // Delivery for the VIP, card
    let mut order = delivery.create_order(
        restaurant.service_mut().context_mut(),
        DeliveryRequest {
            customer_id: Some(sam_id.clone()),
            address: "42 Harbour Road".into(),
            distance_m: 3_500,
            express: false,
        },
    )?;
    add_items(
        &mut order,
        &menu,
        restaurant.service(),
        &[("Quarter Pounder", 2), ("Chicken Nuggets (10 pc)", 1), ("Apple Pie", 2)],
    )?;
    let placed = restaurant.place_order(order)?;
    let mut payment = Payment::card(placed.summary.total, "4111 1111 1111 1111", 12, today.year() + 2, "123")?;
    let receipt = restaurant.pay(&placed.summary.order_id, &mut payment, today)?;
    orders.push(log_order(&placed, "Sam", receipt.method));

    // Takeout, gift card
    let mut order = takeout.create_order(restaurant.service_mut().context_mut(), TakeoutRequest::default())?;
    add_items(&mut order, &menu, restaurant.service(), &[("Big Mac", 1), ("Cafe Latte", 1)])?;
    let placed = restaurant.place_order(order)?;
    let mut gift_payment = Payment::gift_card(placed.summary.total, "6006491234567890", Money::from_cents(10_000))?;
    let receipt = restaurant.pay(&placed.summary.order_id, &mut gift_payment, today)?;
    orders.push(log_order(&placed, "guest", receipt.method));

    // A takeout that is abandoned before payment
    let mut order = takeout.create_order(restaurant.service_mut().context_mut(), TakeoutRequest::default())?;
    add_items(&mut order, &menu, restaurant.service(), &[("Apple Pie", 1)])?;
    let abandoned = restaurant.place_order(order)?.summary.order_id;
    restaurant.service_mut().cancel(&abandoned, "Customer left")?;

    // Kitchen works the queue in priority order
    let service = restaurant.service_mut();
    let mut started = Vec::new();
    while let Some(summary) = service.next_for_preparation()? {
        info!(order_id = %summary.order_id, "Kitchen started order");
        started.push(summary.order_id);
    }
    for order_id in &started {
        service.update_status(order_id, OrderStatus::Ready)?;
        service.update_status(order_id, OrderStatus::Completed)?;
        dine_in.release_table(order_id);
    }
    drive_thru.complete(&drive_thru_order);

    let customer_app_unread = restaurant
        .service()
        .tracker()
        .observer::<CustomerApp>("app-jordan")
        .map(CustomerApp::unread_count)
        .unwrap_or(0);
    let jordan_points = restaurant.customer(&jordan_id).map_or(0, Customer::points);

    // 3. Back office
    let payroll = payroll(&restaurant);
    let refund_amount = Money::from_cents(200);
    let manager = restaurant
        .staff_by_role(&StaffRole::ShiftManager)
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::EmployeeNotFound("shift manager".to_string()))?;
    manager.authorize_refund(refund_amount)?;
    let refund = gift_payment.refund(refund_amount, "Latte was cold")?;

    let statistics = restaurant.service().statistics();
    let mode = restaurant.service().resolution_mode();
    let daily = restaurant.close()?;

    Ok(DemoReport {
        restaurant: config.restaurant.name.clone(),
        mode,
        discount_checks: discount_showcase(config)?,
        orders,
        cancelled: vec![abandoned],
        customer_app_unread,
        jordan_points,
        payroll,
        refund,
        statistics,
        daily,
    })
}

// =============================================================================
// 3. Back Office
// =============================================================================

fn crew() -> DemoResult<Vec<Employee>> {
    let mut veteran = Employee::transfer("EMP1002", "Morgan", StaffRole::Cashier, 4)?;
    veteran.add_certification("food safety");
    Ok(vec![
        Employee::new("EMP1001", "Casey", StaffRole::Cashier)?,
        veteran,
        Employee::new(
            "EMP1003",
            "Riley",
            StaffRole::Kitchen {
                station: "grill".into(),
            },
        )?,
        Employee::new("EMP2001", "Robin", StaffRole::ShiftManager)?,
    ])
}

/// Hours worked this week, by employee id.
fn hours_worked(employee_id: &str) -> u32 {
    match employee_id {
        "EMP1001" => 32,
        "EMP1003" => 46,
        _ => 40,
    }
}

fn payroll(restaurant: &Restaurant) -> Vec<PayrollLine> {
    restaurant
        .staff()
        .map(|employee| {
            let hours = hours_worked(employee.id());
            PayrollLine {
                employee: employee.name().to_string(),
                role: employee.role().to_string(),
                hours,
                pay: employee.weekly_pay(hours),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_at(time: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.demo.time = Some(time.to_string());
        config
    }

    #[test]
    fn test_showcase_best_vs_stacked() {
        // Wednesday 15:00 is inside happy hour.
        let checks = discount_showcase(&config_at("2024-03-06T15:00:00")).unwrap();
        assert_eq!(checks.len(), 2);

        let student = &checks[0];
        assert_eq!(student.subtotal, Money::from_cents(927));
        // 20% happy hour ($1.85) beats the 5% bronze tier.
        assert_eq!(student.best.rule_name, "Happy Hour");
        assert_eq!(student.best.discount_amount, Money::from_cents(185));
        assert!(student.stacked.discount_amount >= student.best.discount_amount);
        assert!(student.stacked.discount_amount <= student.subtotal);
    }

    #[test]
    fn test_showcase_outside_happy_hour() {
        let checks = discount_showcase(&config_at("2024-03-06T20:00:00")).unwrap();
        let gold = &checks[1];
        // Half off the second large fries ($1.50) beats the 12% gold tier ($1.20).
        assert_eq!(gold.subtotal, Money::from_cents(997));
        assert_eq!(gold.best.rule_name, "Fries BOGO");
        assert_eq!(gold.best.discount_amount, Money::from_cents(150));
    }

    #[test]
    fn test_full_day_runs() {
        let report = run_day(&config_at("2024-03-06T12:30:00")).unwrap();
        assert_eq!(report.orders.len(), 4);
        assert_eq!(report.cancelled.len(), 1);
        assert_eq!(report.statistics.completed_orders, 4);
        assert_eq!(report.statistics.cancelled_orders, 1);
        assert_eq!(report.statistics.active_orders, 0);
        assert_eq!(report.refund.amount, Money::from_cents(200));
        assert_eq!(report.payroll.len(), 4);
        assert_eq!(report.payroll[2].pay.overtime_hours, 6);
        // Signup bonus plus a point per dollar on the drive-thru order
        assert!(report.jordan_points > 100);

        assert_eq!(report.daily.sales.orders_completed, 4);
        assert_eq!(report.daily.sales.revenue, report.statistics.revenue);
        assert_eq!(report.daily.payment_transactions, 4);
        assert_eq!(report.daily.staff.on_duty_peak, 4);
        assert_eq!(report.daily.staff.on_duty, 0);

        // VIP delivery is urgent and jumps the queue.
        let vip = report.orders.iter().find(|o| o.order_type == OrderType::Delivery).unwrap();
        assert_eq!(vip.priority, OrderPriority::Urgent);
        // created, payment, confirmed, in prep, ready, completed
        assert_eq!(report.customer_app_unread, 6);
    }
}
