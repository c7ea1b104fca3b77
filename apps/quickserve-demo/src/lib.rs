//! # QuickServe Demo
//!
//! Runs a scripted restaurant day against `quickserve-core` and prints a
//! report.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging  (RUST_LOG, default info,quickserve=debug)      │
//! │  2. Load Config         (defaults ► quickserve.toml ► QUICKSERVE_*)    │
//! │  3. Run Scenarios       (discount showcase, restaurant day, closing)   │
//! │  4. Print Report                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod scenarios;

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::DemoResult;
use crate::scenarios::DemoReport;

/// Installs the global `tracing` subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,quickserve=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Loads the config from `QUICKSERVE_CONFIG` (or the platform default path)
/// and runs every scenario.
pub fn run() -> DemoResult<DemoReport> {
    let config_path = std::env::var_os("QUICKSERVE_CONFIG").map(PathBuf::from);
    let config = AppConfig::load(config_path)?;
    info!(
        restaurant = %config.restaurant.id,
        rules = config.discounts.rules.len(),
        mode = %config.discounts.mode(),
        "Configuration loaded"
    );
    scenarios::run_day(&config)
}

/// Human-readable report.
pub fn render_report(report: &DemoReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({} discounts)\n", report.restaurant, report.mode));

    out.push_str("\nDiscount showcase\n");
    for check in &report.discount_checks {
        out.push_str(&format!(
            "  {:<20} subtotal {:>8}  best: {} -{}  stacked: -{}\n",
            check.label, check.subtotal, check.best.rule_name, check.best.discount_amount, check.stacked.discount_amount
        ));
    }

    out.push_str("\nOrders\n");
    for order in &report.orders {
        out.push_str(&format!(
            "  {} {:<10} {:<8} {:?} discount {} ({}) total {} via {}\n",
            order.order_id,
            order.order_type,
            order.customer,
            order.priority,
            order.discount,
            order.discount_rule,
            order.total,
            order.payment
        ));
    }
    for order_id in &report.cancelled {
        out.push_str(&format!("  {} cancelled\n", order_id));
    }

    out.push_str("\nPayroll\n");
    for line in &report.payroll {
        out.push_str(&format!(
            "  {:<8} {:<16} {:>3}h  {}\n",
            line.employee, line.role, line.hours, line.pay.total
        ));
    }
    out.push_str(&format!("\nRefund {} ({})\n", report.refund.amount, report.refund.reason));

    let stats = &report.statistics;
    out.push_str(&format!(
        "\nCompleted {} / cancelled {}  revenue {}  average order {}  notifications {}\n",
        stats.completed_orders,
        stats.cancelled_orders,
        stats.revenue,
        stats.average_order_value,
        stats.tracking.notifications_sent
    ));

    let daily = &report.daily;
    out.push_str(&format!(
        "Closed {}: {} customers served, {} payments, staff peak {}, kitchen efficiency {:.1}%\n",
        daily.date, daily.sales.customers_served, daily.payment_transactions, daily.staff.on_duty_peak, daily.kitchen_efficiency
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_report() {
        let mut config = AppConfig::default();
        config.demo.time = Some("2024-03-06T12:30:00".into());
        let report = scenarios::run_day(&config).unwrap();

        let text = render_report(&report);
        assert!(text.starts_with("QuickServe Downtown (best discounts)"));
        assert!(text.contains("Student lunch"));
        assert!(text.contains("cancelled"));
        assert!(text.contains("Refund $2.00"));
        assert!(text.contains("Closed 2024-03-06"));
    }
}
