//! # quickserve-core: Pure Business Logic for QuickServe
//!
//! This crate models a fast-food restaurant's front counter: menu, orders,
//! customers, staff, payments and order tracking. Its centrepiece is the
//! discount resolver, which picks the best promotion for an order (or stacks
//! all of them when asked to).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        QuickServe Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                apps/quickserve-demo (binary)                    │   │
//! │  │     config (TOML + env) ──► rule set ──► demo scenarios          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ quickserve-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ discount  │  │   order   │  │  payment  │  │ tracking  │  │   │
//! │  │   │ Resolver  │  │ Order     │  │ Payment   │  │ Tracker   │  │   │
//! │  │   │ Rules     │  │ Factories │  │ Receipt   │  │ Observers │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   menu    │  │ customer  │  │   staff   │  │  service  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • TIME VIA Clock                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Cent amounts and half-up percentage math
//! - [`types`] - Shared value types (Rate, LineItem, CustomerAttributes)
//! - [`error`] - `CoreError` and `ValidationError`
//! - [`validation`] - Field checks shared by menu, order and payment
//! - [`clock`] - Injectable time source
//! - [`discount`] - Discount rules and the resolver
//! - [`menu`] - Menu items and pricing
//! - [`order`] - Orders, status machine and order factories
//! - [`customer`] - Customers and loyalty tiers
//! - [`staff`] - Staff roles, pay and refund authority
//! - [`payment`] - Payment methods and processing
//! - [`tracking`] - Order notifications and observers
//! - [`context`] - Restaurant-wide counters and id issuance
//! - [`service`] - Order service tying everything together
//! - [`restaurant`] - Opening hours, crew roster, customer registry and daily report
//!
//! ## Example Usage
//!
//! ```rust
//! use quickserve_core::discount::{DiscountResolver, PercentageOff};
//! use quickserve_core::{LineItem, Money, Rate};
//!
//! let mut resolver = DiscountResolver::new();
//! resolver.register(PercentageOff::new("Student", Rate::from_percent(15)).min_order(Money::from_cents(1000)));
//!
//! let items = vec![LineItem::new("Big Mac", 4, Money::from_cents(500))];
//! let outcome = resolver.resolve_best(Money::from_cents(2000), &items, None);
//!
//! assert!(outcome.applicable);
//! assert_eq!(outcome.discount_amount.cents(), 300);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod context;
pub mod customer;
pub mod discount;
pub mod error;
pub mod menu;
pub mod money;
pub mod order;
pub mod payment;
pub mod restaurant;
pub mod service;
pub mod staff;
pub mod tracking;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use quickserve_core::Money` instead of
// `use quickserve_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed on a single order.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single item on an order.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Sales tax applied when nothing else is configured (8%).
pub const DEFAULT_TAX_BPS: u32 = 800;
