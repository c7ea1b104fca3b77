//! # Error Types
//!
//! Domain-specific error types for quickserve-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quickserve-core errors (this file)                                    │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  quickserve-demo errors (app crate)                                    │
//! │  └── DemoError        - Config file / environment problems             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → anyhow (main only)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The discount resolver is the one component with no error path: a rule
//! that does not match produces a non-applicable outcome, not an error.
//!
//! Messages carry the order id, item name or amount involved so they can be
//! shown to staff unchanged.

use thiserror::Error;

use crate::money::Money;

/// Result alias for fallible core operations.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Core Error
// =============================================================================

/// Failures raised by menu, order, payment and service operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Menu item cannot be found in the catalog.
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    /// Menu item exists but cannot be sold right now (e.g. breakfast after 10:30).
    #[error("Menu item not available: {0}")]
    ItemUnavailable(String),

    /// Order cannot be found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Trying to remove or customize an item that is not on the order.
    #[error("Item '{item}' is not on order {order_id}")]
    ItemNotInOrder { order_id: String, item: String },

    /// Order status machine rejected a transition.
    ///
    /// ## User Workflow
    /// ```text
    /// Order ORD000001 is Completed
    ///      │
    ///      ▼
    /// transition(Cancelled)
    ///      │
    ///      ▼
    /// InvalidStatusTransition { from: "completed", to: "cancelled" }
    /// ```
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        order_id: String,
        from: String,
        to: String,
    },

    /// Order is past the point where lines can be edited.
    #[error("Order {order_id} is {status}, items can no longer be changed")]
    OrderLocked { order_id: String, status: String },

    /// Order failed its type-specific validation.
    #[error("Order {order_id} is invalid: {reason}")]
    InvalidOrder { order_id: String, reason: String },

    /// Order has exceeded maximum allowed lines.
    #[error("Order cannot have more than {max} lines")]
    OrderTooLarge { max: usize },

    /// The service refuses new orders while too many are in flight.
    #[error("Too many active orders (max {max})")]
    TooManyActiveOrders { max: usize },

    /// Requested table is taken or outside the dining room.
    #[error("Table {table} is not available")]
    TableUnavailable { table: u32 },

    /// No free table for the party.
    #[error("No table available for a party of {party_size}")]
    NoTablesAvailable { party_size: u32 },

    /// Every drive-thru lane is at capacity.
    #[error("Drive-thru is full ({lanes} lanes at capacity)")]
    DriveThruFull { lanes: u32 },

    /// Payment amount is outside the accepted range or does not match the order.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Payment instrument was rejected.
    #[error("Payment declined: {reason}")]
    PaymentDeclined { reason: String },

    /// Not enough money on the instrument.
    #[error("Insufficient funds on {method}: required {required}, available {available}")]
    InsufficientFunds {
        method: String,
        required: Money,
        available: Money,
    },

    /// Order already has a successful payment.
    #[error("Order {order_id} has already been paid")]
    OrderAlreadyPaid { order_id: String },

    /// Payment is not in a state that allows the requested operation.
    #[error("Payment {payment_id} is {status}, cannot perform operation")]
    InvalidPaymentState { payment_id: String, status: String },

    /// Customer tried to redeem more loyalty points than they hold.
    #[error("Insufficient loyalty points: available {available}, requested {requested}")]
    InsufficientPoints { available: u64, requested: u64 },

    /// Restaurant status machine rejected a change.
    #[error("Restaurant cannot move from {from} to {to}")]
    InvalidRestaurantStatus { from: String, to: String },

    /// Opening checks failed (e.g. too few staff on shift).
    #[error("Restaurant is not ready to open: {reason}")]
    NotReadyToOpen { reason: String },

    /// Orders are only taken while the restaurant is open or busy.
    #[error("Restaurant is {status}, not taking orders")]
    RestaurantNotOpen { status: String },

    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("Employee {0} is not active")]
    EmployeeInactive(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Staff member lacks the authority for an action.
    #[error("{role} is not authorized to {action}")]
    Unauthorized { role: String, action: String },

    /// Refund is larger than the approver may authorize.
    #[error("Refund of {amount} exceeds approval limit of {limit}")]
    RefundLimitExceeded { amount: Money, limit: Money },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level input problems, raised before any state changes.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., phone number, card number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two menu items with the same name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
