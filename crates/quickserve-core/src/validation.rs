//! # Validation Module
//!
//! Input validation utilities for QuickServe.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Config / demo input                                          │
//! │  ├── Type validation (serde deserialization)                           │
//! │  └── Range checks on rates and prices                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Domain constructors (Rust)                                   │
//! │  ├── THIS MODULE: field-level rules                                    │
//! │  └── MenuItem::new, Order::add_item, Customer::new, Payment::new       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Business operations                                          │
//! │  ├── Order::validate (type-specific rules)                             │
//! │  └── Status machine, payment processing                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quickserve_core::validation::{validate_item_name, validate_quantity};
//!
//! assert!(validate_item_name("Big Mac").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Smallest accepted payment ($0.01).
pub const MIN_PAYMENT_CENTS: i64 = 1;

/// Largest accepted single payment ($9,999.99).
pub const MAX_PAYMENT_CENTS: i64 = 999_999;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a menu item or order line name.
///
/// ## Rules
/// - Must not be blank
/// - At most 100 characters
/// - No markup characters (`< > { } [ ] \`)
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    if name.chars().any(|c| matches!(c, '<' | '>' | '{' | '}' | '[' | ']' | '\\')) {
        return Err(ValidationError::InvalidFormat {
            field: "name".to_string(),
            reason: "contains invalid characters".to_string(),
        });
    }

    Ok(())
}

/// Validates a phone number and returns its digits.
///
/// ## Rules
/// - Separators (space, `-`, `.`, `(`, `)`) and a leading `+` are ignored
/// - 10 to 15 digits remain
///
/// ## Example
/// ```rust
/// use quickserve_core::validation::validate_phone;
///
/// assert_eq!(validate_phone("+1 (555) 123-4567").unwrap(), "15551234567");
/// assert!(validate_phone("12345").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let rest = phone.strip_prefix('+').unwrap_or(phone);
    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => {
                return Err(ValidationError::InvalidFormat {
                    field: "phone".to_string(),
                    reason: format!("unexpected character '{}'", c),
                })
            }
        }
    }

    if !(10..=15).contains(&digits.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain 10 to 15 digits".to_string(),
        });
    }

    Ok(digits)
}

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot, does not start or end with one
/// - At most 254 characters
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.contains(char::is_whitespace)
    {
        return Err(invalid());
    }

    Ok(())
}

/// Validates an employee id (`EMP` followed by 4 to 6 digits).
pub fn validate_employee_id(id: &str) -> ValidationResult<()> {
    let digits = id.strip_prefix("EMP").ok_or_else(|| ValidationError::InvalidFormat {
        field: "employee_id".to_string(),
        reason: "must start with EMP".to_string(),
    })?;

    if !(4..=6).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "employee_id".to_string(),
            reason: "must be EMP followed by 4-6 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a payment card number and returns its digits.
///
/// Spaces and dashes are ignored; 13 to 19 digits must remain.
pub fn validate_card_number(number: &str) -> ValidationResult<String> {
    let digits: String = number.chars().filter(|c| !matches!(c, ' ' | '-')).collect();

    if digits.is_empty() {
        return Err(ValidationError::Required {
            field: "card_number".to_string(),
        });
    }

    if !(13..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "card_number".to_string(),
            reason: "must be 13-19 digits".to_string(),
        });
    }

    Ok(digits)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, toys)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a payment amount in cents ($0.01 to $9,999.99).
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if !(MIN_PAYMENT_CENTS..=MAX_PAYMENT_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "payment amount".to_string(),
            min: MIN_PAYMENT_CENTS,
            max: MAX_PAYMENT_CENTS,
        });
    }

    Ok(())
}

/// Validates a rate in basis points (0% to 100%).
pub fn validate_rate_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates a count that must be at least one (party size, table number).
pub fn validate_positive(field: &str, value: i64) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates order size before adding another distinct line.
///
/// ## Rules
/// - Must not exceed MAX_ORDER_LINES (100)
pub fn validate_order_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "order lines".to_string(),
            min: 0,
            max: MAX_ORDER_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Big Mac").is_ok());
        assert!(validate_item_name("French Fries (Medium)").is_ok());

        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(101)).is_err());
        assert!(validate_item_name("<script>").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert_eq!(validate_phone("555-123-4567").unwrap(), "5551234567");
        assert!(validate_phone("").is_err());
        assert!(validate_phone("555-CALL-NOW").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ann@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ann@localhost").is_err());
        assert!(validate_email("ann@.com").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn test_validate_employee_id() {
        assert!(validate_employee_id("EMP0001").is_ok());
        assert!(validate_employee_id("EMP123456").is_ok());
        assert!(validate_employee_id("EMP12").is_err());
        assert!(validate_employee_id("E0001").is_err());
        assert!(validate_employee_id("EMP12a4").is_err());
    }

    #[test]
    fn test_validate_card_number() {
        assert_eq!(
            validate_card_number("4111 1111 1111 1111").unwrap(),
            "4111111111111111"
        );
        assert!(validate_card_number("").is_err());
        assert!(validate_card_number("4111").is_err());
        assert!(validate_card_number("4111-1111-1111-111x").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_and_payment() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-1).is_err());

        assert!(validate_payment_amount(1).is_ok());
        assert!(validate_payment_amount(999_999).is_ok());
        assert!(validate_payment_amount(0).is_err());
        assert!(validate_payment_amount(1_000_000).is_err());
    }

    #[test]
    fn test_validate_rate_and_positive() {
        assert!(validate_rate_bps("discount", 10_000).is_ok());
        assert!(validate_rate_bps("discount", 10_001).is_err());
        assert!(validate_positive("party_size", 1).is_ok());
        assert!(validate_positive("party_size", 0).is_err());
    }

    #[test]
    fn test_validate_order_size() {
        assert!(validate_order_size(0).is_ok());
        assert!(validate_order_size(99).is_ok());
        assert!(validate_order_size(100).is_err());
    }
}
