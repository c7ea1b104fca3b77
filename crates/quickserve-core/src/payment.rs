//! # Payments
//!
//! Taking money for an order with one of four methods.
//!
//! ## Payment Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Pending ──process()──► Processing ──ok──► Completed ──refund()──┐      │
//! │     │                        │                  ▲                │      │
//! │     │                        └──error──► Failed └── partial ◄────┤      │
//! │     │                                                            │      │
//! │     └──cancel()──► Cancelled                 Refunded ◄── full ──┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fees
//! | Method    | Fee                                              |
//! |-----------|--------------------------------------------------|
//! | Cash      | none                                             |
//! | Card      | Visa/Mastercard 2.9%, Amex 3.5%, Discover 3.2%, other 3.0% |
//! | Mobile    | 2.5%                                             |
//! | Gift card | none                                             |

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Rate;
use crate::validation::{validate_card_number, validate_payment_amount};

/// Mobile wallets we accept.
pub const MOBILE_PROVIDERS: [&str; 3] = ["apple_pay", "google_pay", "samsung_pay"];

const MOBILE_FEE_BPS: u32 = 250;
const MIN_DEVICE_ID_LEN: usize = 10;
const GIFT_CARD_DIGITS: usize = 16;

// =============================================================================
// Status & Method
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
    Cancelled,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Unknown,
}

impl CardBrand {
    /// Detects the brand from the card's leading digits.
    pub fn detect(digits: &str) -> Self {
        let prefix2 = digits.get(..2).unwrap_or("");
        if digits.starts_with('4') {
            CardBrand::Visa
        } else if matches!(prefix2, "51" | "52" | "53" | "54" | "55" | "22") {
            CardBrand::Mastercard
        } else if matches!(prefix2, "34" | "37") {
            CardBrand::Amex
        } else if digits.starts_with("6011") || prefix2 == "65" {
            CardBrand::Discover
        } else {
            CardBrand::Unknown
        }
    }

    pub fn fee_rate(&self) -> Rate {
        Rate::from_bps(match self {
            CardBrand::Visa | CardBrand::Mastercard => 290,
            CardBrand::Amex => 350,
            CardBrand::Discover => 320,
            CardBrand::Unknown => 300,
        })
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardBrand::Visa => "visa",
            CardBrand::Mastercard => "mastercard",
            CardBrand::Amex => "amex",
            CardBrand::Discover => "discover",
            CardBrand::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// `**** **** **** 1234`
pub fn mask_card_number(digits: &str) -> String {
    let last4 = digits.get(digits.len().saturating_sub(4)..).unwrap_or("");
    format!("**** **** **** {}", last4)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash {
        tendered: Money,
    },
    Card {
        number: String,
        expiry_month: u32,
        expiry_year: i32,
        cvv: String,
    },
    Mobile {
        provider: String,
        device_id: String,
    },
    GiftCard {
        number: String,
        balance: Money,
    },
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash { .. } => "cash",
            PaymentMethod::Card { .. } => "card",
            PaymentMethod::Mobile { .. } => "mobile",
            PaymentMethod::GiftCard { .. } => "gift_card",
        }
    }
}

// =============================================================================
// Receipt & Refund
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    pub payment_id: Uuid,
    pub order_id: Option<String>,
    /// e.g. "cash", "card (visa **** **** **** 1111)", "mobile (apple_pay)"
    pub method: String,
    pub amount: Money,
    pub fee: Money,
    pub net: Money,
    /// Cash only.
    pub change: Option<Money>,
    /// Gift cards only.
    pub remaining_balance: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    pub id: Uuid,
    pub payment_id: Uuid,
    pub amount: Money,
    pub reason: String,
}

// =============================================================================
// Payment
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    id: Uuid,
    order_id: Option<String>,
    amount: Money,
    method: PaymentMethod,
    status: PaymentStatus,
    fee: Money,
    refunds: Vec<Refund>,
}

impl Payment {
    /// A pending payment. The amount must be within $0.01..=$9,999.99.
    pub fn new(amount: Money, method: PaymentMethod) -> CoreResult<Self> {
        validate_payment_amount(amount.cents()).map_err(|e| CoreError::InvalidPaymentAmount {
            reason: e.to_string(),
        })?;
        Ok(Payment {
            id: Uuid::new_v4(),
            order_id: None,
            amount,
            method,
            status: PaymentStatus::Pending,
            fee: Money::zero(),
            refunds: Vec::new(),
        })
    }

    pub fn cash(amount: Money, tendered: Money) -> CoreResult<Self> {
        Self::new(amount, PaymentMethod::Cash { tendered })
    }

    /// Cash for exactly the amount due.
    pub fn exact_cash(amount: Money) -> CoreResult<Self> {
        Self::cash(amount, amount)
    }

    pub fn card(amount: Money, number: &str, expiry_month: u32, expiry_year: i32, cvv: &str) -> CoreResult<Self> {
        Self::new(
            amount,
            PaymentMethod::Card {
                number: number.to_string(),
                expiry_month,
                expiry_year,
                cvv: cvv.to_string(),
            },
        )
    }

    pub fn mobile(amount: Money, provider: &str, device_id: &str) -> CoreResult<Self> {
        Self::new(
            amount,
            PaymentMethod::Mobile {
                provider: provider.to_lowercase(),
                device_id: device_id.to_string(),
            },
        )
    }

    pub fn gift_card(amount: Money, number: &str, balance: Money) -> CoreResult<Self> {
        Self::new(
            amount,
            PaymentMethod::GiftCard {
                number: number.to_string(),
                balance,
            },
        )
    }

    pub fn for_order(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn method(&self) -> &PaymentMethod {
        &self.method
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn fee(&self) -> Money {
        self.fee
    }

    /// Amount minus processing fee.
    pub fn net_amount(&self) -> Money {
        self.amount - self.fee
    }

    pub fn refunds(&self) -> &[Refund] {
        &self.refunds
    }

    pub fn refunded_total(&self) -> Money {
        self.refunds.iter().map(|r| r.amount).sum()
    }

    fn invalid_state(&self) -> CoreError {
        CoreError::InvalidPaymentState {
            payment_id: self.id.to_string(),
            status: self.status.to_string(),
        }
    }

    // =========================================================================
    // Processing
    // =========================================================================

    /// Runs the method's checks and settles the payment.
    ///
    /// `today` decides card expiry. On any error the payment is marked
    /// `Failed` and the error is returned.
    pub fn process(&mut self, today: NaiveDate) -> CoreResult<PaymentReceipt> {
        if self.status != PaymentStatus::Pending {
            return Err(self.invalid_state());
        }
        self.status = PaymentStatus::Processing;

        match self.settle(today) {
            Ok(receipt) => {
                self.status = PaymentStatus::Completed;
                self.fee = receipt.fee;
                if let (PaymentMethod::GiftCard { balance, .. }, Some(remaining)) =
                    (&mut self.method, receipt.remaining_balance)
                {
                    *balance = remaining;
                }
                info!(
                    payment_id = %self.id,
                    method = %receipt.method,
                    amount = %self.amount,
                    fee = %receipt.fee,
                    "Payment completed"
                );
                Ok(receipt)
            }
            Err(err) => {
                self.status = PaymentStatus::Failed;
                warn!(payment_id = %self.id, method = self.method.label(), error = %err, "Payment failed");
                Err(err)
            }
        }
    }

    fn settle(&self, today: NaiveDate) -> CoreResult<PaymentReceipt> {
        let declined = |reason: &str| CoreError::PaymentDeclined {
            reason: reason.to_string(),
        };

        let mut receipt = PaymentReceipt {
            payment_id: self.id,
            order_id: self.order_id.clone(),
            method: self.method.label().to_string(),
            amount: self.amount,
            fee: Money::zero(),
            net: self.amount,
            change: None,
            remaining_balance: None,
        };

        match &self.method {
            PaymentMethod::Cash { tendered } => {
                if *tendered < self.amount {
                    return Err(CoreError::InsufficientFunds {
                        method: "cash".to_string(),
                        required: self.amount,
                        available: *tendered,
                    });
                }
                receipt.change = Some(*tendered - self.amount);
            }
            PaymentMethod::Card {
                number,
                expiry_month,
                expiry_year,
                cvv,
            } => {
                let digits = validate_card_number(number).map_err(|e| declined(&e.to_string()))?;
                if !(1..=12).contains(expiry_month) {
                    return Err(declined("invalid expiry month"));
                }
                if (*expiry_year, *expiry_month) < (today.year(), today.month()) {
                    return Err(declined("card expired"));
                }
                if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
                    return Err(declined("invalid CVV"));
                }
                let brand = CardBrand::detect(&digits);
                receipt.fee = self.amount.percent_of(brand.fee_rate());
                receipt.method = format!("card ({} {})", brand, mask_card_number(&digits));
            }
            PaymentMethod::Mobile { provider, device_id } => {
                if !MOBILE_PROVIDERS.contains(&provider.as_str()) {
                    return Err(declined("unsupported mobile provider"));
                }
                if device_id.trim().len() < MIN_DEVICE_ID_LEN {
                    return Err(declined("invalid device id"));
                }
                receipt.fee = self.amount.percent_of(Rate::from_bps(MOBILE_FEE_BPS));
                receipt.method = format!("mobile ({})", provider);
            }
            PaymentMethod::GiftCard { number, balance } => {
                if number.len() != GIFT_CARD_DIGITS || !number.chars().all(|c| c.is_ascii_digit()) {
                    return Err(declined("invalid gift card number"));
                }
                if *balance < self.amount {
                    return Err(CoreError::InsufficientFunds {
                        method: "gift_card".to_string(),
                        required: self.amount,
                        available: *balance,
                    });
                }
                receipt.remaining_balance = Some(*balance - self.amount);
            }
        }

        receipt.net = self.amount - receipt.fee;
        Ok(receipt)
    }

    // =========================================================================
    // Refund & Cancel
    // =========================================================================

    /// Refunds part or all of a completed payment. Refunds accumulate and
    /// may never exceed the original amount; the payment becomes `Refunded`
    /// once fully refunded.
    pub fn refund(&mut self, amount: Money, reason: impl Into<String>) -> CoreResult<Refund> {
        if self.status != PaymentStatus::Completed {
            return Err(self.invalid_state());
        }
        if !amount.is_positive() {
            return Err(CoreError::InvalidPaymentAmount {
                reason: "refund must be positive".to_string(),
            });
        }
        let remaining = self.amount - self.refunded_total();
        if amount > remaining {
            return Err(CoreError::InvalidPaymentAmount {
                reason: format!("refund {} exceeds refundable {}", amount, remaining),
            });
        }

        let refund = Refund {
            id: Uuid::new_v4(),
            payment_id: self.id,
            amount,
            reason: reason.into(),
        };
        self.refunds.push(refund.clone());
        if amount == remaining {
            self.status = PaymentStatus::Refunded;
        }
        info!(payment_id = %self.id, amount = %amount, "Payment refunded");
        Ok(refund)
    }

    /// Cancels a payment that has not been processed yet.
    pub fn cancel(&mut self) -> CoreResult<()> {
        if self.status != PaymentStatus::Pending {
            return Err(self.invalid_state());
        }
        self.status = PaymentStatus::Cancelled;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
