//! # Discount Module
//!
//! Independent discount rules plus the resolver that picks between them.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Discount Resolution                               │
//! │                                                                         │
//! │  (total, line items, customer attributes)                              │
//! │        │                                                                │
//! │        ▼  now = clock.now()  (sampled once)                            │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │ for rule in registration order:                               │     │
//! │  │   1. validity window contains now?      no ──► skip           │     │
//! │  │   2. rule.is_applicable(ctx)?           no ──► skip           │     │
//! │  │   3. amount = rule.calculate(ctx), clamped to 0..=total        │     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! │        │                                                                │
//! │        ├── Best:    largest amount wins, first one on ties             │
//! │        │            winner's usage counters are bumped                 │
//! │        │                                                                │
//! │        └── Stacked: every rule sees the total left by the ones         │
//! │                     before it; amounts are summed                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No rule ever returns an error. "Nothing matched" is an outcome with
//! `applicable == false` and a zero amount.

mod outcome;
mod resolver;
mod rules;

pub use outcome::{AppliedDiscount, Details, DiscountOutcome, NO_RULE, STACKED_RULE};
pub use resolver::{DailyStats, DiscountResolver, ResolutionMode, RuleStats, UsageStats};
pub use rules::{BuyOneGetOne, ComboBundle, CustomerTier, FixedOff, PercentageOff, TimeWindow};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;
use crate::types::{CustomerAttributes, LineItem};

// =============================================================================
// Order Context
// =============================================================================

/// Everything a rule may look at when deciding on a discount.
///
/// Borrowed for the duration of one resolution call; rules never mutate it.
#[derive(Debug, Clone, Copy)]
pub struct OrderContext<'a> {
    /// Amount the rule computes against. In stacked mode this is the total
    /// remaining after the previous rules.
    pub total: Money,
    pub items: &'a [LineItem],
    pub customer: Option<&'a CustomerAttributes>,
    pub now: NaiveDateTime,
}

impl<'a> OrderContext<'a> {
    pub fn new(
        total: Money,
        items: &'a [LineItem],
        customer: Option<&'a CustomerAttributes>,
        now: NaiveDateTime,
    ) -> Self {
        OrderContext {
            total,
            items,
            customer,
            now,
        }
    }

    /// Same context, different total (used when stacking).
    pub fn with_total(&self, total: Money) -> Self {
        OrderContext { total, ..*self }
    }
}

// =============================================================================
// Validity Window
// =============================================================================

/// Optional date/time bounds on a rule. Both ends are inclusive; a missing
/// end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    pub valid_from: Option<NaiveDateTime>,
    pub valid_until: Option<NaiveDateTime>,
}

impl Validity {
    /// A window with no bounds.
    pub const fn always() -> Self {
        Validity {
            valid_from: None,
            valid_until: None,
        }
    }

    pub const fn between(from: Option<NaiveDateTime>, until: Option<NaiveDateTime>) -> Self {
        Validity {
            valid_from: from,
            valid_until: until,
        }
    }

    pub fn contains(&self, now: NaiveDateTime) -> bool {
        self.valid_from.map_or(true, |from| now >= from)
            && self.valid_until.map_or(true, |until| now <= until)
    }
}

// =============================================================================
// Rule Kind
// =============================================================================

/// The family a rule belongs to. Reported on outcomes and in statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Percentage,
    FixedAmount,
    BuyOneGetOne,
    TimeWindow,
    CustomerTier,
    Combo,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleKind::Percentage => "percentage",
            RuleKind::FixedAmount => "fixed_amount",
            RuleKind::BuyOneGetOne => "buy_one_get_one",
            RuleKind::TimeWindow => "time_window",
            RuleKind::CustomerTier => "customer_tier",
            RuleKind::Combo => "combo",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Rule Trait
// =============================================================================

/// What a rule computed once it decided it applies.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub amount: Money,
    pub reason: String,
    pub details: Details,
}

impl Calculation {
    pub fn new(amount: Money, reason: impl Into<String>) -> Self {
        Calculation {
            amount,
            reason: reason.into(),
            details: Details::new(),
        }
    }

    pub fn detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// A single discount rule.
///
/// Implementors supply the predicate and the calculator; the provided
/// [`DiscountRule::evaluate`] wires them together with the validity check
/// and clamping so every rule behaves the same way inside the resolver.
///
/// ## Example
/// ```rust
/// use quickserve_core::discount::{DiscountRule, FixedOff, OrderContext};
/// use quickserve_core::Money;
/// use chrono::NaiveDate;
///
/// let rule = FixedOff::new("First Order", Money::from_cents(300)).min_order(Money::from_cents(1500));
/// let now = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap().and_hms_opt(12, 0, 0).unwrap();
///
/// let ctx = OrderContext::new(Money::from_cents(2000), &[], None, now);
/// assert_eq!(rule.evaluate(&ctx).discount_amount.cents(), 300);
///
/// let small = ctx.with_total(Money::from_cents(1000));
/// assert!(!rule.evaluate(&small).applicable);
/// ```
pub trait DiscountRule: Send + Sync + fmt::Debug {
    /// Name used for reporting and removal. Not required to be unique.
    fn name(&self) -> &str;

    fn kind(&self) -> RuleKind;

    /// Short human description, e.g. "15% off".
    fn description(&self) -> String;

    fn validity(&self) -> &Validity;

    fn is_applicable(&self, ctx: &OrderContext<'_>) -> bool;

    /// Only called after `is_applicable` returned true.
    fn calculate(&self, ctx: &OrderContext<'_>) -> Calculation;

    /// Reason reported when `is_applicable` is false.
    fn not_applicable_reason(&self, _ctx: &OrderContext<'_>) -> String {
        "Discount not applicable to this order".to_string()
    }

    /// Runs the full check: validity window, applicability, calculation.
    ///
    /// The returned amount is always within `0..=ctx.total`.
    fn evaluate(&self, ctx: &OrderContext<'_>) -> DiscountOutcome {
        if !self.validity().contains(ctx.now) {
            return DiscountOutcome::not_applicable(self.name(), Some(self.kind()), "Discount period expired");
        }

        if !self.is_applicable(ctx) {
            return DiscountOutcome::not_applicable(
                self.name(),
                Some(self.kind()),
                self.not_applicable_reason(ctx),
            );
        }

        let calc = self.calculate(ctx);
        let amount = calc.amount.clamp_to(ctx.total);
        DiscountOutcome::applied(self.name(), self.kind(), amount, calc.reason, calc.details)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 6)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_validity_window_inclusive() {
        let window = Validity::between(Some(at(10, 0)), Some(at(12, 0)));
        assert!(window.contains(at(10, 0)));
        assert!(window.contains(at(12, 0)));
        assert!(!window.contains(at(9, 59)));
        assert!(!window.contains(at(12, 1)));

        assert!(Validity::always().contains(at(0, 0)));
        assert!(Validity::between(None, Some(at(12, 0))).contains(at(1, 0)));
    }

    #[test]
    fn test_expired_rule_reports_reason() {
        let rule = FixedOff::new("Launch", Money::from_cents(100))
            .valid_between(Some(at(8, 0)), Some(at(9, 0)));
        let ctx = OrderContext::new(Money::from_cents(1000), &[], None, at(10, 0));

        let outcome = rule.evaluate(&ctx);
        assert!(!outcome.applicable);
        assert_eq!(outcome.reason, "Discount period expired");
        assert!(outcome.discount_amount.is_zero());
    }

    #[test]
    fn test_evaluate_clamps_to_total() {
        let rule = FixedOff::new("Big", Money::from_cents(5000));
        let ctx = OrderContext::new(Money::from_cents(1200), &[], None, at(12, 0));
        assert_eq!(rule.evaluate(&ctx).discount_amount.cents(), 1200);
    }

    #[test]
    fn test_rule_kind_display() {
        assert_eq!(RuleKind::BuyOneGetOne.to_string(), "buy_one_get_one");
        assert_eq!(RuleKind::CustomerTier.to_string(), "customer_tier");
    }
}
