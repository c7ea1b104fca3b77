use serde::Serialize;
use std::collections::BTreeMap;

use super::RuleKind;
use crate::money::Money;

/// Structured, rule-specific information attached to an outcome.
pub type Details = BTreeMap<String, serde_json::Value>;

/// Rule name reported when nothing applied.
pub const NO_RULE: &str = "none";

/// Rule name reported for a stacked resolution.
pub const STACKED_RULE: &str = "stacked";

/// One rule's contribution, used for stacked breakdowns and best-mode
/// alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedDiscount {
    pub rule_name: String,
    pub kind: RuleKind,
    pub amount: Money,
}

/// Result of evaluating one rule, or of a whole resolution.
///
/// Created fresh for every call; holding on to it never affects the resolver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountOutcome {
    /// Winning rule, `"none"` when nothing applied, `"stacked"` for stacked mode.
    pub rule_name: String,

    /// Kind of the winning rule; `None` for "none" and stacked outcomes.
    pub kind: Option<RuleKind>,

    /// Always `>= 0` and never above the order total.
    pub discount_amount: Money,

    pub applicable: bool,

    pub reason: String,

    pub details: Details,

    /// Stacked mode: every applied rule in application order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breakdown: Vec<AppliedDiscount>,

    /// Best mode: every applicable candidate in registration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<AppliedDiscount>,
}

impl DiscountOutcome {
    pub fn applied(
        rule_name: impl Into<String>,
        kind: RuleKind,
        amount: Money,
        reason: impl Into<String>,
        details: Details,
    ) -> Self {
        DiscountOutcome {
            rule_name: rule_name.into(),
            kind: Some(kind),
            discount_amount: amount,
            applicable: true,
            reason: reason.into(),
            details,
            breakdown: Vec::new(),
            alternatives: Vec::new(),
        }
    }

    pub fn not_applicable(
        rule_name: impl Into<String>,
        kind: Option<RuleKind>,
        reason: impl Into<String>,
    ) -> Self {
        DiscountOutcome {
            rule_name: rule_name.into(),
            kind,
            discount_amount: Money::zero(),
            applicable: false,
            reason: reason.into(),
            details: Details::new(),
            breakdown: Vec::new(),
            alternatives: Vec::new(),
        }
    }

    /// The outcome returned when no registered rule applied.
    pub fn none() -> Self {
        Self::not_applicable(NO_RULE, None, "No applicable discounts")
    }

    /// Summary of this outcome as a single contribution, if it applied.
    pub fn as_applied(&self) -> Option<AppliedDiscount> {
        match (self.applicable, self.kind) {
            (true, Some(kind)) => Some(AppliedDiscount {
                rule_name: self.rule_name.clone(),
                kind,
                amount: self.discount_amount,
            }),
            _ => None,
        }
    }

    /// `total - discount_amount`, never negative.
    pub fn final_total(&self, total: Money) -> Money {
        total.sub_floor_zero(self.discount_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_outcome() {
        let outcome = DiscountOutcome::none();
        assert_eq!(outcome.rule_name, "none");
        assert!(!outcome.applicable);
        assert!(outcome.discount_amount.is_zero());
        assert!(outcome.as_applied().is_none());
    }

    #[test]
    fn test_applied_summary_and_final_total() {
        let outcome = DiscountOutcome::applied(
            "Student",
            RuleKind::Percentage,
            Money::from_cents(300),
            "15% discount applied",
            Details::new(),
        );
        let applied = outcome.as_applied().unwrap();
        assert_eq!(applied.rule_name, "Student");
        assert_eq!(applied.amount.cents(), 300);
        assert_eq!(outcome.final_total(Money::from_cents(2000)).cents(), 1700);
    }

    #[test]
    fn test_serialization_skips_empty_lists() {
        let json = serde_json::to_value(DiscountOutcome::none()).unwrap();
        assert_eq!(json["rule_name"], "none");
        assert_eq!(json["discount_amount"], 0);
        assert!(json.get("breakdown").is_none());
    }
}
