use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::outcome::STACKED_RULE;
use super::{AppliedDiscount, DiscountOutcome, DiscountRule, OrderContext, RuleKind};
use crate::clock::{Clock, SystemClock};
use crate::money::Money;
use crate::types::{CustomerAttributes, LineItem};

// =============================================================================
// Statistics
// =============================================================================

/// Running counters kept per registered rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageStats {
    pub usage_count: u64,
    pub total_savings: Money,
}

impl UsageStats {
    fn record(&mut self, amount: Money) {
        self.usage_count += 1;
        self.total_savings += amount;
    }

    /// Mean saving per use, rounded down to the cent.
    pub fn average_savings(&self) -> Money {
        if self.usage_count == 0 {
            return Money::zero();
        }
        Money::from_cents(self.total_savings.cents() / self.usage_count as i64)
    }
}

/// Reporting view of one rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleStats {
    pub name: String,
    pub kind: RuleKind,
    pub description: String,
    pub usage_count: u64,
    pub total_savings: Money,
    pub average_savings: Money,
}

/// Resolver-wide report for one business day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub discounts_applied: u64,
    pub total_savings: Money,
    pub active_rules: usize,
    pub rules: Vec<RuleStats>,
}

// =============================================================================
// Resolution Mode
// =============================================================================

/// How the resolver combines applicable rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Only the single largest discount is granted.
    #[default]
    Best,
    /// Every applicable discount is granted, in registration order.
    Stacked,
}

impl std::fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionMode::Best => write!(f, "best"),
            ResolutionMode::Stacked => write!(f, "stacked"),
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

#[derive(Debug)]
struct RegisteredRule {
    rule: Box<dyn DiscountRule>,
    stats: UsageStats,
}

/// Holds the registered rules and picks discounts for orders.
///
/// ## Example
/// ```rust
/// use quickserve_core::discount::{DiscountResolver, FixedOff};
/// use quickserve_core::Money;
///
/// let mut resolver = DiscountResolver::new();
/// resolver.register(FixedOff::new("Three off", Money::from_cents(300)));
/// resolver.register(FixedOff::new("Five off", Money::from_cents(500)));
///
/// let outcome = resolver.resolve_best(Money::from_cents(2000), &[], None);
/// assert_eq!(outcome.rule_name, "Five off");
/// assert_eq!(outcome.alternatives.len(), 2);
/// ```
#[derive(Debug)]
pub struct DiscountResolver {
    rules: Vec<RegisteredRule>,
    clock: Box<dyn Clock>,
    discounts_applied: u64,
    total_savings: Money,
}

impl Default for DiscountResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscountResolver {
    /// Creates an empty resolver reading the system clock.
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        DiscountResolver {
            rules: Vec::new(),
            clock,
            discounts_applied: 0,
            total_savings: Money::zero(),
        }
    }

    /// Swaps the time source (demo scenarios jump between times of day).
    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Adds a rule after the ones already registered.
    ///
    /// Names need not be unique; a second rule with the same name is kept
    /// alongside the first.
    pub fn register<R: DiscountRule + 'static>(&mut self, rule: R) {
        self.register_boxed(Box::new(rule));
    }

    pub fn register_boxed(&mut self, rule: Box<dyn DiscountRule>) {
        debug!(rule = rule.name(), kind = %rule.kind(), "Discount rule registered");
        self.rules.push(RegisteredRule {
            rule,
            stats: UsageStats::default(),
        });
    }

    /// Removes every rule called `name`; returns how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.rules.len();
        self.rules.retain(|r| r.rule.name() != name);
        let removed = before - self.rules.len();
        debug!(rule = name, removed, "Discount rule removed");
        removed
    }

    /// Rule names in registration order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolves with the given mode at the clock's current time.
    pub fn resolve(
        &mut self,
        mode: ResolutionMode,
        total: Money,
        items: &[LineItem],
        customer: Option<&CustomerAttributes>,
    ) -> DiscountOutcome {
        match mode {
            ResolutionMode::Best => self.resolve_best(total, items, customer),
            ResolutionMode::Stacked => self.resolve_stacked(total, items, customer),
        }
    }

    /// Picks the single largest applicable discount.
    ///
    /// Ties go to the rule registered first. A rule whose amount works out
    /// to zero never wins. Only the winner's counters move.
    pub fn resolve_best(
        &mut self,
        total: Money,
        items: &[LineItem],
        customer: Option<&CustomerAttributes>,
    ) -> DiscountOutcome {
        let now = self.clock.now();
        self.resolve_best_in(&OrderContext::new(total, items, customer, now))
    }

    /// [`resolve_best`](Self::resolve_best) against an explicit context.
    pub fn resolve_best_in(&mut self, ctx: &OrderContext<'_>) -> DiscountOutcome {
        let mut best: Option<(usize, DiscountOutcome)> = None;
        let mut alternatives = Vec::new();

        for (idx, registered) in self.rules.iter().enumerate() {
            let outcome = registered.rule.evaluate(ctx);
            debug!(
                rule = registered.rule.name(),
                applicable = outcome.applicable,
                amount = %outcome.discount_amount,
                "Discount rule evaluated"
            );

            let Some(applied) = outcome.as_applied() else {
                continue;
            };
            alternatives.push(applied);

            let best_amount = best
                .as_ref()
                .map_or(Money::zero(), |(_, o)| o.discount_amount);
            if outcome.discount_amount > best_amount {
                best = Some((idx, outcome));
            }
        }

        let Some((idx, mut outcome)) = best else {
            info!(total = %ctx.total, "No applicable discount");
            let mut none = DiscountOutcome::none();
            none.alternatives = alternatives;
            return none;
        };

        self.rules[idx].stats.record(outcome.discount_amount);
        self.discounts_applied += 1;
        self.total_savings += outcome.discount_amount;

        info!(
            rule = %outcome.rule_name,
            amount = %outcome.discount_amount,
            total = %ctx.total,
            "Best discount selected"
        );

        outcome.alternatives = alternatives;
        outcome
    }

    /// Applies every applicable rule in registration order, each against the
    /// total left after the previous ones. A rule that works out to $0.00 is
    /// left out of the breakdown and the usage counts.
    pub fn resolve_stacked(
        &mut self,
        total: Money,
        items: &[LineItem],
        customer: Option<&CustomerAttributes>,
    ) -> DiscountOutcome {
        let now = self.clock.now();
        self.resolve_stacked_in(&OrderContext::new(total, items, customer, now))
    }

    /// [`resolve_stacked`](Self::resolve_stacked) against an explicit context.
    pub fn resolve_stacked_in(&mut self, ctx: &OrderContext<'_>) -> DiscountOutcome {
        let original = ctx.total;
        let mut remaining = original;
        let mut breakdown: Vec<AppliedDiscount> = Vec::new();

        for registered in self.rules.iter_mut() {
            let outcome = registered.rule.evaluate(&ctx.with_total(remaining));
            let Some(applied) = outcome.as_applied() else {
                continue;
            };
            if applied.amount.is_zero() {
                debug!(rule = %applied.rule_name, "Stacked rule has nothing left to discount");
                continue;
            }

            remaining -= applied.amount;
            registered.stats.record(applied.amount);
            debug!(
                rule = %applied.rule_name,
                amount = %applied.amount,
                remaining = %remaining,
                "Stacked discount applied"
            );
            breakdown.push(applied);
        }

        if breakdown.is_empty() {
            info!(total = %original, "No applicable discount to stack");
            return DiscountOutcome::none();
        }

        let discount = original - remaining;
        self.discounts_applied += 1;
        self.total_savings += discount;

        let applied: Vec<serde_json::Value> = breakdown
            .iter()
            .map(|a| {
                serde_json::json!({
                    "rule": a.rule_name,
                    "kind": a.kind.to_string(),
                    "discount_cents": a.amount.cents(),
                })
            })
            .collect();

        let mut details = super::Details::new();
        details.insert("applied_rules".to_string(), applied.into());
        details.insert("original_total_cents".to_string(), original.cents().into());
        details.insert("final_total_cents".to_string(), remaining.cents().into());

        info!(rules = breakdown.len(), amount = %discount, total = %original, "Stacked discounts");

        DiscountOutcome {
            rule_name: STACKED_RULE.to_string(),
            kind: None,
            discount_amount: discount,
            applicable: true,
            reason: format!("Stacked {} discounts", breakdown.len()),
            details,
            breakdown,
            alternatives: Vec::new(),
        }
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// Per-rule statistics in registration order.
    pub fn usage_stats(&self) -> Vec<RuleStats> {
        self.rules
            .iter()
            .map(|r| RuleStats {
                name: r.rule.name().to_string(),
                kind: r.rule.kind(),
                description: r.rule.description(),
                usage_count: r.stats.usage_count,
                total_savings: r.stats.total_savings,
                average_savings: r.stats.average_savings(),
            })
            .collect()
    }

    /// Totals across all resolutions plus per-rule statistics, dated by the
    /// resolver's clock.
    pub fn daily_stats(&self) -> DailyStats {
        DailyStats {
            date: self.clock.today(),
            discounts_applied: self.discounts_applied,
            total_savings: self.total_savings,
            active_rules: self.rules.len(),
            rules: self.usage_stats(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::discount::{BuyOneGetOne, ComboBundle, CustomerTier, FixedOff, PercentageOff, TimeWindow};
    use crate::types::Rate;
    use chrono::NaiveTime;

    fn resolver_at(hour: u32) -> DiscountResolver {
        // Wednesday
        DiscountResolver::with_clock(Box::new(FixedClock::at(2024, 3, 6, hour, 0).unwrap()))
    }

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn test_no_rules_is_not_applicable() {
        let mut resolver = resolver_at(12);
        let outcome = resolver.resolve_best(cents(1000), &[], None);
        assert!(!outcome.applicable);
        assert_eq!(outcome.rule_name, "none");
        assert!(outcome.discount_amount.is_zero());
        assert_eq!(resolver.daily_stats().discounts_applied, 0);
    }

    #[test]
    fn test_largest_wins_regardless_of_order() {
        for reversed in [false, true] {
            let mut resolver = resolver_at(12);
            let small = FixedOff::new("Three", cents(300));
            let large = FixedOff::new("Five", cents(500));
            if reversed {
                resolver.register(large);
                resolver.register(small);
            } else {
                resolver.register(small);
                resolver.register(large);
            }

            let outcome = resolver.resolve_best(cents(2000), &[], None);
            assert_eq!(outcome.rule_name, "Five");
            assert_eq!(outcome.discount_amount.cents(), 500);
        }
    }

    #[test]
    fn test_tie_goes_to_first_registered() {
        let mut resolver = resolver_at(12);
        resolver.register(FixedOff::new("First", cents(400)));
        resolver.register(PercentageOff::new("Second", Rate::from_percent(20)));

        let outcome = resolver.resolve_best(cents(2000), &[], None);
        assert_eq!(outcome.rule_name, "First");
        assert_eq!(outcome.alternatives.len(), 2);
    }

    #[test]
    fn test_zero_amount_rule_never_wins() {
        let mut resolver = resolver_at(12);
        resolver.register(ComboBundle::new("Pricey combo", ["Burger"], cents(1000)));

        let items = vec![LineItem::new("Burger", 1, cents(500))];
        let outcome = resolver.resolve_best(cents(500), &items, None);
        assert!(!outcome.applicable);
        assert_eq!(outcome.alternatives.len(), 1);
    }

    #[test]
    fn test_best_never_exceeds_total() {
        let mut resolver = resolver_at(12);
        resolver.register(FixedOff::new("Huge", cents(10_000)));
        resolver.register(PercentageOff::new("All", Rate::from_percent(100)));

        let outcome = resolver.resolve_best(cents(750), &[], None);
        assert_eq!(outcome.discount_amount.cents(), 750);
    }

    #[test]
    fn test_only_winner_counts_usage() {
        let mut resolver = resolver_at(12);
        resolver.register(FixedOff::new("Three", cents(300)));
        resolver.register(FixedOff::new("Five", cents(500)));

        resolver.resolve_best(cents(2000), &[], None);
        resolver.resolve_best(cents(2000), &[], None);

        let stats = resolver.usage_stats();
        assert_eq!(stats[0].usage_count, 0);
        assert_eq!(stats[1].usage_count, 2);
        assert_eq!(stats[1].total_savings.cents(), 1000);
        assert_eq!(stats[1].average_savings.cents(), 500);

        let daily = resolver.daily_stats();
        assert_eq!(daily.discounts_applied, 2);
        assert_eq!(daily.total_savings.cents(), 1000);
        assert_eq!(daily.active_rules, 2);
        assert_eq!(daily.date.to_string(), "2024-03-06");
    }

    #[test]
    fn test_happy_hour_follows_clock() {
        let start = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(17, 0, 0).unwrap();

        let mut resolver = resolver_at(15);
        resolver.register(TimeWindow::new("Happy Hour", Rate::from_percent(20), start, end));
        assert!(resolver.resolve_best(cents(1000), &[], None).applicable);

        resolver.set_clock(Box::new(FixedClock::at(2024, 3, 6, 20, 0).unwrap()));
        assert!(!resolver.resolve_best(cents(1000), &[], None).applicable);
    }

    #[test]
    fn test_stacked_applies_sequentially() {
        let mut resolver = resolver_at(12);
        resolver.register(PercentageOff::new("Ten percent", Rate::from_percent(10)));
        resolver.register(FixedOff::new("Two off", cents(200)));

        let outcome = resolver.resolve_stacked(cents(5000), &[], None);
        assert!(outcome.applicable);
        assert_eq!(outcome.rule_name, "stacked");
        // $5.00 then $2.00 on the remaining $45.00
        assert_eq!(outcome.discount_amount.cents(), 700);
        assert_eq!(outcome.breakdown.len(), 2);
        assert_eq!(outcome.breakdown[0].amount.cents(), 500);
        assert_eq!(outcome.breakdown[1].amount.cents(), 200);
        assert_eq!(outcome.details["final_total_cents"], 4300);
        assert_eq!(outcome.reason, "Stacked 2 discounts");

        // Each applied rule is counted once, the resolution once
        assert!(resolver.usage_stats().iter().all(|s| s.usage_count == 1));
        assert_eq!(resolver.daily_stats().discounts_applied, 1);
    }

    #[test]
    fn test_stacked_order_changes_result() {
        let mut resolver = resolver_at(12);
        resolver.register(FixedOff::new("Two off", cents(200)));
        resolver.register(PercentageOff::new("Ten percent", Rate::from_percent(10)));

        // $2.00, then 10% of $48.00
        let outcome = resolver.resolve_stacked(cents(5000), &[], None);
        assert_eq!(outcome.discount_amount.cents(), 680);
    }

    #[test]
    fn test_stacked_never_exceeds_total() {
        let mut resolver = resolver_at(12);
        resolver.register(FixedOff::new("Eight off", cents(800)));
        resolver.register(FixedOff::new("Eight off again", cents(800)));
        resolver.register(BuyOneGetOne::new("Free fries", ["Fries"], Rate::from_percent(100)));

        let items = vec![LineItem::new("Fries", 2, cents(500))];
        let outcome = resolver.resolve_stacked(cents(1000), &items, None);
        assert_eq!(outcome.discount_amount.cents(), 1000);
        assert_eq!(outcome.breakdown[1].amount.cents(), 200);
        // Nothing is left for the fries once the fixed amounts use it up
        assert_eq!(outcome.breakdown.len(), 2);
        assert_eq!(outcome.reason, "Stacked 2 discounts");
        let fries = resolver.usage_stats().into_iter().find(|s| s.name == "Free fries").unwrap();
        assert_eq!(fries.usage_count, 0);
    }

    #[test]
    fn test_stacked_threshold_sees_remaining_total() {
        let mut resolver = resolver_at(12);
        resolver.register(FixedOff::new("Five off", cents(500)));
        resolver.register(FixedOff::new("Needs fifteen", cents(300)).min_order(cents(1500)));

        let outcome = resolver.resolve_stacked(cents(1800), &[], None);
        assert_eq!(outcome.breakdown.len(), 1);
        assert_eq!(outcome.discount_amount.cents(), 500);
    }

    #[test]
    fn test_stacked_with_nothing_applicable() {
        let mut resolver = resolver_at(12);
        resolver.register(CustomerTier::new("Loyalty").tier("gold", Rate::from_percent(12)));
        let outcome = resolver.resolve_stacked(cents(1000), &[], None);
        assert!(!outcome.applicable);
        assert_eq!(outcome.rule_name, "none");
    }

    #[test]
    fn test_resolve_dispatches_on_mode() {
        let mut resolver = resolver_at(12);
        resolver.register(FixedOff::new("One", cents(100)));
        resolver.register(FixedOff::new("Two", cents(200)));

        let best = resolver.resolve(ResolutionMode::Best, cents(1000), &[], None);
        assert_eq!(best.discount_amount.cents(), 200);

        let stacked = resolver.resolve(ResolutionMode::Stacked, cents(1000), &[], None);
        assert_eq!(stacked.discount_amount.cents(), 300);
    }

    #[test]
    fn test_register_duplicates_and_remove() {
        let mut resolver = resolver_at(12);
        resolver.register(FixedOff::new("Promo", cents(100)));
        resolver.register(FixedOff::new("Other", cents(100)));
        resolver.register(FixedOff::new("Promo", cents(200)));
        assert_eq!(resolver.rule_names(), vec!["Promo", "Other", "Promo"]);

        assert_eq!(resolver.remove("Promo"), 2);
        assert_eq!(resolver.rule_names(), vec!["Other"]);
        assert_eq!(resolver.remove("Missing"), 0);
        assert_eq!(resolver.len(), 1);
    }
}
