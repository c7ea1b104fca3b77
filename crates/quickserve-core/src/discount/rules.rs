//! The six built-in rule kinds.
//!
//! Every rule is built with a small builder: `new` takes the required
//! parameters, chained methods set the optional ones.
//!
//! ```text
//! ┌──────────────────┬───────────────────────────────┬──────────────────────────────┐
//! │ Rule             │ Applies when                  │ Amount                       │
//! ├──────────────────┼───────────────────────────────┼──────────────────────────────┤
//! │ PercentageOff    │ total >= min_order            │ total × pct, capped at max   │
//! │ FixedOff         │ total >= min_order            │ min(amount, total)           │
//! │ BuyOneGetOne     │ a target item has qty >= 2    │ Σ (qty / 2) × price × pct    │
//! │ TimeWindow       │ now within start..=end        │ total × pct                  │
//! │ CustomerTier     │ loyalty_tier is mapped        │ total × tier pct             │
//! │ ComboBundle      │ every required item present   │ Σ unit prices − bundle price │
//! └──────────────────┴───────────────────────────────┴──────────────────────────────┘
//! ```

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use serde_json::json;
use std::collections::BTreeMap;

use super::{Calculation, DiscountRule, OrderContext, RuleKind, Validity};
use crate::money::Money;
use crate::types::{LineItem, Rate};

// =============================================================================
// Percentage of Total
// =============================================================================

/// `percent` off the whole order, optionally capped.
#[derive(Debug, Clone)]
pub struct PercentageOff {
    name: String,
    percent: Rate,
    min_order: Money,
    max_discount: Option<Money>,
    validity: Validity,
}

impl PercentageOff {
    pub fn new(name: impl Into<String>, percent: Rate) -> Self {
        PercentageOff {
            name: name.into(),
            percent,
            min_order: Money::zero(),
            max_discount: None,
            validity: Validity::always(),
        }
    }

    pub fn min_order(mut self, min_order: Money) -> Self {
        self.min_order = min_order;
        self
    }

    pub fn max_discount(mut self, max: Money) -> Self {
        self.max_discount = Some(max);
        self
    }

    pub fn valid_between(mut self, from: Option<NaiveDateTime>, until: Option<NaiveDateTime>) -> Self {
        self.validity = Validity::between(from, until);
        self
    }

    pub fn percent(&self) -> Rate {
        self.percent
    }
}

impl DiscountRule for PercentageOff {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Percentage
    }

    fn description(&self) -> String {
        format!("{} off", self.percent)
    }

    fn validity(&self) -> &Validity {
        &self.validity
    }

    fn is_applicable(&self, ctx: &OrderContext<'_>) -> bool {
        ctx.total >= self.min_order
    }

    fn calculate(&self, ctx: &OrderContext<'_>) -> Calculation {
        let mut amount = ctx.total.percent_of(self.percent);
        if let Some(max) = self.max_discount {
            amount = amount.min(max);
        }

        Calculation::new(amount, format!("{} discount applied", self.percent))
            .detail("percentage", self.percent.percentage())
            .detail("original_total_cents", ctx.total.cents())
            .detail("max_discount_cents", self.max_discount.map(|m| m.cents()))
    }

    fn not_applicable_reason(&self, ctx: &OrderContext<'_>) -> String {
        format!("Order total {} is below the {} minimum", ctx.total, self.min_order)
    }
}

// =============================================================================
// Fixed Amount
// =============================================================================

/// A flat amount off, never more than the order total.
#[derive(Debug, Clone)]
pub struct FixedOff {
    name: String,
    amount: Money,
    min_order: Money,
    validity: Validity,
}

impl FixedOff {
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        FixedOff {
            name: name.into(),
            amount,
            min_order: Money::zero(),
            validity: Validity::always(),
        }
    }

    pub fn min_order(mut self, min_order: Money) -> Self {
        self.min_order = min_order;
        self
    }

    pub fn valid_between(mut self, from: Option<NaiveDateTime>, until: Option<NaiveDateTime>) -> Self {
        self.validity = Validity::between(from, until);
        self
    }
}

impl DiscountRule for FixedOff {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RuleKind {
        RuleKind::FixedAmount
    }

    fn description(&self) -> String {
        format!("{} off", self.amount)
    }

    fn validity(&self) -> &Validity {
        &self.validity
    }

    fn is_applicable(&self, ctx: &OrderContext<'_>) -> bool {
        ctx.total >= self.min_order
    }

    fn calculate(&self, ctx: &OrderContext<'_>) -> Calculation {
        let actual = self.amount.min(ctx.total);
        Calculation::new(actual, format!("{} discount applied", self.amount))
            .detail("fixed_amount_cents", self.amount.cents())
            .detail("actual_discount_cents", actual.cents())
            .detail("original_total_cents", ctx.total.cents())
    }

    fn not_applicable_reason(&self, ctx: &OrderContext<'_>) -> String {
        format!("Order total {} is below the {} minimum", ctx.total, self.min_order)
    }
}

// =============================================================================
// Buy One Get One
// =============================================================================

/// Every second unit of a target item is `percent` off (100% = free).
///
/// Items are matched by exact name. Quantities of lines sharing a name are
/// added up; the price of the last such line is used.
#[derive(Debug, Clone)]
pub struct BuyOneGetOne {
    name: String,
    targets: Vec<String>,
    percent: Rate,
    validity: Validity,
}

/// Aggregated target item: (name, units, unit price of the last line).
type Tally<'a> = Vec<(&'a str, i64, Money)>;

impl BuyOneGetOne {
    pub fn new<I, S>(name: impl Into<String>, targets: I, percent: Rate) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BuyOneGetOne {
            name: name.into(),
            targets: targets.into_iter().map(Into::into).collect(),
            percent,
            validity: Validity::always(),
        }
    }

    pub fn valid_between(mut self, from: Option<NaiveDateTime>, until: Option<NaiveDateTime>) -> Self {
        self.validity = Validity::between(from, until);
        self
    }

    fn tally<'a>(&self, items: &'a [LineItem]) -> Tally<'a> {
        let mut tally: Tally<'a> = Vec::new();
        for item in items.iter().filter(|i| self.targets.contains(&i.name)) {
            match tally.iter_mut().find(|(name, _, _)| *name == item.name) {
                Some(entry) => {
                    entry.1 += item.quantity;
                    entry.2 = item.unit_price;
                }
                None => tally.push((item.name.as_str(), item.quantity, item.unit_price)),
            }
        }
        tally
    }
}

impl DiscountRule for BuyOneGetOne {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RuleKind {
        RuleKind::BuyOneGetOne
    }

    fn description(&self) -> String {
        format!("Buy one get one {} off", self.percent)
    }

    fn validity(&self) -> &Validity {
        &self.validity
    }

    fn is_applicable(&self, ctx: &OrderContext<'_>) -> bool {
        self.tally(ctx.items).iter().any(|(_, count, _)| *count >= 2)
    }

    fn calculate(&self, ctx: &OrderContext<'_>) -> Calculation {
        let mut raw: i128 = 0;
        let mut breakdown = Vec::new();

        for (item, count, price) in self.tally(ctx.items) {
            if count < 2 {
                continue;
            }
            let free = count / 2;
            let term = price.cents() as i128 * free as i128 * self.percent.bps() as i128;
            raw += term;
            breakdown.push(json!({
                "item": item,
                "bought": count,
                "free_items": free,
                "discount_cents": Money::from_bps_product(term).cents(),
            }));
        }

        // One rounding step over the whole sum
        Calculation::new(Money::from_bps_product(raw), format!("BOGO {} applied", self.percent))
            .detail("target_items", self.targets.clone())
            .detail("discount_percentage", self.percent.percentage())
            .detail("bogo_details", breakdown)
    }

    fn not_applicable_reason(&self, _ctx: &OrderContext<'_>) -> String {
        "Need at least two of the same promotional item".to_string()
    }
}

// =============================================================================
// Time Window (Happy Hour)
// =============================================================================

/// `percent` off while the clock is inside a daily window.
///
/// Both ends are inclusive. A start later than the end wraps past midnight
/// (22:00-06:00 covers late night and early morning).
#[derive(Debug, Clone)]
pub struct TimeWindow {
    name: String,
    percent: Rate,
    start: NaiveTime,
    end: NaiveTime,
    weekdays_only: bool,
    validity: Validity,
}

impl TimeWindow {
    pub fn new(name: impl Into<String>, percent: Rate, start: NaiveTime, end: NaiveTime) -> Self {
        TimeWindow {
            name: name.into(),
            percent,
            start,
            end,
            weekdays_only: false,
            validity: Validity::always(),
        }
    }

    /// Restricts the window to Monday through Friday.
    pub fn weekdays_only(mut self) -> Self {
        self.weekdays_only = true;
        self
    }

    pub fn valid_between(mut self, from: Option<NaiveDateTime>, until: Option<NaiveDateTime>) -> Self {
        self.validity = Validity::between(from, until);
        self
    }

    pub fn in_window(&self, now: NaiveDateTime) -> bool {
        if self.weekdays_only && matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }

        let t = now.time();
        if self.start <= self.end {
            self.start <= t && t <= self.end
        } else {
            t >= self.start || t <= self.end
        }
    }

    fn period(&self) -> String {
        format!("{} - {}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

impl DiscountRule for TimeWindow {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RuleKind {
        RuleKind::TimeWindow
    }

    fn description(&self) -> String {
        format!("{} off during happy hour", self.percent)
    }

    fn validity(&self) -> &Validity {
        &self.validity
    }

    fn is_applicable(&self, ctx: &OrderContext<'_>) -> bool {
        self.in_window(ctx.now)
    }

    fn calculate(&self, ctx: &OrderContext<'_>) -> Calculation {
        Calculation::new(
            ctx.total.percent_of(self.percent),
            format!("Happy Hour {} discount", self.percent),
        )
        .detail("percentage", self.percent.percentage())
        .detail("time_period", self.period())
        .detail("weekdays_only", self.weekdays_only)
        .detail("current_time", ctx.now.format("%H:%M").to_string())
    }

    fn not_applicable_reason(&self, _ctx: &OrderContext<'_>) -> String {
        if self.weekdays_only {
            format!("Outside happy hour ({} on weekdays)", self.period())
        } else {
            format!("Outside happy hour ({})", self.period())
        }
    }
}

// =============================================================================
// Customer Tier
// =============================================================================

/// Percentage chosen by the customer's `loyalty_tier` attribute.
///
/// Tier names are compared case-insensitively.
#[derive(Debug, Clone)]
pub struct CustomerTier {
    name: String,
    tiers: BTreeMap<String, Rate>,
    validity: Validity,
}

impl CustomerTier {
    pub fn new(name: impl Into<String>) -> Self {
        CustomerTier {
            name: name.into(),
            tiers: BTreeMap::new(),
            validity: Validity::always(),
        }
    }

    /// Adds or replaces the rate for one tier.
    pub fn tier(mut self, tier: &str, rate: Rate) -> Self {
        self.tiers.insert(tier.to_lowercase(), rate);
        self
    }

    pub fn valid_between(mut self, from: Option<NaiveDateTime>, until: Option<NaiveDateTime>) -> Self {
        self.validity = Validity::between(from, until);
        self
    }

    fn rate_for(&self, ctx: &OrderContext<'_>) -> Option<(String, Rate)> {
        let tier = ctx.customer?.loyalty_tier()?.to_lowercase();
        let rate = *self.tiers.get(&tier)?;
        Some((tier, rate))
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl DiscountRule for CustomerTier {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RuleKind {
        RuleKind::CustomerTier
    }

    fn description(&self) -> String {
        "Loyalty tier discount".to_string()
    }

    fn validity(&self) -> &Validity {
        &self.validity
    }

    fn is_applicable(&self, ctx: &OrderContext<'_>) -> bool {
        self.rate_for(ctx).is_some()
    }

    fn calculate(&self, ctx: &OrderContext<'_>) -> Calculation {
        let Some((tier, rate)) = self.rate_for(ctx) else {
            return Calculation::new(Money::zero(), "No loyalty tier");
        };

        let all_tiers: serde_json::Map<String, serde_json::Value> = self
            .tiers
            .iter()
            .map(|(k, v)| (k.clone(), v.percentage().into()))
            .collect();

        Calculation::new(
            ctx.total.percent_of(rate),
            format!("{} tier {} discount", title_case(&tier), rate),
        )
        .detail("customer_tier", tier)
        .detail("percentage", rate.percentage())
        .detail("all_tiers", serde_json::Value::Object(all_tiers))
    }

    fn not_applicable_reason(&self, ctx: &OrderContext<'_>) -> String {
        match ctx.customer.map(|c| c.loyalty_tier()) {
            None => "No customer data provided".to_string(),
            Some(None) => "Customer has no loyalty tier".to_string(),
            Some(Some(tier)) => format!("No discount for tier: {}", tier.to_lowercase()),
        }
    }
}

// =============================================================================
// Combo Bundle
// =============================================================================

/// Prices a set of items as a bundle.
///
/// Each required name matches the first line whose name contains it
/// (case-insensitive). The discount is one unit of each matched line minus
/// the bundle price, floored at zero.
#[derive(Debug, Clone)]
pub struct ComboBundle {
    name: String,
    required: Vec<String>,
    bundle_price: Money,
    validity: Validity,
}

impl ComboBundle {
    pub fn new<I, S>(name: impl Into<String>, required: I, bundle_price: Money) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ComboBundle {
            name: name.into(),
            required: required.into_iter().map(Into::into).collect(),
            bundle_price,
            validity: Validity::always(),
        }
    }

    pub fn valid_between(mut self, from: Option<NaiveDateTime>, until: Option<NaiveDateTime>) -> Self {
        self.validity = Validity::between(from, until);
        self
    }

    fn matched<'a>(&self, items: &'a [LineItem]) -> Vec<&'a LineItem> {
        self.required
            .iter()
            .filter_map(|required| {
                let needle = required.to_lowercase();
                items
                    .iter()
                    .find(|item| item.name.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

impl DiscountRule for ComboBundle {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Combo
    }

    fn description(&self) -> String {
        format!("Combo deal for {}", self.bundle_price)
    }

    fn validity(&self) -> &Validity {
        &self.validity
    }

    fn is_applicable(&self, ctx: &OrderContext<'_>) -> bool {
        self.matched(ctx.items).len() == self.required.len()
    }

    fn calculate(&self, ctx: &OrderContext<'_>) -> Calculation {
        let found = self.matched(ctx.items);
        let individual: Money = found.iter().map(|item| item.unit_price).sum();
        let names: Vec<String> = found.iter().map(|item| item.name.clone()).collect();

        Calculation::new(
            individual.sub_floor_zero(self.bundle_price),
            "Combo meal discount applied",
        )
        .detail("combo_items", self.required.clone())
        .detail("found_items", names)
        .detail("individual_total_cents", individual.cents())
        .detail("combo_price_cents", self.bundle_price.cents())
    }

    fn not_applicable_reason(&self, ctx: &OrderContext<'_>) -> String {
        let names: Vec<&str> = self
            .matched(ctx.items)
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        format!("Missing combo items. Found: [{}]", names.join(", "))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CustomerAttributes;
    use chrono::NaiveDate;

    /// Wednesday 2024-03-06 at the given time.
    fn wednesday(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 6)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn ctx<'a>(
        total: i64,
        items: &'a [LineItem],
        customer: Option<&'a CustomerAttributes>,
    ) -> OrderContext<'a> {
        OrderContext::new(Money::from_cents(total), items, customer, wednesday(12, 0))
    }

    #[test]
    fn test_percentage_with_minimum() {
        let rule = PercentageOff::new("Student", Rate::from_percent(15)).min_order(Money::from_cents(1000));

        let outcome = rule.evaluate(&ctx(2000, &[], None));
        assert!(outcome.applicable);
        assert_eq!(outcome.discount_amount.cents(), 300);
        assert_eq!(outcome.reason, "15% discount applied");

        let below = rule.evaluate(&ctx(999, &[], None));
        assert!(!below.applicable);
        assert!(below.reason.contains("below"));
    }

    #[test]
    fn test_percentage_cap() {
        let rule = PercentageOff::new("Student", Rate::from_percent(15))
            .min_order(Money::from_cents(1000))
            .max_discount(Money::from_cents(500));

        // 15% of $50 = $7.50, capped at $5.00
        assert_eq!(rule.evaluate(&ctx(5000, &[], None)).discount_amount.cents(), 500);
        assert_eq!(rule.description(), "15% off");
    }

    #[test]
    fn test_fixed_amount() {
        let rule = FixedOff::new("First Order", Money::from_cents(300)).min_order(Money::from_cents(1500));

        assert_eq!(rule.evaluate(&ctx(1500, &[], None)).discount_amount.cents(), 300);
        assert!(!rule.evaluate(&ctx(1499, &[], None)).applicable);

        let no_min = FixedOff::new("Tiny", Money::from_cents(300));
        assert_eq!(no_min.evaluate(&ctx(200, &[], None)).discount_amount.cents(), 200);
        assert_eq!(no_min.description(), "$3.00 off");
    }

    #[test]
    fn test_bogo_two_lines_same_name() {
        let rule = BuyOneGetOne::new("Fries BOGO", ["French Fries"], Rate::from_percent(50));
        let items = vec![
            LineItem::new("French Fries", 1, Money::from_cents(249)),
            LineItem::new("French Fries", 1, Money::from_cents(249)),
        ];

        let outcome = rule.evaluate(&ctx(498, &items, None));
        assert!(outcome.applicable);
        // $1.245 rounds to $1.25
        assert_eq!(outcome.discount_amount.cents(), 125);
        assert_eq!(outcome.details["bogo_details"][0]["free_items"], 1);
    }

    #[test]
    fn test_bogo_requires_exact_name_and_pair() {
        let rule = BuyOneGetOne::new("Fries BOGO", ["French Fries"], Rate::from_percent(100));

        let single = vec![LineItem::new("French Fries", 1, Money::from_cents(249))];
        assert!(!rule.evaluate(&ctx(249, &single, None)).applicable);

        let sized = vec![LineItem::new("French Fries (Large)", 2, Money::from_cents(299))];
        assert!(!rule.evaluate(&ctx(598, &sized, None)).applicable);

        // Three units: one free
        let three = vec![LineItem::new("French Fries", 3, Money::from_cents(200))];
        assert_eq!(rule.evaluate(&ctx(600, &three, None)).discount_amount.cents(), 200);
    }

    #[test]
    fn test_bogo_uses_last_price_for_name() {
        let rule = BuyOneGetOne::new("Fries BOGO", ["French Fries"], Rate::from_percent(100));
        let items = vec![
            LineItem::new("French Fries", 1, Money::from_cents(199)),
            LineItem::new("French Fries", 1, Money::from_cents(249)),
        ];
        assert_eq!(rule.evaluate(&ctx(448, &items, None)).discount_amount.cents(), 249);
    }

    #[test]
    fn test_time_window() {
        let rule = TimeWindow::new("Happy Hour", Rate::from_percent(20), hm(14, 0), hm(17, 0));

        let inside = OrderContext::new(Money::from_cents(1000), &[], None, wednesday(15, 0));
        let outcome = rule.evaluate(&inside);
        assert!(outcome.applicable);
        assert_eq!(outcome.discount_amount.cents(), 200);
        assert_eq!(outcome.details["time_period"], "14:00 - 17:00");

        let outside = OrderContext::new(Money::from_cents(1000), &[], None, wednesday(20, 0));
        assert!(!rule.evaluate(&outside).applicable);

        assert!(rule.in_window(wednesday(14, 0)));
        assert!(rule.in_window(wednesday(17, 0)));
    }

    #[test]
    fn test_time_window_wraps_midnight() {
        let rule = TimeWindow::new("Night Owl", Rate::from_percent(10), hm(22, 0), hm(6, 0));
        assert!(rule.in_window(wednesday(23, 30)));
        assert!(rule.in_window(wednesday(5, 0)));
        assert!(!rule.in_window(wednesday(12, 0)));
    }

    #[test]
    fn test_time_window_weekdays_only() {
        let rule =
            TimeWindow::new("Happy Hour", Rate::from_percent(20), hm(14, 0), hm(17, 0)).weekdays_only();
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        assert!(!rule.in_window(saturday));
        assert!(rule.in_window(wednesday(15, 0)));
    }

    #[test]
    fn test_customer_tier_case_insensitive() {
        let rule = CustomerTier::new("Loyalty")
            .tier("bronze", Rate::from_percent(5))
            .tier("Gold", Rate::from_percent(12));

        let gold = CustomerAttributes::new().with("loyalty_tier", "GOLD");
        let outcome = rule.evaluate(&ctx(1000, &[], Some(&gold)));
        assert!(outcome.applicable);
        assert_eq!(outcome.discount_amount.cents(), 120);
        assert_eq!(outcome.reason, "Gold tier 12% discount");
    }

    #[test]
    fn test_customer_tier_not_applicable_reasons() {
        let rule = CustomerTier::new("Loyalty").tier("gold", Rate::from_percent(12));

        let none = rule.evaluate(&ctx(1000, &[], None));
        assert_eq!(none.reason, "No customer data provided");

        let no_tier = CustomerAttributes::new().with("customer_type", "student");
        assert_eq!(
            rule.evaluate(&ctx(1000, &[], Some(&no_tier))).reason,
            "Customer has no loyalty tier"
        );

        let diamond = CustomerAttributes::new().with("loyalty_tier", "Diamond");
        assert_eq!(
            rule.evaluate(&ctx(1000, &[], Some(&diamond))).reason,
            "No discount for tier: diamond"
        );
    }

    #[test]
    fn test_combo_bundle() {
        let rule = ComboBundle::new(
            "Big Mac Combo",
            ["Big Mac", "French Fries", "Coca-Cola"],
            Money::from_cents(899),
        );
        let items = vec![
            LineItem::new("Big Mac", 1, Money::from_cents(499)),
            LineItem::new("French Fries (Medium)", 1, Money::from_cents(249)),
            LineItem::new("Coca-Cola", 1, Money::from_cents(179)),
        ];

        // 4.99 + 2.49 + 1.79 = 9.27 → 9.27 - 8.99 = 0.28
        let outcome = rule.evaluate(&ctx(927, &items, None));
        assert!(outcome.applicable);
        assert_eq!(outcome.discount_amount.cents(), 28);
        assert_eq!(outcome.details["found_items"][1], "French Fries (Medium)");
    }

    #[test]
    fn test_combo_missing_item_and_floor() {
        let rule = ComboBundle::new("Combo", ["big mac", "coca-cola"], Money::from_cents(899));

        let partial = vec![LineItem::new("Big Mac", 1, Money::from_cents(499))];
        let outcome = rule.evaluate(&ctx(499, &partial, None));
        assert!(!outcome.applicable);
        assert_eq!(outcome.reason, "Missing combo items. Found: [Big Mac]");

        // Bundle dearer than the parts: applicable, zero saving
        let cheap = vec![
            LineItem::new("Big Mac", 1, Money::from_cents(300)),
            LineItem::new("Coca-Cola", 1, Money::from_cents(100)),
        ];
        let outcome = rule.evaluate(&ctx(400, &cheap, None));
        assert!(outcome.applicable);
        assert!(outcome.discount_amount.is_zero());
    }
}
