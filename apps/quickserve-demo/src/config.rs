//! # Demo Configuration
//!
//! Restaurant settings and the discount rule set.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     QUICKSERVE_TAX_BPS=825                                             │
//! │     QUICKSERVE_ALLOW_STACKING=true                                     │
//! │     QUICKSERVE_RESTAURANT_ID=QS042                                     │
//! │     QUICKSERVE_DEMO_TIME=2024-03-06T15:00:00                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $QUICKSERVE_CONFIG, else                                           │
//! │     ~/.config/quickserve/quickserve.toml (Linux)                       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     8% tax, best-discount mode, the house promotions                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [restaurant]
//! id = "QS001"
//! name = "QuickServe Downtown"
//! tax_bps = 800
//!
//! [discounts]
//! allow_stacking = false
//!
//! [[discounts.rules]]
//! kind = "percentage"
//! name = "Student Discount"
//! percent_bps = 1500
//! min_order_cents = 1000
//! max_discount_cents = 500
//!
//! [[discounts.rules]]
//! kind = "time_window"
//! name = "Happy Hour"
//! percent_bps = 2000
//! start = "14:00"
//! end = "17:00"
//! weekdays_only = true
//!
//! [demo]
//! time = "2024-03-06T15:00:00"
//! ```

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use quickserve_core::discount::{
    BuyOneGetOne, ComboBundle, CustomerTier, DiscountRule, FixedOff, PercentageOff, ResolutionMode,
    TimeWindow,
};
use quickserve_core::validation::{validate_positive, validate_rate_bps};
use quickserve_core::{Money, Rate, DEFAULT_TAX_BPS};

use crate::error::{DemoError, DemoResult};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const TIME_FORMAT: &str = "%H:%M";

// =============================================================================
// Restaurant Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSettings {
    #[serde(default = "default_restaurant_id")]
    pub id: String,

    #[serde(default = "default_restaurant_name")]
    pub name: String,

    /// Sales tax in basis points (800 = 8%).
    #[serde(default = "default_tax_bps")]
    pub tax_bps: u32,

    #[serde(default = "default_max_active_orders")]
    pub max_active_orders: usize,
}

fn default_restaurant_id() -> String {
    "QS001".to_string()
}

fn default_restaurant_name() -> String {
    "QuickServe Downtown".to_string()
}

fn default_tax_bps() -> u32 {
    DEFAULT_TAX_BPS
}

fn default_max_active_orders() -> usize {
    quickserve_core::service::DEFAULT_MAX_ACTIVE_ORDERS
}

impl Default for RestaurantSettings {
    fn default() -> Self {
        RestaurantSettings {
            id: default_restaurant_id(),
            name: default_restaurant_name(),
            tax_bps: default_tax_bps(),
            max_active_orders: default_max_active_orders(),
        }
    }
}

// =============================================================================
// Discount Settings
// =============================================================================

/// One `[[discounts.rules]]` table, tagged by `kind`.
///
/// Dates use `YYYY-MM-DDTHH:MM:SS`, times of day `HH:MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    Percentage {
        name: String,
        percent_bps: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_order_cents: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_discount_cents: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_until: Option<String>,
    },
    FixedAmount {
        name: String,
        amount_cents: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_order_cents: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_until: Option<String>,
    },
    BuyOneGetOne {
        name: String,
        items: Vec<String>,
        percent_bps: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_until: Option<String>,
    },
    TimeWindow {
        name: String,
        percent_bps: u32,
        start: String,
        end: String,
        #[serde(default)]
        weekdays_only: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_until: Option<String>,
    },
    CustomerTier {
        name: String,
        /// Tier name to basis points, e.g. `gold = 1200`.
        tiers: BTreeMap<String, u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_until: Option<String>,
    },
    Combo {
        name: String,
        items: Vec<String>,
        bundle_price_cents: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_until: Option<String>,
    },
}

impl RuleConfig {
    pub fn name(&self) -> &str {
        match self {
            RuleConfig::Percentage { name, .. }
            | RuleConfig::FixedAmount { name, .. }
            | RuleConfig::BuyOneGetOne { name, .. }
            | RuleConfig::TimeWindow { name, .. }
            | RuleConfig::CustomerTier { name, .. }
            | RuleConfig::Combo { name, .. } => name,
        }
    }

    /// Builds the resolver rule this table describes.
    pub fn build(&self) -> DemoResult<Box<dyn DiscountRule>> {
        let rule: Box<dyn DiscountRule> = match self {
            RuleConfig::Percentage {
                name,
                percent_bps,
                min_order_cents,
                max_discount_cents,
                valid_from,
                valid_until,
            } => {
                validate_rate_bps("percent_bps", *percent_bps).map_err(core_err)?;
                let mut rule = PercentageOff::new(name.as_str(), Rate::from_bps(*percent_bps)).valid_between(
                    parse_datetime("valid_from", valid_from.as_deref())?,
                    parse_datetime("valid_until", valid_until.as_deref())?,
                );
                if let Some(min) = min_order_cents {
                    rule = rule.min_order(Money::from_cents(*min));
                }
                if let Some(max) = max_discount_cents {
                    validate_positive("max_discount_cents", *max).map_err(core_err)?;
                    rule = rule.max_discount(Money::from_cents(*max));
                }
                Box::new(rule)
            }
            RuleConfig::FixedAmount {
                name,
                amount_cents,
                min_order_cents,
                valid_from,
                valid_until,
            } => {
                validate_positive("amount_cents", *amount_cents).map_err(core_err)?;
                let mut rule = FixedOff::new(name.as_str(), Money::from_cents(*amount_cents)).valid_between(
                    parse_datetime("valid_from", valid_from.as_deref())?,
                    parse_datetime("valid_until", valid_until.as_deref())?,
                );
                if let Some(min) = min_order_cents {
                    rule = rule.min_order(Money::from_cents(*min));
                }
                Box::new(rule)
            }
            RuleConfig::BuyOneGetOne {
                name,
                items,
                percent_bps,
                valid_from,
                valid_until,
            } => {
                validate_rate_bps("percent_bps", *percent_bps).map_err(core_err)?;
                Box::new(
                    BuyOneGetOne::new(name.as_str(), items.iter().map(String::as_str), Rate::from_bps(*percent_bps))
                        .valid_between(
                            parse_datetime("valid_from", valid_from.as_deref())?,
                            parse_datetime("valid_until", valid_until.as_deref())?,
                        ),
                )
            }
            RuleConfig::TimeWindow {
                name,
                percent_bps,
                start,
                end,
                weekdays_only,
                valid_from,
                valid_until,
            } => {
                validate_rate_bps("percent_bps", *percent_bps).map_err(core_err)?;
                let mut rule = TimeWindow::new(
                    name.as_str(),
                    Rate::from_bps(*percent_bps),
                    parse_time("start", start)?,
                    parse_time("end", end)?,
                )
                .valid_between(
                    parse_datetime("valid_from", valid_from.as_deref())?,
                    parse_datetime("valid_until", valid_until.as_deref())?,
                );
                if *weekdays_only {
                    rule = rule.weekdays_only();
                }
                Box::new(rule)
            }
            RuleConfig::CustomerTier {
                name,
                tiers,
                valid_from,
                valid_until,
            } => {
                let mut rule = CustomerTier::new(name.as_str()).valid_between(
                    parse_datetime("valid_from", valid_from.as_deref())?,
                    parse_datetime("valid_until", valid_until.as_deref())?,
                );
                for (tier, bps) in tiers {
                    validate_rate_bps(tier, *bps).map_err(core_err)?;
                    rule = rule.tier(tier, Rate::from_bps(*bps));
                }
                Box::new(rule)
            }
            RuleConfig::Combo {
                name,
                items,
                bundle_price_cents,
                valid_from,
                valid_until,
            } => {
                validate_positive("bundle_price_cents", *bundle_price_cents).map_err(core_err)?;
                Box::new(
                    ComboBundle::new(
                        name.as_str(),
                        items.iter().map(String::as_str),
                        Money::from_cents(*bundle_price_cents),
                    )
                    .valid_between(
                        parse_datetime("valid_from", valid_from.as_deref())?,
                        parse_datetime("valid_until", valid_until.as_deref())?,
                    ),
                )
            }
        };
        Ok(rule)
    }
}

fn core_err(err: quickserve_core::ValidationError) -> DemoError {
    DemoError::Core(err.into())
}

fn parse_datetime(key: &str, value: Option<&str>) -> DemoResult<Option<NaiveDateTime>> {
    value
        .map(|v| {
            NaiveDateTime::parse_from_str(v, DATETIME_FORMAT).map_err(|_| DemoError::InvalidValue {
                key: key.to_string(),
                value: v.to_string(),
            })
        })
        .transpose()
}

fn parse_time(key: &str, value: &str) -> DemoResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| DemoError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// The house promotions used when the config file names none.
pub fn default_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig::Percentage {
            name: "Student Discount".into(),
            percent_bps: 1_500,
            min_order_cents: Some(1_000),
            max_discount_cents: Some(500),
            valid_from: None,
            valid_until: None,
        },
        RuleConfig::FixedAmount {
            name: "First Order Special".into(),
            amount_cents: 300,
            min_order_cents: Some(1_500),
            valid_from: None,
            valid_until: None,
        },
        RuleConfig::BuyOneGetOne {
            name: "Fries BOGO".into(),
            items: vec!["French Fries (Medium)".into(), "French Fries (Large)".into()],
            percent_bps: 5_000,
            valid_from: None,
            valid_until: None,
        },
        RuleConfig::TimeWindow {
            name: "Happy Hour".into(),
            percent_bps: 2_000,
            start: "14:00".into(),
            end: "17:00".into(),
            weekdays_only: true,
            valid_from: None,
            valid_until: None,
        },
        RuleConfig::CustomerTier {
            name: "Loyalty Tiers".into(),
            tiers: BTreeMap::from([
                ("bronze".to_string(), 500),
                ("silver".to_string(), 800),
                ("gold".to_string(), 1_200),
                ("platinum".to_string(), 1_500),
            ]),
            valid_from: None,
            valid_until: None,
        },
        RuleConfig::Combo {
            name: "Big Mac Combo".into(),
            items: vec!["Big Mac".into(), "French Fries".into(), "Coca-Cola".into()],
            bundle_price_cents: 899,
            valid_from: None,
            valid_until: None,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountSettings {
    /// Grant every applicable discount instead of only the best one.
    #[serde(default)]
    pub allow_stacking: bool,

    #[serde(default = "default_rules")]
    pub rules: Vec<RuleConfig>,
}

impl Default for DiscountSettings {
    fn default() -> Self {
        DiscountSettings {
            allow_stacking: false,
            rules: default_rules(),
        }
    }
}

impl DiscountSettings {
    pub fn mode(&self) -> ResolutionMode {
        if self.allow_stacking {
            ResolutionMode::Stacked
        } else {
            ResolutionMode::Best
        }
    }
}

// =============================================================================
// Demo Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemoSettings {
    /// Fixed wall-clock time for the run; the system clock when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub restaurant: RestaurantSettings,

    #[serde(default)]
    pub discounts: DiscountSettings,

    #[serde(default)]
    pub demo: DemoSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (quickserve.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> DemoResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> DemoResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(DemoError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Checks settings and builds every rule once.
    pub fn validate(&self) -> DemoResult<()> {
        if self.restaurant.id.trim().is_empty() {
            return Err(DemoError::InvalidConfig("restaurant.id must not be empty".into()));
        }
        validate_rate_bps("tax_bps", self.restaurant.tax_bps).map_err(core_err)?;
        if self.restaurant.max_active_orders == 0 {
            return Err(DemoError::InvalidConfig(
                "max_active_orders must be greater than 0".into(),
            ));
        }
        self.demo_time()?;
        self.build_rules()?;
        Ok(())
    }

    /// Applies `QUICKSERVE_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> DemoResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup("QUICKSERVE_RESTAURANT_ID") {
            debug!(restaurant_id = %id, "Overriding restaurant id from environment");
            self.restaurant.id = id;
        }

        if let Some(tax) = lookup("QUICKSERVE_TAX_BPS") {
            self.restaurant.tax_bps = tax.parse().map_err(|_| DemoError::InvalidValue {
                key: "QUICKSERVE_TAX_BPS".into(),
                value: tax.clone(),
            })?;
        }

        if let Some(stacking) = lookup("QUICKSERVE_ALLOW_STACKING") {
            match stacking.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.discounts.allow_stacking = true,
                "0" | "false" | "no" => self.discounts.allow_stacking = false,
                _ => warn!(value = %stacking, "Unknown QUICKSERVE_ALLOW_STACKING value"),
            }
        }

        if let Some(time) = lookup("QUICKSERVE_DEMO_TIME") {
            debug!(time = %time, "Overriding demo time from environment");
            self.demo.time = Some(time);
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "quickserve", "demo")
            .map(|dirs| dirs.config_dir().join("quickserve.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn tax_rate(&self) -> Rate {
        Rate::from_bps(self.restaurant.tax_bps)
    }

    pub fn demo_time(&self) -> DemoResult<Option<NaiveDateTime>> {
        parse_datetime("demo.time", self.demo.time.as_deref())
    }

    pub fn build_rules(&self) -> DemoResult<Vec<Box<dyn DiscountRule>>> {
        self.discounts.rules.iter().map(RuleConfig::build).collect()
    }
}
