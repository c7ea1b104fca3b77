//! # Menu
//!
//! Menu items, their pricing rules and the catalog they live in.
//!
//! ## Item Kinds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       MenuItem { kind, .. }                             │
//! │                                                                         │
//! │  Burger     base + $1.50/extra patty + $0.50 cheese, × size (S 90%,    │
//! │             L 120%)                                                    │
//! │  Fries      by size: $1.99 / $2.49 / $2.99 / $3.49                     │
//! │             + $0.75 premium seasoning (truffle, parmesan, cajun)       │
//! │  Drink      by size: $1.49 / $1.79 / $2.09 / $2.39                     │
//! │             + $1.00 when hot and caffeinated                           │
//! │  Breakfast  base + $1.00 egg + $1.50 sausage, served until 10:30       │
//! │  Standard   base price                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{LineItem, Rate};
use crate::validation::{validate_item_name, validate_price_cents, validate_quantity};

/// Breakfast items are sold up to and including this time.
pub const BREAKFAST_ENDS: (u32, u32) = (10, 30);

const EXTRA_PATTY_CENTS: i64 = 150;
const CHEESE_CENTS: i64 = 50;
const PREMIUM_SEASONING_CENTS: i64 = 75;
const HOT_CAFFEINE_CENTS: i64 = 100;
const EGG_CENTS: i64 = 100;
const SAUSAGE_CENTS: i64 = 150;

const PREMIUM_SEASONINGS: [&str; 3] = ["truffle", "parmesan", "cajun"];

// =============================================================================
// Category & Size
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    Burgers,
    Chicken,
    Sides,
    Drinks,
    Desserts,
    Breakfast,
    Cafe,
    HappyMeal,
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MenuCategory::Burgers => "burgers",
            MenuCategory::Chicken => "chicken",
            MenuCategory::Sides => "sides",
            MenuCategory::Drinks => "drinks",
            MenuCategory::Desserts => "desserts",
            MenuCategory::Breakfast => "breakfast",
            MenuCategory::Cafe => "cafe",
            MenuCategory::HappyMeal => "happy_meal",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSize {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
}

impl ItemSize {
    /// Display label used in generated item names ("French Fries (Large)").
    pub fn label(&self) -> &'static str {
        match self {
            ItemSize::Small => "Small",
            ItemSize::Medium => "Medium",
            ItemSize::Large => "Large",
            ItemSize::ExtraLarge => "Extra Large",
        }
    }

    /// Calorie multiplier relative to a medium.
    fn calorie_rate(&self) -> Rate {
        match self {
            ItemSize::Small => Rate::from_percent(80),
            ItemSize::Medium => Rate::from_percent(100),
            ItemSize::Large => Rate::from_percent(130),
            ItemSize::ExtraLarge => Rate::from_percent(160),
        }
    }

    /// Burger price multiplier. Extra large has no burger variant.
    fn burger_rate(&self) -> Rate {
        match self {
            ItemSize::Small => Rate::from_percent(90),
            ItemSize::Large => Rate::from_percent(120),
            ItemSize::Medium | ItemSize::ExtraLarge => Rate::from_percent(100),
        }
    }

    fn fries_price(&self) -> Money {
        Money::from_cents(match self {
            ItemSize::Small => 199,
            ItemSize::Medium => 249,
            ItemSize::Large => 299,
            ItemSize::ExtraLarge => 349,
        })
    }

    fn drink_price(&self) -> Money {
        Money::from_cents(match self {
            ItemSize::Small => 149,
            ItemSize::Medium => 179,
            ItemSize::Large => 209,
            ItemSize::ExtraLarge => 239,
        })
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// What makes an item price and prepare differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MenuItemKind {
    Burger {
        patty_count: u32,
        has_cheese: bool,
        signature: bool,
    },
    Fries {
        size: ItemSize,
        seasoning: String,
    },
    Drink {
        size: ItemSize,
        is_hot: bool,
        has_caffeine: bool,
    },
    Breakfast {
        has_egg: bool,
        has_sausage: bool,
    },
    Standard,
}

/// A sellable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    name: String,
    category: MenuCategory,
    base_price: Money,
    calories: u32,
    ingredients: Vec<String>,
    available: bool,
    kind: MenuItemKind,
}

impl MenuItem {
    /// Creates a plain item priced at `base_price`.
    pub fn new(
        name: impl Into<String>,
        category: MenuCategory,
        base_price: Money,
        calories: u32,
    ) -> CoreResult<Self> {
        Self::build(name.into(), category, base_price, calories, MenuItemKind::Standard)
    }

    pub fn burger(
        name: impl Into<String>,
        base_price: Money,
        calories: u32,
        patty_count: u32,
        has_cheese: bool,
    ) -> CoreResult<Self> {
        if patty_count == 0 {
            return Err(ValidationError::MustBePositive {
                field: "patty_count".to_string(),
            }
            .into());
        }
        Self::build(
            name.into(),
            MenuCategory::Burgers,
            base_price,
            calories,
            MenuItemKind::Burger {
                patty_count,
                has_cheese,
                signature: false,
            },
        )
    }

    /// Fries are named and priced by size.
    pub fn fries(size: ItemSize, seasoning: impl Into<String>) -> CoreResult<Self> {
        let seasoning = seasoning.into();
        let mut item = Self::build(
            format!("French Fries ({})", size.label()),
            MenuCategory::Sides,
            size.fries_price(),
            320,
            MenuItemKind::Fries {
                size,
                seasoning: seasoning.clone(),
            },
        )?;
        item.ingredients = vec!["potato".into(), "vegetable oil".into(), seasoning];
        Ok(item)
    }

    /// Drinks are priced by size; hot drinks land in the cafe category.
    pub fn drink(name: impl Into<String>, size: ItemSize, is_hot: bool, has_caffeine: bool) -> CoreResult<Self> {
        let category = if is_hot {
            MenuCategory::Cafe
        } else {
            MenuCategory::Drinks
        };
        Self::build(
            name.into(),
            category,
            size.drink_price(),
            150,
            MenuItemKind::Drink {
                size,
                is_hot,
                has_caffeine,
            },
        )
    }

    pub fn breakfast(
        name: impl Into<String>,
        base_price: Money,
        calories: u32,
        has_egg: bool,
        has_sausage: bool,
    ) -> CoreResult<Self> {
        Self::build(
            name.into(),
            MenuCategory::Breakfast,
            base_price,
            calories,
            MenuItemKind::Breakfast {
                has_egg,
                has_sausage,
            },
        )
    }

    /// The classic two-patty Big Mac at $4.99.
    pub fn big_mac() -> CoreResult<Self> {
        let mut item = Self::new("Big Mac", MenuCategory::Burgers, Money::from_cents(499), 550)?;
        item.ingredients = [
            "special sauce",
            "lettuce",
            "cheese",
            "pickles",
            "onions",
            "sesame seed bun",
            "beef patty",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        Ok(item)
    }

    pub fn coca_cola(size: ItemSize) -> CoreResult<Self> {
        let mut item = Self::drink("Coca-Cola", size, false, true)?;
        item.ingredients = vec!["coca-cola syrup".into(), "carbonated water".into()];
        Ok(item)
    }

    pub fn cafe_coffee(style: &str, size: ItemSize) -> CoreResult<Self> {
        let mut item = Self::drink(format!("Cafe {}", style), size, true, true)?;
        item.ingredients = vec!["espresso".into(), "milk".into()];
        if style.eq_ignore_ascii_case("cappuccino") {
            item.ingredients.push("foam".into());
        }
        Ok(item)
    }

    pub fn happy_meal(main: &str, drink: &str) -> CoreResult<Self> {
        let mut item = Self::new(
            format!("Happy Meal ({})", main),
            MenuCategory::HappyMeal,
            Money::from_cents(399),
            400,
        )?;
        item.ingredients = vec![main.to_string(), drink.to_string(), "apple slices".into(), "toy".into()];
        Ok(item)
    }

    fn build(
        name: String,
        category: MenuCategory,
        base_price: Money,
        calories: u32,
        kind: MenuItemKind,
    ) -> CoreResult<Self> {
        validate_item_name(&name)?;
        validate_price_cents(base_price.cents())?;
        Ok(MenuItem {
            name: name.trim().to_string(),
            category,
            base_price,
            calories,
            ingredients: Vec::new(),
            available: true,
            kind,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> MenuCategory {
        self.category
    }

    pub fn base_price(&self) -> Money {
        self.base_price
    }

    pub fn kind(&self) -> &MenuItemKind {
        &self.kind
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn is_breakfast(&self) -> bool {
        matches!(self.kind, MenuItemKind::Breakfast { .. })
    }

    /// Whether the item can be sold at `time` (breakfast closes at 10:30).
    pub fn is_available_at(&self, time: NaiveTime) -> bool {
        if !self.available {
            return false;
        }
        if self.is_breakfast() {
            let (h, m) = BREAKFAST_ENDS;
            return NaiveTime::from_hms_opt(h, m, 0).map_or(false, |end| time <= end);
        }
        true
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn set_base_price(&mut self, price: Money) -> CoreResult<()> {
        validate_price_cents(price.cents())?;
        self.base_price = price;
        Ok(())
    }

    pub fn add_ingredient(&mut self, ingredient: impl Into<String>) {
        self.ingredients.push(ingredient.into());
    }

    /// Removes an ingredient; returns whether it was present.
    pub fn remove_ingredient(&mut self, ingredient: &str) -> bool {
        let before = self.ingredients.len();
        self.ingredients.retain(|i| i != ingredient);
        before != self.ingredients.len()
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// Selling price. `size` only affects burgers; fries and drinks carry
    /// their own size.
    ///
    /// ## Example
    /// ```rust
    /// use quickserve_core::menu::{ItemSize, MenuItem};
    /// use quickserve_core::Money;
    ///
    /// let burger = MenuItem::burger("Double", Money::from_cents(300), 600, 2, true).unwrap();
    /// // $3.00 + $1.50 patty + $0.50 cheese = $5.00, large × 120%
    /// assert_eq!(burger.final_price(ItemSize::Large).cents(), 600);
    /// ```
    pub fn final_price(&self, size: ItemSize) -> Money {
        match &self.kind {
            MenuItemKind::Burger {
                patty_count,
                has_cheese,
                ..
            } => {
                let mut price = self.base_price;
                price += Money::from_cents(EXTRA_PATTY_CENTS).multiply_quantity(*patty_count as i64 - 1);
                if *has_cheese {
                    price += Money::from_cents(CHEESE_CENTS);
                }
                price.percent_of(size.burger_rate())
            }
            MenuItemKind::Fries { seasoning, .. } => {
                let premium = PREMIUM_SEASONINGS.contains(&seasoning.to_lowercase().as_str());
                if premium {
                    self.base_price + Money::from_cents(PREMIUM_SEASONING_CENTS)
                } else {
                    self.base_price
                }
            }
            MenuItemKind::Drink {
                is_hot,
                has_caffeine,
                ..
            } => {
                if *is_hot && *has_caffeine {
                    self.base_price + Money::from_cents(HOT_CAFFEINE_CENTS)
                } else {
                    self.base_price
                }
            }
            MenuItemKind::Breakfast {
                has_egg,
                has_sausage,
            } => {
                let mut price = self.base_price;
                if *has_egg {
                    price += Money::from_cents(EGG_CENTS);
                }
                if *has_sausage {
                    price += Money::from_cents(SAUSAGE_CENTS);
                }
                price
            }
            MenuItemKind::Standard => self.base_price,
        }
    }

    /// Calories for the given size (medium is the reference).
    pub fn calories(&self, size: ItemSize) -> u32 {
        let scaled = self.calories as u64 * size.calorie_rate().bps() as u64;
        ((scaled + 5_000) / 10_000) as u32
    }

    /// Minutes the kitchen needs for one unit.
    pub fn preparation_minutes(&self) -> u32 {
        match &self.kind {
            MenuItemKind::Burger {
                patty_count,
                signature,
                ..
            } => 5 + (patty_count - 1) * 2 + if *signature { 2 } else { 0 },
            MenuItemKind::Fries { .. } => 3,
            MenuItemKind::Drink { is_hot, .. } => {
                if *is_hot {
                    5
                } else {
                    2
                }
            }
            MenuItemKind::Breakfast { .. } => 7,
            MenuItemKind::Standard => 5,
        }
    }

    /// Burger upgrade: adds a patty.
    pub fn add_extra_patty(&mut self) -> bool {
        match &mut self.kind {
            MenuItemKind::Burger { patty_count, .. } => {
                *patty_count += 1;
                true
            }
            _ => false,
        }
    }

    /// Burger upgrade: signature recipe, +$2.00 and two more minutes.
    pub fn make_signature(&mut self) -> bool {
        match &mut self.kind {
            MenuItemKind::Burger { signature, .. } if !*signature => {
                *signature = true;
                self.base_price += Money::from_cents(200);
                true
            }
            _ => false,
        }
    }

    /// Fries upgrade to a larger size; smaller or equal sizes are ignored.
    pub fn upgrade_size(&mut self, new_size: ItemSize) -> bool {
        let current = match &self.kind {
            MenuItemKind::Fries { size, .. } | MenuItemKind::Drink { size, .. } => *size,
            _ => return false,
        };
        if new_size <= current {
            return false;
        }

        match &mut self.kind {
            MenuItemKind::Fries { size, .. } => {
                *size = new_size;
                self.name = format!("French Fries ({})", new_size.label());
                self.base_price = new_size.fries_price();
            }
            MenuItemKind::Drink { size, .. } => {
                *size = new_size;
                self.base_price = new_size.drink_price();
            }
            _ => return false,
        }
        true
    }

    /// Price after a percentage markdown (0-100%).
    pub fn discounted_price(&self, size: ItemSize, discount: Rate) -> CoreResult<Money> {
        if discount.bps() > 10_000 {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: 100,
            }
            .into());
        }
        let price = self.final_price(size);
        Ok(price - price.percent_of(discount))
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.name, self.base_price, self.category)
    }
}

// =============================================================================
// Menu Catalog
// =============================================================================

/// The restaurant's catalog. Item names are unique, case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small starter menu used by the demo and tests.
    pub fn classic() -> CoreResult<Self> {
        let mut menu = Menu::new();
        menu.add(MenuItem::big_mac()?)?;
        menu.add(MenuItem::burger("Quarter Pounder", Money::from_cents(429), 520, 1, true)?)?;
        menu.add(MenuItem::new("McChicken", MenuCategory::Chicken, Money::from_cents(399), 400)?)?;
        menu.add(MenuItem::new(
            "Chicken Nuggets (10 pc)",
            MenuCategory::Chicken,
            Money::from_cents(549),
            420,
        )?)?;
        for size in [ItemSize::Small, ItemSize::Medium, ItemSize::Large] {
            menu.add(MenuItem::fries(size, "salt")?)?;
        }
        menu.add(MenuItem::coca_cola(ItemSize::Medium)?)?;
        menu.add(MenuItem::cafe_coffee("Latte", ItemSize::Medium)?)?;
        menu.add(MenuItem::new("Apple Pie", MenuCategory::Desserts, Money::from_cents(149), 230)?)?;
        menu.add(MenuItem::breakfast(
            "Egg McMuffin",
            Money::from_cents(299),
            310,
            true,
            false,
        )?)?;
        menu.add(MenuItem::happy_meal("Hamburger", "Apple Juice")?)?;
        Ok(menu)
    }

    /// Adds an item; duplicate names are rejected.
    pub fn add(&mut self, item: MenuItem) -> CoreResult<()> {
        if self.find(item.name()).is_some() {
            return Err(ValidationError::Duplicate {
                field: "menu item".to_string(),
                value: item.name().to_string(),
            }
            .into());
        }
        self.items.push(item);
        Ok(())
    }

    /// Case-insensitive lookup.
    pub fn find(&self, name: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut MenuItem> {
        self.items.iter_mut().find(|i| i.name.eq_ignore_ascii_case(name))
    }

    pub fn by_category(&self, category: MenuCategory) -> Vec<&MenuItem> {
        self.items.iter().filter(|i| i.category == category).collect()
    }

    /// Items that can be sold at `time`.
    pub fn available_at(&self, time: NaiveTime) -> Vec<&MenuItem> {
        self.items.iter().filter(|i| i.is_available_at(time)).collect()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Prices `quantity` of an item into an order line, checking availability.
    pub fn line_item(&self, name: &str, size: ItemSize, quantity: i64, at: NaiveTime) -> CoreResult<LineItem> {
        validate_quantity(quantity)?;
        let item = self
            .find(name)
            .ok_or_else(|| CoreError::MenuItemNotFound(name.to_string()))?;
        if !item.is_available_at(at) {
            return Err(CoreError::ItemUnavailable(item.name.clone()));
        }
        Ok(LineItem::new(item.name.clone(), quantity, item.final_price(size)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
