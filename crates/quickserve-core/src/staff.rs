//! # Staff
//!
//! Employees, their roles, pay and what they are allowed to do.
//!
//! ```text
//! Role             Rate     Access         Refunds
//! ───────────────  ───────  ─────────────  ──────────────
//! Cashier          $16.50   Basic          not allowed
//! Kitchen          $17.00   Intermediate   not allowed
//! ShiftManager     $22.00   Management     up to $50.00
//! GeneralManager   $28.00   Executive      any amount
//! ```
//!
//! Managers inherit the permissions of the roles below them.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::validate_employee_id;

/// Lowest hourly rate anyone may be paid.
pub const MIN_HOURLY_RATE: Money = Money::from_cents(1_000);

/// Largest refund a shift manager may approve.
pub const SHIFT_MANAGER_REFUND_LIMIT: Money = Money::from_cents(5_000);

/// Hours per week before overtime starts.
pub const REGULAR_WEEK_HOURS: u32 = 40;

const EXPERIENCE_BONUS_PER_YEAR: i64 = 50;
const MAX_EXPERIENCE_BONUS: i64 = 500;
const CERTIFICATION_BONUS: Money = Money::from_cents(25);

const CASHIER_PERMISSIONS: &[&str] = &[
    "process_orders",
    "handle_payments",
    "view_menu",
    "print_receipts",
    "handle_coupons",
];

const KITCHEN_PERMISSIONS: &[&str] = &[
    "access_kitchen",
    "view_orders",
    "mark_orders_complete",
    "access_inventory",
    "use_equipment",
];

const MANAGER_PERMISSIONS: &[&str] = &[
    "manage_staff",
    "authorize_refunds",
    "modify_schedules",
    "access_reports",
    "handle_complaints",
    "authorize_discounts",
    "manage_inventory",
    "open_close_restaurant",
    "handle_emergencies",
    "train_employees",
];

const GENERAL_MANAGER_PERMISSIONS: &[&str] = &[
    "hire_employees",
    "terminate_employees",
    "set_salaries",
    "approve_budgets",
    "access_financials",
    "modify_menu_prices",
    "authorize_large_refunds",
    "manage_suppliers",
    "plan_promotions",
    "access_corporate_data",
];

// =============================================================================
// Role & Access
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Basic,
    Intermediate,
    Management,
    Executive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum StaffRole {
    Cashier,
    Kitchen { station: String },
    ShiftManager,
    GeneralManager,
}

impl StaffRole {
    /// Role name without the kitchen station, for grouping.
    pub fn key(&self) -> &'static str {
        match self {
            StaffRole::Cashier => "cashier",
            StaffRole::Kitchen { .. } => "kitchen",
            StaffRole::ShiftManager => "shift_manager",
            StaffRole::GeneralManager => "general_manager",
        }
    }

    pub fn base_rate(&self) -> Money {
        Money::from_cents(match self {
            StaffRole::Cashier => 1_650,
            StaffRole::Kitchen { .. } => 1_700,
            StaffRole::ShiftManager => 2_200,
            StaffRole::GeneralManager => 2_800,
        })
    }

    pub fn access_level(&self) -> AccessLevel {
        match self {
            StaffRole::Cashier => AccessLevel::Basic,
            StaffRole::Kitchen { .. } => AccessLevel::Intermediate,
            StaffRole::ShiftManager => AccessLevel::Management,
            StaffRole::GeneralManager => AccessLevel::Executive,
        }
    }

    /// Every permission the role holds, lower roles' permissions first.
    pub fn permissions(&self) -> Vec<&'static str> {
        let mut perms: Vec<&'static str> = Vec::new();
        match self {
            StaffRole::Cashier => perms.extend(CASHIER_PERMISSIONS),
            StaffRole::Kitchen { station } => {
                perms.extend(KITCHEN_PERMISSIONS);
                match station.as_str() {
                    "grill" => perms.extend(["operate_grill", "cook_meat"]),
                    "fryer" => perms.extend(["operate_fryer", "cook_fries"]),
                    "assembly" => perms.extend(["assemble_burgers", "package_orders"]),
                    _ => {}
                }
            }
            StaffRole::ShiftManager => {
                perms.extend(CASHIER_PERMISSIONS);
                perms.extend(MANAGER_PERMISSIONS);
            }
            StaffRole::GeneralManager => {
                perms.extend(CASHIER_PERMISSIONS);
                perms.extend(MANAGER_PERMISSIONS);
                perms.extend(GENERAL_MANAGER_PERMISSIONS);
            }
        }
        perms
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffRole::Cashier => f.write_str("cashier"),
            StaffRole::Kitchen { station } => write!(f, "kitchen ({})", station),
            StaffRole::ShiftManager => f.write_str("shift_manager"),
            StaffRole::GeneralManager => f.write_str("general_manager"),
        }
    }
}

// =============================================================================
// Pay
// =============================================================================

/// One week's pay breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyPay {
    pub regular_hours: u32,
    pub overtime_hours: u32,
    pub regular_pay: Money,
    pub overtime_pay: Money,
    pub total: Money,
}

// =============================================================================
// Employee
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    id: String,
    name: String,
    role: StaffRole,
    hourly_rate: Money,
    active: bool,
    certifications: Vec<String>,
}

impl Employee {
    pub fn new(id: &str, name: &str, role: StaffRole) -> CoreResult<Self> {
        validate_employee_id(id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            }
            .into());
        }
        Ok(Employee {
            id: id.to_string(),
            name: name.to_string(),
            hourly_rate: role.base_rate(),
            role,
            active: true,
            certifications: Vec::new(),
        })
    }

    /// Experienced hire: $0.50 per year on top of the base rate, at most $5.00.
    pub fn transfer(id: &str, name: &str, role: StaffRole, experience_years: u32) -> CoreResult<Self> {
        let mut employee = Self::new(id, name, role)?;
        let bonus = (experience_years as i64 * EXPERIENCE_BONUS_PER_YEAR).min(MAX_EXPERIENCE_BONUS);
        employee.hourly_rate += Money::from_cents(bonus);
        Ok(employee)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> &StaffRole {
        &self.role
    }

    pub fn hourly_rate(&self) -> Money {
        self.hourly_rate
    }

    pub fn access_level(&self) -> AccessLevel {
        self.role.access_level()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn certifications(&self) -> &[String] {
        &self.certifications
    }

    pub fn set_hourly_rate(&mut self, rate: Money) -> CoreResult<()> {
        if rate < MIN_HOURLY_RATE {
            return Err(ValidationError::OutOfRange {
                field: "hourly_rate".to_string(),
                min: MIN_HOURLY_RATE.cents(),
                max: i64::MAX,
            }
            .into());
        }
        info!(employee_id = %self.id, from = %self.hourly_rate, to = %rate, "Hourly rate changed");
        self.hourly_rate = rate;
        Ok(())
    }

    /// From the third certification on, each one adds $0.25/hour.
    pub fn add_certification(&mut self, certification: impl Into<String>) {
        let certification = certification.into();
        if self.certifications.contains(&certification) {
            return;
        }
        self.certifications.push(certification);
        if self.certifications.len() > 2 {
            self.hourly_rate += CERTIFICATION_BONUS;
        }
    }

    /// Moves a cashier up to shift manager at the manager base rate.
    pub fn promote_to_shift_manager(&mut self) -> CoreResult<()> {
        if self.role != StaffRole::Cashier {
            return Err(CoreError::Unauthorized {
                role: self.role.to_string(),
                action: "be promoted to shift manager".to_string(),
            });
        }
        self.role = StaffRole::ShiftManager;
        self.hourly_rate = self.hourly_rate.max(StaffRole::ShiftManager.base_rate());
        info!(employee_id = %self.id, "Promoted to shift manager");
        Ok(())
    }

    pub fn permissions(&self) -> Vec<&'static str> {
        self.role.permissions()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.role.permissions().iter().any(|p| *p == permission)
    }

    /// Pay for `hours` worked in a week; hours past 40 pay 1.5×.
    pub fn weekly_pay(&self, hours: u32) -> WeeklyPay {
        let regular_hours = hours.min(REGULAR_WEEK_HOURS);
        let overtime_hours = hours - regular_hours;
        let regular_pay = self.hourly_rate.multiply_quantity(regular_hours as i64);
        let overtime_pay =
            Money::from_bps_product(self.hourly_rate.cents() as i128 * overtime_hours as i128 * 15_000);
        WeeklyPay {
            regular_hours,
            overtime_hours,
            regular_pay,
            overtime_pay,
            total: regular_pay + overtime_pay,
        }
    }

    /// Checks whether this employee may approve a refund of `amount`.
    pub fn authorize_refund(&self, amount: Money) -> CoreResult<()> {
        match self.role {
            StaffRole::Cashier | StaffRole::Kitchen { .. } => Err(CoreError::Unauthorized {
                role: self.role.to_string(),
                action: "authorize refunds".to_string(),
            }),
            StaffRole::ShiftManager if amount > SHIFT_MANAGER_REFUND_LIMIT => Err(CoreError::RefundLimitExceeded {
                amount,
                limit: SHIFT_MANAGER_REFUND_LIMIT,
            }),
            StaffRole::ShiftManager | StaffRole::GeneralManager => {
                info!(employee_id = %self.id, amount = %amount, "Refund authorized");
                Ok(())
            }
        }
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({}/hr)", self.name, self.role, self.hourly_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kitchen(station: &str) -> StaffRole {
        StaffRole::Kitchen {
            station: station.to_string(),
        }
    }

    #[test]
    fn test_base_rates_and_access() {
        let cashier = Employee::new("EMP1001", "Alice", StaffRole::Cashier).unwrap();
        assert_eq!(cashier.hourly_rate().cents(), 1_650);
        assert_eq!(cashier.access_level(), AccessLevel::Basic);

        let gm = Employee::new("EMP1002", "Gus", StaffRole::GeneralManager).unwrap();
        assert_eq!(gm.hourly_rate().cents(), 2_800);
        assert!(gm.access_level() > AccessLevel::Management);

        assert!(Employee::new("E1", "Bad", StaffRole::Cashier).is_err());
        assert!(Employee::new("EMP1003", " ", StaffRole::Cashier).is_err());
    }

    #[test]
    fn test_permissions_are_cumulative() {
        let gm = StaffRole::GeneralManager.permissions();
        let sm = StaffRole::ShiftManager.permissions();
        assert!(sm.iter().all(|p| gm.contains(p)));
        assert!(sm.contains(&"process_orders"));
        assert!(gm.contains(&"hire_employees"));
        assert!(!sm.contains(&"hire_employees"));

        let grill = Employee::new("EMP2001", "Kai", kitchen("grill")).unwrap();
        assert!(grill.has_permission("operate_grill"));
        assert!(!grill.has_permission("operate_fryer"));
    }

    #[test]
    fn test_weekly_pay_with_overtime() {
        let cashier = Employee::new("EMP1001", "Alice", StaffRole::Cashier).unwrap();
        let pay = cashier.weekly_pay(45);
        assert_eq!(pay.regular_pay.cents(), 66_000);
        // 5 h × $16.50 × 1.5 = $123.75
        assert_eq!(pay.overtime_pay.cents(), 12_375);
        assert_eq!(pay.total.cents(), 78_375);

        let part_time = cashier.weekly_pay(20);
        assert_eq!(part_time.overtime_hours, 0);
        assert_eq!(part_time.total.cents(), 33_000);
    }

    #[test]
    fn test_refund_authorization() {
        let cashier = Employee::new("EMP1001", "Alice", StaffRole::Cashier).unwrap();
        let cook = Employee::new("EMP1002", "Kai", kitchen("fryer")).unwrap();
        let sm = Employee::new("EMP1003", "Sam", StaffRole::ShiftManager).unwrap();
        let gm = Employee::new("EMP1004", "Gus", StaffRole::GeneralManager).unwrap();
        let small = Money::from_cents(1_500);
        let large = Money::from_cents(7_500);

        assert!(matches!(cashier.authorize_refund(small), Err(CoreError::Unauthorized { .. })));
        assert!(matches!(cook.authorize_refund(small), Err(CoreError::Unauthorized { .. })));
        assert!(sm.authorize_refund(small).is_ok());
        assert!(sm.authorize_refund(SHIFT_MANAGER_REFUND_LIMIT).is_ok());
        assert!(matches!(
            sm.authorize_refund(large),
            Err(CoreError::RefundLimitExceeded { .. })
        ));
        assert!(gm.authorize_refund(large).is_ok());
    }

    #[test]
    fn test_rate_changes() {
        let mut cashier = Employee::transfer("EMP1001", "Alice", StaffRole::Cashier, 3).unwrap();
        assert_eq!(cashier.hourly_rate().cents(), 1_800);

        let veteran = Employee::transfer("EMP1002", "Vet", StaffRole::Cashier, 30).unwrap();
        assert_eq!(veteran.hourly_rate().cents(), 2_150);

        assert!(cashier.set_hourly_rate(Money::from_cents(999)).is_err());
        cashier.set_hourly_rate(Money::from_cents(1_750)).unwrap();

        cashier.add_certification("food safety");
        cashier.add_certification("first aid");
        assert_eq!(cashier.hourly_rate().cents(), 1_750);
        cashier.add_certification("barista");
        cashier.add_certification("barista");
        assert_eq!(cashier.hourly_rate().cents(), 1_775);
    }

    #[test]
    fn test_promotion() {
        let mut cashier = Employee::new("EMP1001", "Alice", StaffRole::Cashier).unwrap();
        cashier.promote_to_shift_manager().unwrap();
        assert_eq!(cashier.role(), &StaffRole::ShiftManager);
        assert_eq!(cashier.hourly_rate().cents(), 2_200);
        assert!(cashier.promote_to_shift_manager().is_err());
    }
}
