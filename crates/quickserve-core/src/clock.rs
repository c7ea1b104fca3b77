//! # Clock
//!
//! Time source for everything time-sensitive (discount validity windows,
//! happy hour, breakfast cut-off, order timestamps).
//!
//! Production code uses [`SystemClock`]; tests and demos pin time with
//! [`FixedClock`] so a "happy hour" rule can be checked at 15:00 and 20:00
//! without waiting for either.

use chrono::{Local, NaiveDate, NaiveDateTime};
use std::fmt::Debug;
use std::sync::Arc;

/// Supplies the current local date and time.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> NaiveDateTime;

    /// Today's date according to this clock.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the machine's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    pub const fn new(at: NaiveDateTime) -> Self {
        FixedClock(at)
    }

    /// Convenience constructor; `None` for an impossible date or time.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .map(FixedClock)
    }

    pub fn set(&mut self, at: NaiveDateTime) {
        self.0 = at;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Lets one clock be shared between the resolver and the restaurant context.
impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}
