//! Source of the current month.

use chrono::{Datelike, Utc};
use chrono_tz::Tz;

use super::error::FlowError;
use super::types::MonthRef;

/// Supplies the month the flow engine treats as "now".
pub trait Clock: Send + Sync {
    /// Returns the current calendar month.
    fn current_month(&self) -> MonthRef;
}

/// Wall clock evaluated in a fixed time zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    /// Creates a clock for the given time zone.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Creates a clock from an IANA time zone name such as `America/Sao_Paulo`.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTimezone` if the name is unknown.
    pub fn from_name(name: &str) -> Result<Self, FlowError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| FlowError::InvalidTimezone(name.to_string()))
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Clock for SystemClock {
    fn current_month(&self) -> MonthRef {
        let now = Utc::now().with_timezone(&self.tz);
        MonthRef {
            year: now.year(),
            month: now.month(),
        }
    }
}

/// Clock pinned to one month.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub MonthRef);

impl FixedClock {
    /// Pins the clock to `month` of `year`.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidMonth` if `month` is outside 1..=12.
    pub fn at(year: i32, month: u32) -> Result<Self, FlowError> {
        MonthRef::new(year, month).map(Self)
    }
}

impl Clock for FixedClock {
    fn current_month(&self) -> MonthRef {
        self.0
    }
}
