//! Monthly cash-flow engine.
//!
//! Two services operate on a user's per-month [`BudgetEntry`] rows for the current year:
//!
//! - [`FlowReallocator`] carries the planned balance forward from the current month to
//!   year-end and derives the planned status of each month.
//! - [`FlowComparator`] measures the gap between realized and planned balances for the
//!   whole year.
//!
//! Both read and write through a [`BudgetEntryStore`], which the db crate implements.
//! The current month comes from an injected [`Clock`].

pub mod clock;
pub mod comparator;
pub mod error;
pub mod planner;
pub mod reallocator;
pub mod status;
pub mod store;
pub mod types;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use comparator::FlowComparator;
pub use error::{FlowError, StoreError};
pub use planner::{FlowPlanner, NewBudgetEntry};
pub use reallocator::FlowReallocator;
pub use status::{GapMetrics, round2};
pub use store::{BudgetEntryStore, EntryUpdate, PlanChange};
pub use types::{BudgetEntry, FlowStatus, MonthRef};
