//! Persistence seam for budget entries.

use std::future::Future;

use rust_decimal::Decimal;

use super::error::StoreError;
use super::status::GapMetrics;
use super::types::{BudgetEntry, FlowStatus, MonthRef};

/// New planned amounts for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanChange {
    /// Month being edited.
    pub period: MonthRef,
    /// Planned income; `None` clears it.
    pub income: Option<Decimal>,
    /// Planned expense; `None` clears it.
    pub expense: Option<Decimal>,
}

impl PlanChange {
    /// Copies the new amounts onto `entry` when it is the edited month.
    pub fn apply_to(&self, entry: &mut BudgetEntry) {
        if entry.period() == self.period {
            entry.planned_income = self.income;
            entry.planned_expense = self.expense;
        }
    }
}

/// A single row change written by [`BudgetEntryStore::update_many`].
///
/// The planned side and the gap side are separate variants, so a comparison can never
/// overwrite a planned balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryUpdate {
    /// Recomputed running balance and its status.
    Planned {
        /// Row ID.
        id: i32,
        /// New planned balance.
        planned_balance: Decimal,
        /// Sign of the planned balance.
        status: FlowStatus,
    },
    /// Realized-vs-planned comparison.
    Gap {
        /// Row ID.
        id: i32,
        /// Gap figures.
        gap: GapMetrics,
    },
}

impl EntryUpdate {
    /// Planned-side update carrying the entry's current planned fields.
    #[must_use]
    pub const fn planned(entry: &BudgetEntry) -> Self {
        Self::Planned {
            id: entry.id,
            planned_balance: entry.planned_balance,
            status: entry.status,
        }
    }

    /// Row this update targets.
    #[must_use]
    pub const fn id(&self) -> i32 {
        match self {
            Self::Planned { id, .. } | Self::Gap { id, .. } => *id,
        }
    }
}

/// Repository trait for budget entry persistence.
///
/// This trait is implemented by the db crate; rows are unique per `(user_id, month, year)`.
pub trait BudgetEntryStore: Send + Sync {
    /// Entries of `user_id` in `year` with month `>= month`, ascending by month.
    fn find_by_user_year_from_month(
        &self,
        user_id: i32,
        year: i32,
        month: u32,
    ) -> impl Future<Output = Result<Vec<BudgetEntry>, StoreError>> + Send;

    /// All entries of `user_id` in `year`, ascending by month.
    fn find_by_user_year(
        &self,
        user_id: i32,
        year: i32,
    ) -> impl Future<Output = Result<Vec<BudgetEntry>, StoreError>> + Send;

    /// Applies every update in one transaction; on error nothing is written.
    fn update_many(
        &self,
        updates: Vec<EntryUpdate>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Writes the plan change of `user_id` together with `updates` in one transaction.
    ///
    /// A missing month or any failing update leaves every row as it was.
    fn save_plan(
        &self,
        user_id: i32,
        change: PlanChange,
        updates: Vec<EntryUpdate>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
