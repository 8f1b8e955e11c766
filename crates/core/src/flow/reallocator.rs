//! Forward reallocation of planned balances.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::clock::Clock;
use super::error::FlowError;
use super::status::round2;
use super::planner::FlowPlanner;
use super::store::{BudgetEntryStore, EntryUpdate, PlanChange};
use super::types::{BudgetEntry, FlowStatus, MonthRef};

/// Recomputes the running planned balance from the current month to year-end.
///
/// Months before the current one are never read or written. The carry restarts at zero
/// on the first month of the window, whatever balance the previous month holds.
pub struct FlowReallocator<S: BudgetEntryStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: BudgetEntryStore> FlowReallocator<S> {
    /// Creates a reallocator over `store`, reading "now" from `clock`.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Recomputes and persists the user's window, returning the recomputed entries.
    ///
    /// The returned entries are the in-memory results, not a re-read of the store.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NoFlowFound` if the window is empty and `FlowError::Store` if
    /// reading or the transactional write fails. On a failed write no row is changed.
    pub async fn reallocate(&self, user_id: i32) -> Result<Vec<BudgetEntry>, FlowError> {
        let now = self.clock.current_month();
        let window = self.load_window(user_id, now).await?;

        let recomputed = Self::carry_forward(window);
        let updates = recomputed.iter().map(EntryUpdate::planned).collect();
        self.store.update_many(updates).await?;

        info!(
            user_id,
            year = now.year,
            from_month = now.month,
            months = recomputed.len(),
            "Flow reallocated"
        );

        Ok(recomputed)
    }

    /// Applies new planned amounts to one month and reallocates, committing both at once.
    ///
    /// The edited month only moves balances when it falls inside the window; an earlier
    /// month is stored but stays frozen.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NegativeAmount` for a negative amount, `FlowError::NoFlowFound`
    /// if the window is empty and `FlowError::Store` if the write fails. On any error
    /// neither the plan nor the balances change.
    pub async fn replan(
        &self,
        user_id: i32,
        change: PlanChange,
    ) -> Result<Vec<BudgetEntry>, FlowError> {
        FlowPlanner::validate_amounts(change.income, change.expense)?;

        let now = self.clock.current_month();
        let mut window = self.load_window(user_id, now).await?;
        for entry in &mut window {
            change.apply_to(entry);
        }

        let recomputed = Self::carry_forward(window);
        let updates = recomputed.iter().map(EntryUpdate::planned).collect();
        self.store.save_plan(user_id, change, updates).await?;

        info!(
            user_id,
            month = change.period.month,
            year = change.period.year,
            months = recomputed.len(),
            "Flow replanned"
        );

        Ok(recomputed)
    }

    async fn load_window(
        &self,
        user_id: i32,
        now: MonthRef,
    ) -> Result<Vec<BudgetEntry>, FlowError> {
        let window = self
            .store
            .find_by_user_year_from_month(user_id, now.year, now.month)
            .await?;

        if window.is_empty() {
            return Err(FlowError::NoFlowFound {
                user_id,
                year: now.year,
                month: now.month,
            });
        }
        Ok(window)
    }

    /// Walks the window in month order, rounding the running balance at every step.
    #[must_use]
    pub fn carry_forward(mut window: Vec<BudgetEntry>) -> Vec<BudgetEntry> {
        window.sort_by_key(|entry| entry.month);

        let mut carry = Decimal::ZERO;
        for entry in &mut window {
            let balance = round2(carry + entry.income() - entry.expense());
            entry.planned_balance = balance;
            entry.status = FlowStatus::from_sign(balance);
            carry = balance;

            debug!(month = entry.month, %balance, status = %entry.status, "Carried balance");
        }

        window
    }
}
