//! In-memory store for service tests.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rust_decimal::Decimal;

use super::error::StoreError;
use super::store::{BudgetEntryStore, EntryUpdate, PlanChange};
use super::types::{BudgetEntry, FlowStatus};

pub(crate) const YEAR: i32 = 2025;

/// Fresh entry for `YEAR`, as the create-flow operation leaves it plus planned amounts.
pub(crate) fn entry(user_id: i32, month: u32, income: Decimal, expense: Decimal) -> BudgetEntry {
    BudgetEntry {
        id: user_id * 100 + i32::try_from(month).unwrap(),
        user_id,
        month,
        year: YEAR,
        planned_income: Some(income),
        planned_expense: Some(expense),
        planned_balance: Decimal::ZERO,
        realized_balance: None,
        status: FlowStatus::Neutral,
        gap_amount: None,
        gap_percentage: None,
        gap_status: None,
    }
}

/// Rows keyed by `(user_id, year, month)`; `update_many` is all-or-nothing.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    rows: Mutex<BTreeMap<(i32, i32, u32), BudgetEntry>>,
    applied: Mutex<Vec<EntryUpdate>>,
    fail_updates: AtomicBool,
    update_calls: AtomicUsize,
}

impl InMemoryStore {
    pub(crate) fn with_entries(entries: Vec<BudgetEntry>) -> Self {
        let store = Self::default();
        {
            let mut rows = store.rows.lock().unwrap();
            for e in entries {
                rows.insert((e.user_id, e.year, e.month), e);
            }
        }
        store
    }

    pub(crate) fn get(&self, user_id: i32, year: i32, month: u32) -> Option<BudgetEntry> {
        self.rows
            .lock()
            .unwrap()
            .get(&(user_id, year, month))
            .cloned()
    }

    pub(crate) fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn updates(&self) -> Vec<EntryUpdate> {
        self.applied.lock().unwrap().clone()
    }

    fn select(&self, keep: impl Fn(&BudgetEntry) -> bool) -> Vec<BudgetEntry> {
        // BTreeMap order is (user, year, month), so matches come out ascending by month.
        self.rows
            .lock()
            .unwrap()
            .values()
            .filter(|e| keep(e))
            .cloned()
            .collect()
    }

    fn apply(
        &self,
        plan: Option<(i32, PlanChange)>,
        updates: Vec<EntryUpdate>,
    ) -> Result<(), StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        let mut rows = self.rows.lock().unwrap();
        let mut staged = rows.clone();
        if let Some((user_id, change)) = plan {
            let row = staged
                .get_mut(&(user_id, change.period.year, change.period.month))
                .ok_or_else(|| {
                    StoreError::NotFound(format!(
                        "{:02}/{}",
                        change.period.month, change.period.year
                    ))
                })?;
            change.apply_to(row);
        }

        // Failure is injected after the plan is staged, so nothing staged may leak.
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Database("simulated failure".into()));
        }

        for update in &updates {
            let row = staged
                .values_mut()
                .find(|e| e.id == update.id())
                .ok_or_else(|| StoreError::NotFound(format!("id {}", update.id())))?;

            match *update {
                EntryUpdate::Planned {
                    planned_balance,
                    status,
                    ..
                } => {
                    row.planned_balance = planned_balance;
                    row.status = status;
                }
                EntryUpdate::Gap { gap, .. } => {
                    row.gap_amount = Some(gap.gap_amount);
                    row.gap_percentage = Some(gap.gap_percentage);
                    row.gap_status = Some(gap.status);
                }
            }
        }

        *rows = staged;
        self.applied.lock().unwrap().extend(updates);
        Ok(())
    }
}

impl BudgetEntryStore for InMemoryStore {
    fn find_by_user_year_from_month(
        &self,
        user_id: i32,
        year: i32,
        month: u32,
    ) -> impl Future<Output = Result<Vec<BudgetEntry>, StoreError>> + Send {
        let found =
            self.select(|e| e.user_id == user_id && e.year == year && e.month >= month);
        async move { Ok(found) }
    }

    fn find_by_user_year(
        &self,
        user_id: i32,
        year: i32,
    ) -> impl Future<Output = Result<Vec<BudgetEntry>, StoreError>> + Send {
        let found = self.select(|e| e.user_id == user_id && e.year == year);
        async move { Ok(found) }
    }

    fn update_many(
        &self,
        updates: Vec<EntryUpdate>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        let result = self.apply(None, updates);
        async move { result }
    }

    fn save_plan(
        &self,
        user_id: i32,
        change: PlanChange,
        updates: Vec<EntryUpdate>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        let result = self.apply(Some((user_id, change)), updates);
        async move { result }
    }
}
