//! Planned-vs-realized comparison.

use std::sync::Arc;

use tracing::info;

use super::clock::Clock;
use super::error::FlowError;
use super::status::GapMetrics;
use super::store::{BudgetEntryStore, EntryUpdate};
use super::types::BudgetEntry;

/// Compares each month's realized balance with its stored planned balance.
///
/// Every month of the current year is compared and persisted; only the current month
/// onward is returned.
pub struct FlowComparator<S: BudgetEntryStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: BudgetEntryStore> FlowComparator<S> {
    /// Creates a comparator over `store`, reading "now" from `clock`.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Compares and persists the full year, returning months from the current one.
    ///
    /// A user without entries gets an empty list.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Store` if reading or the transactional write fails.
    pub async fn reconcile(&self, user_id: i32) -> Result<Vec<BudgetEntry>, FlowError> {
        let now = self.clock.current_month();

        let mut compared = self.store.find_by_user_year(user_id, now.year).await?;
        if compared.is_empty() {
            return Ok(Vec::new());
        }

        compared.sort_by_key(|entry| entry.month);
        let updates = compared
            .iter_mut()
            .map(|entry| EntryUpdate::Gap {
                id: entry.id,
                gap: apply_gap(entry),
            })
            .collect();
        self.store.update_many(updates).await?;

        info!(
            user_id,
            year = now.year,
            months = compared.len(),
            "Flow compared"
        );

        Ok(compared
            .into_iter()
            .filter(|entry| entry.month >= now.month)
            .collect())
    }

    /// Fills the gap fields of every entry independently; planned fields are untouched.
    #[must_use]
    pub fn compare(mut entries: Vec<BudgetEntry>) -> Vec<BudgetEntry> {
        entries.sort_by_key(|entry| entry.month);
        for entry in &mut entries {
            apply_gap(entry);
        }
        entries
    }
}

fn apply_gap(entry: &mut BudgetEntry) -> GapMetrics {
    let gap = GapMetrics::compute(entry.planned_balance, entry.realized());
    entry.gap_amount = Some(gap.gap_amount);
    entry.gap_percentage = Some(gap.gap_percentage);
    entry.gap_status = Some(gap.status);
    gap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::clock::FixedClock;
    use crate::flow::error::StoreError;
    use crate::flow::testing::{InMemoryStore, entry};
    use crate::flow::types::FlowStatus;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn comparator(store: &Arc<InMemoryStore>, month: u32) -> FlowComparator<InMemoryStore> {
        FlowComparator::new(
            Arc::clone(store),
            Arc::new(FixedClock::at(2025, month).unwrap()),
        )
    }

    fn with_balances(month: u32, planned: Decimal, realized: Option<Decimal>) -> BudgetEntry {
        let mut e = entry(1, month, dec!(0), dec!(0));
        e.planned_balance = planned;
        e.status = FlowStatus::from_sign(planned);
        e.realized_balance = realized;
        e
    }

    #[tokio::test]
    async fn test_realized_below_plan() {
        let store = Arc::new(InMemoryStore::with_entries(vec![with_balances(
            10,
            dec!(1000),
            Some(dec!(800)),
        )]));

        let result = comparator(&store, 10).reconcile(1).await.unwrap();

        assert_eq!(result[0].gap_amount, Some(dec!(-200)));
        assert_eq!(result[0].gap_percentage, Some(dec!(-0.2)));
        assert_eq!(result[0].gap_status, Some(FlowStatus::Deficit));
    }

    #[tokio::test]
    async fn test_zero_plan_ratio_is_zero() {
        let store = Arc::new(InMemoryStore::with_entries(vec![with_balances(
            10,
            Decimal::ZERO,
            Some(dec!(50)),
        )]));

        let result = comparator(&store, 10).reconcile(1).await.unwrap();

        assert_eq!(result[0].gap_percentage, Some(Decimal::ZERO));
        assert_eq!(result[0].gap_status, Some(FlowStatus::Surplus));
    }

    #[tokio::test]
    async fn test_missing_realized_counts_as_zero() {
        let store = Arc::new(InMemoryStore::with_entries(vec![with_balances(
            10,
            dec!(400),
            None,
        )]));

        let result = comparator(&store, 10).reconcile(1).await.unwrap();

        assert_eq!(result[0].gap_amount, Some(dec!(-400)));
        assert_eq!(result[0].gap_percentage, Some(dec!(-1)));
    }

    #[tokio::test]
    async fn test_full_year_persisted_tail_returned() {
        let store = Arc::new(InMemoryStore::with_entries(vec![
            with_balances(1, dec!(100), Some(dec!(150))),
            with_balances(8, dec!(200), Some(dec!(100))),
            with_balances(9, dec!(300), Some(dec!(300))),
            with_balances(12, dec!(400), Some(dec!(500))),
        ]));

        let result = comparator(&store, 9).reconcile(1).await.unwrap();

        let months: Vec<_> = result.iter().map(|e| e.month).collect();
        assert_eq!(months, vec![9, 12]);

        let january = store.get(1, 2025, 1).unwrap();
        assert_eq!(january.gap_amount, Some(dec!(50)));
        assert_eq!(january.gap_percentage, Some(dec!(0.5)));
        assert_eq!(january.gap_status, Some(FlowStatus::Surplus));

        let august = store.get(1, 2025, 8).unwrap();
        assert_eq!(august.gap_status, Some(FlowStatus::Deficit));
    }

    #[tokio::test]
    async fn test_planned_side_is_never_written() {
        let original = with_balances(10, dec!(-250), Some(dec!(100)));
        let store = Arc::new(InMemoryStore::with_entries(vec![original.clone()]));

        comparator(&store, 10).reconcile(1).await.unwrap();

        let stored = store.get(1, 2025, 10).unwrap();
        assert_eq!(stored.planned_balance, original.planned_balance);
        assert_eq!(stored.status, FlowStatus::Deficit);
        assert_eq!(stored.gap_status, Some(FlowStatus::Surplus));
        assert!(
            store
                .updates()
                .iter()
                .all(|update| matches!(update, EntryUpdate::Gap { .. }))
        );
    }

    #[tokio::test]
    async fn test_no_entries_returns_empty() {
        let store = Arc::new(InMemoryStore::default());

        let result = comparator(&store, 5).reconcile(1).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let original = with_balances(10, dec!(100), Some(dec!(10)));
        let store = Arc::new(InMemoryStore::with_entries(vec![original.clone()]));
        store.fail_updates(true);

        let err = comparator(&store, 10).reconcile(1).await.unwrap_err();

        assert!(matches!(err, FlowError::Store(StoreError::Database(_))));
        assert_eq!(store.get(1, 2025, 10).unwrap(), original);
    }
}
