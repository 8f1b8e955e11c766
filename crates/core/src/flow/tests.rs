//! Property-based tests for the flow module.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::comparator::FlowComparator;
use super::reallocator::FlowReallocator;
use super::status::{GapMetrics, round2};
use super::testing::{InMemoryStore, entry};
use super::types::{BudgetEntry, FlowStatus};

type Reallocator = FlowReallocator<InMemoryStore>;
type Comparator = FlowComparator<InMemoryStore>;

/// Amount in cents, up to 100k.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Signed balance in cents.
fn balance() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// A contiguous window starting at `first_month` and running to December.
fn window() -> impl Strategy<Value = Vec<BudgetEntry>> {
    (1u32..=12).prop_flat_map(|first_month| {
        let len = (13 - first_month) as usize;
        prop::collection::vec((amount(), amount(), balance()), len).prop_map(move |rows| {
            rows.into_iter()
                .zip(first_month..=12)
                .map(|((income, expense, stale), month)| {
                    let mut e = entry(1, month, income, expense);
                    e.planned_balance = stale;
                    e
                })
                .collect()
        })
    })
}

proptest! {
    /// Property: each planned balance is the rounded previous balance plus income minus
    /// expense, starting from zero at the first month of the window.
    #[test]
    fn test_carry_forward_recurrence(window in window()) {
        let result = Reallocator::carry_forward(window.clone());

        let mut previous = Decimal::ZERO;
        for (computed, source) in result.iter().zip(&window) {
            let expected = round2(previous + source.income() - source.expense());
            prop_assert_eq!(computed.planned_balance, expected);
            previous = computed.planned_balance;
        }
    }

    /// Property: planned status is deficit, surplus or neutral exactly by sign.
    #[test]
    fn test_planned_status_matches_sign(window in window()) {
        for e in Reallocator::carry_forward(window) {
            let expected = if e.planned_balance < Decimal::ZERO {
                FlowStatus::Deficit
            } else if e.planned_balance > Decimal::ZERO {
                FlowStatus::Surplus
            } else {
                FlowStatus::Neutral
            };
            prop_assert_eq!(e.status, expected);
        }
    }

    /// Property: reallocating an already reallocated window changes nothing.
    #[test]
    fn test_carry_forward_idempotent(window in window()) {
        let once = Reallocator::carry_forward(window);
        let twice = Reallocator::carry_forward(once.clone());

        prop_assert_eq!(once, twice);
    }

    /// Property: stale stored balances never leak into the recomputation.
    #[test]
    fn test_stale_balances_ignored(window in window(), stale in balance()) {
        let mut dirty = window.clone();
        for e in &mut dirty {
            e.planned_balance = stale;
            e.status = FlowStatus::from_sign(stale);
        }

        prop_assert_eq!(
            Reallocator::carry_forward(window),
            Reallocator::carry_forward(dirty)
        );
    }

    /// Property: comparison only fills gap fields.
    #[test]
    fn test_compare_keeps_planned_side(window in window(), realized in balance()) {
        let planned = Reallocator::carry_forward(window);
        let with_realized: Vec<_> = planned
            .iter()
            .cloned()
            .map(|mut e| {
                e.realized_balance = Some(realized);
                e
            })
            .collect();

        let compared = Comparator::compare(with_realized);

        for (after, before) in compared.iter().zip(&planned) {
            prop_assert_eq!(after.planned_balance, before.planned_balance);
            prop_assert_eq!(after.status, before.status);
            prop_assert_eq!(after.planned_income, before.planned_income);
            prop_assert_eq!(after.planned_expense, before.planned_expense);
            prop_assert_eq!(after.gap_amount, Some(round2(realized - before.planned_balance)));
        }
    }

    /// Property: a zero plan always yields a zero ratio, and the gap status follows the gap sign.
    #[test]
    fn test_gap_ratio_guard(planned in balance(), realized in balance()) {
        let gap = GapMetrics::compute(planned, realized);

        if planned.is_zero() {
            prop_assert_eq!(gap.gap_percentage, Decimal::ZERO);
        }
        prop_assert_eq!(gap.status, FlowStatus::from_sign(gap.gap_amount));
    }
}
