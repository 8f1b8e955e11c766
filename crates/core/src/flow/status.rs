//! Status and gap derivation shared by the reallocator and the comparator.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::types::FlowStatus;

/// Decimal places kept for gap ratios.
const RATIO_SCALE: u32 = 4;

/// Rounds a monetary amount to cents, midpoint away from zero.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Realized-vs-planned deviation for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapMetrics {
    /// `realized - planned`.
    pub gap_amount: Decimal,
    /// `gap_amount / |planned|`, or zero when `planned` is zero.
    pub gap_percentage: Decimal,
    /// Sign of `gap_amount`.
    pub status: FlowStatus,
}

impl GapMetrics {
    /// Compares a realized balance against a planned balance.
    ///
    /// The ratio is a raw fraction (`-0.2` for 20% below plan), unbounded, rounded to
    /// four decimal places.
    #[must_use]
    pub fn compute(planned: Decimal, realized: Decimal) -> Self {
        let gap_amount = round2(realized - planned);
        let gap_percentage = if planned.is_zero() {
            Decimal::ZERO
        } else {
            (gap_amount / planned.abs())
                .round_dp_with_strategy(RATIO_SCALE, RoundingStrategy::MidpointAwayFromZero)
        };

        Self {
            gap_amount,
            gap_percentage,
            status: FlowStatus::from_sign(gap_amount),
        }
    }
}
