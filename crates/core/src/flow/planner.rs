//! Creation of a year's flow and validation of planned amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::FlowError;
use super::types::FlowStatus;

/// A budget entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBudgetEntry {
    /// Owner.
    pub user_id: i32,
    /// Month number, 1 through 12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Planned balance, zero until the first reallocation.
    pub planned_balance: Decimal,
    /// Status, neutral until the first reallocation.
    pub status: FlowStatus,
}

/// Flow setup rules.
pub struct FlowPlanner;

impl FlowPlanner {
    /// Builds the twelve empty months of `year` for `user_id`.
    #[must_use]
    pub fn year_template(user_id: i32, year: i32) -> Vec<NewBudgetEntry> {
        (1..=12)
            .map(|month| NewBudgetEntry {
                user_id,
                month,
                year,
                planned_balance: Decimal::ZERO,
                status: FlowStatus::Neutral,
            })
            .collect()
    }

    /// Rejects negative planned amounts before they reach the store.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NegativeAmount` naming the offending field.
    pub fn validate_amounts(
        income: Option<Decimal>,
        expense: Option<Decimal>,
    ) -> Result<(), FlowError> {
        if income.is_some_and(|v| v < Decimal::ZERO) {
            return Err(FlowError::NegativeAmount("planned income"));
        }
        if expense.is_some_and(|v| v < Decimal::ZERO) {
            return Err(FlowError::NegativeAmount("planned expense"));
        }
        Ok(())
    }
}
