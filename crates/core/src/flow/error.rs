//! Cash-flow error types.

use fluxo_shared::AppError;
use thiserror::Error;

/// Persistence failures reported by a [`BudgetEntryStore`](super::BudgetEntryStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database failed; nothing from the failed call was committed.
    #[error("database error: {0}")]
    Database(String),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A row addressed by an update does not exist.
    #[error("budget entry not found: {0}")]
    NotFound(String),
}

/// Cash-flow errors.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The user has no entries in the recomputation window.
    #[error("no flow found for user {user_id} from {month:02}/{year}")]
    NoFlowFound {
        /// User ID.
        user_id: i32,
        /// Year of the window.
        year: i32,
        /// First month of the window.
        month: u32,
    },

    /// Month number outside 1..=12.
    #[error("invalid month: {0}")]
    InvalidMonth(u32),

    /// Planned amount is negative.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),

    /// Configured time zone is not a known IANA name.
    #[error("invalid time zone: {0}")]
    InvalidTimezone(String),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::NoFlowFound { .. } => Self::NotFound(err.to_string()),
            FlowError::InvalidMonth(_) | FlowError::NegativeAmount(_) => {
                Self::Validation(err.to_string())
            }
            FlowError::InvalidTimezone(_) => Self::Internal(err.to_string()),
            FlowError::Store(StoreError::Conflict(msg)) => Self::Conflict(msg),
            FlowError::Store(StoreError::NotFound(what)) => Self::NotFound(what),
            FlowError::Store(StoreError::Database(msg)) => Self::Database(msg),
        }
    }
}
