//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod budget_entry;
pub mod user;

pub use budget_entry::BudgetEntryRepository;
pub use user::{UserError, UserRepository, normalize_email};
