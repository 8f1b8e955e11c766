//! Budget entry repository for the monthly cash flow.
//!
//! Implements [`BudgetEntryStore`] for the flow engine and the CRUD operations the flow
//! handlers need around it.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use fluxo_core::flow::{
    BudgetEntry, BudgetEntryStore, EntryUpdate, FlowPlanner, MonthRef, NewBudgetEntry,
    PlanChange, StoreError,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait, prelude::DateTimeWithTimeZone,
    sea_query::Expr,
};
use tracing::debug;

use crate::entities::{budget_entries, sea_orm_active_enums::FlowStatus as DbFlowStatus};

/// Maps a database error onto the store taxonomy.
///
/// Constraint details stay in the logs; callers only see a fixed message.
fn store_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            debug!(%detail, "Unique constraint violated");
            StoreError::Conflict("budget entry already exists".to_string())
        }
        _ => StoreError::Database(err.to_string()),
    }
}

/// Rewords a duplicate-year conflict for the create-flow caller.
fn year_conflict(err: StoreError, year: i32) -> StoreError {
    match err {
        StoreError::Conflict(_) => StoreError::Conflict(format!("flow already exists for {year}")),
        other => other,
    }
}

fn month_not_found(period: MonthRef) -> StoreError {
    StoreError::NotFound(format!("{:02}/{}", period.month, period.year))
}

/// Converts a month number to the SMALLINT column type.
fn month_column(month: u32) -> Result<i16, StoreError> {
    i16::try_from(month).map_err(|_| StoreError::Database(format!("month out of range: {month}")))
}

/// Converts a stored row into the domain entry.
fn to_domain(model: budget_entries::Model) -> BudgetEntry {
    BudgetEntry {
        id: model.id,
        user_id: model.user_id,
        month: u32::from(model.month.unsigned_abs()),
        year: model.year,
        planned_income: model.planned_income,
        planned_expense: model.planned_expense,
        planned_balance: model.planned_balance,
        realized_balance: model.realized_balance,
        status: model.status.into(),
        gap_amount: model.gap_amount,
        gap_percentage: model.gap_percentage,
        gap_status: model.gap_status.map(Into::into),
    }
}

/// Builds the insert model for a template entry.
fn new_entry_model(
    entry: NewBudgetEntry,
    now: DateTimeWithTimeZone,
) -> Result<budget_entries::ActiveModel, StoreError> {
    Ok(budget_entries::ActiveModel {
        user_id: Set(entry.user_id),
        month: Set(month_column(entry.month)?),
        year: Set(entry.year),
        planned_income: Set(None),
        planned_expense: Set(None),
        planned_balance: Set(entry.planned_balance),
        realized_balance: Set(None),
        status: Set(entry.status.into()),
        gap_amount: Set(None),
        gap_percentage: Set(None),
        gap_status: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    })
}

/// Budget entry repository.
#[derive(Debug)]
pub struct BudgetEntryRepository {
    db: Arc<DatabaseConnection>,
}

impl BudgetEntryRepository {
    /// Creates a new budget entry repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn select<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        year: i32,
        from_month: Option<u32>,
    ) -> Result<Vec<BudgetEntry>, StoreError> {
        let mut query = budget_entries::Entity::find()
            .filter(budget_entries::Column::UserId.eq(user_id))
            .filter(budget_entries::Column::Year.eq(year));

        if let Some(month) = from_month {
            query = query.filter(budget_entries::Column::Month.gte(month_column(month)?));
        }

        let rows = query
            .order_by_asc(budget_entries::Column::Month)
            .all(conn)
            .await
            .map_err(store_err)?;

        Ok(rows.into_iter().map(to_domain).collect())
    }

    /// Lists the user's entries for `year`, ascending by month.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn list_year(&self, user_id: i32, year: i32) -> Result<Vec<BudgetEntry>, StoreError> {
        Self::select(self.db.as_ref(), user_id, year, None).await
    }

    /// Lists the user's entries for `year` from `month` onward, ascending by month.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn list_from_month(
        &self,
        user_id: i32,
        year: i32,
        month: u32,
    ) -> Result<Vec<BudgetEntry>, StoreError> {
        Self::select(self.db.as_ref(), user_id, year, Some(month)).await
    }

    /// Creates the twelve months of `year` for the user in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if any month of that year already exists.
    pub async fn create_year(&self, user_id: i32, year: i32) -> Result<Vec<BudgetEntry>, StoreError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let rows = FlowPlanner::year_template(user_id, year)
            .into_iter()
            .map(|entry| new_entry_model(entry, now))
            .collect::<Result<Vec<_>, _>>()?;

        let txn = self.db.begin().await.map_err(store_err)?;

        budget_entries::Entity::insert_many(rows)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| year_conflict(store_err(e), year))?;

        let created = Self::select(&txn, user_id, year, None).await?;

        txn.commit().await.map_err(store_err)?;

        debug!(user_id, year, months = created.len(), "Flow year created");
        Ok(created)
    }

    /// Replaces the planned income and expense of one month.
    ///
    /// Balances are not recomputed; [`BudgetEntryStore::save_plan`] does both at once.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the month has no entry.
    pub async fn update_plan(
        &self,
        user_id: i32,
        period: MonthRef,
        income: Option<Decimal>,
        expense: Option<Decimal>,
    ) -> Result<(), StoreError> {
        let change = PlanChange {
            period,
            income,
            expense,
        };
        Self::write_plan(self.db.as_ref(), user_id, &change, Utc::now().into()).await
    }

    /// Records the realized balance of one month; `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the month has no entry.
    pub async fn record_realized(
        &self,
        user_id: i32,
        period: MonthRef,
        realized: Option<Decimal>,
    ) -> Result<(), StoreError> {
        let result = budget_entries::Entity::update_many()
            .col_expr(budget_entries::Column::RealizedBalance, Expr::value(realized))
            .col_expr(
                budget_entries::Column::UpdatedAt,
                Expr::value(DateTimeWithTimeZone::from(Utc::now())),
            )
            .filter(budget_entries::Column::UserId.eq(user_id))
            .filter(budget_entries::Column::Year.eq(period.year))
            .filter(budget_entries::Column::Month.eq(month_column(period.month)?))
            .exec(self.db.as_ref())
            .await
            .map_err(store_err)?;

        if result.rows_affected == 0 {
            return Err(month_not_found(period));
        }
        Ok(())
    }

    /// Applies all updates in a single transaction.
    ///
    /// A missing row or a failing statement rolls back every update of the batch.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for a missing row, `StoreError::Database` otherwise.
    pub async fn apply_updates(&self, updates: Vec<EntryUpdate>) -> Result<(), StoreError> {
        if updates.is_empty() {
            return Ok(());
        }

        let now = DateTimeWithTimeZone::from(Utc::now());
        let txn = self.db.begin().await.map_err(store_err)?;

        Self::write_updates(&txn, &updates, now).await?;

        txn.commit().await.map_err(store_err)?;

        debug!(rows = updates.len(), "Budget entries updated");
        Ok(())
    }

    /// Writes a plan change and the recomputed rows in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the month or a row is missing and
    /// `StoreError::Database` otherwise; nothing is committed on error.
    pub async fn apply_plan(
        &self,
        user_id: i32,
        change: PlanChange,
        updates: Vec<EntryUpdate>,
    ) -> Result<(), StoreError> {
        let now = DateTimeWithTimeZone::from(Utc::now());
        let txn = self.db.begin().await.map_err(store_err)?;

        Self::write_plan(&txn, user_id, &change, now).await?;
        Self::write_updates(&txn, &updates, now).await?;

        txn.commit().await.map_err(store_err)?;

        debug!(
            user_id,
            month = change.period.month,
            rows = updates.len(),
            "Plan saved"
        );
        Ok(())
    }

    async fn write_plan<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        change: &PlanChange,
        now: DateTimeWithTimeZone,
    ) -> Result<(), StoreError> {
        let result = budget_entries::Entity::update_many()
            .col_expr(budget_entries::Column::PlannedIncome, Expr::value(change.income))
            .col_expr(budget_entries::Column::PlannedExpense, Expr::value(change.expense))
            .col_expr(budget_entries::Column::UpdatedAt, Expr::value(now))
            .filter(budget_entries::Column::UserId.eq(user_id))
            .filter(budget_entries::Column::Year.eq(change.period.year))
            .filter(budget_entries::Column::Month.eq(month_column(change.period.month)?))
            .exec(conn)
            .await
            .map_err(store_err)?;

        if result.rows_affected == 0 {
            return Err(month_not_found(change.period));
        }
        Ok(())
    }

    // An early return drops the transaction, which rolls it back.
    async fn write_updates<C: ConnectionTrait>(
        conn: &C,
        updates: &[EntryUpdate],
        now: DateTimeWithTimeZone,
    ) -> Result<(), StoreError> {
        for update in updates {
            let statement = match *update {
                EntryUpdate::Planned {
                    id,
                    planned_balance,
                    status,
                } => budget_entries::Entity::update_many()
                    .col_expr(
                        budget_entries::Column::PlannedBalance,
                        Expr::value(planned_balance),
                    )
                    .col_expr(
                        budget_entries::Column::Status,
                        Expr::value(DbFlowStatus::from(status).to_value()),
                    )
                    .filter(budget_entries::Column::Id.eq(id)),
                EntryUpdate::Gap { id, gap } => budget_entries::Entity::update_many()
                    .col_expr(budget_entries::Column::GapAmount, Expr::value(gap.gap_amount))
                    .col_expr(
                        budget_entries::Column::GapPercentage,
                        Expr::value(gap.gap_percentage),
                    )
                    .col_expr(
                        budget_entries::Column::GapStatus,
                        Expr::value(DbFlowStatus::from(gap.status).to_value()),
                    )
                    .filter(budget_entries::Column::Id.eq(id)),
            };

            let result = statement
                .col_expr(budget_entries::Column::UpdatedAt, Expr::value(now))
                .exec(conn)
                .await
                .map_err(store_err)?;

            if result.rows_affected == 0 {
                return Err(StoreError::NotFound(format!("budget entry {}", update.id())));
            }
        }
        Ok(())
    }
}

impl BudgetEntryStore for BudgetEntryRepository {
    fn find_by_user_year_from_month(
        &self,
        user_id: i32,
        year: i32,
        month: u32,
    ) -> impl Future<Output = Result<Vec<BudgetEntry>, StoreError>> + Send {
        self.list_from_month(user_id, year, month)
    }

    fn find_by_user_year(
        &self,
        user_id: i32,
        year: i32,
    ) -> impl Future<Output = Result<Vec<BudgetEntry>, StoreError>> + Send {
        self.list_year(user_id, year)
    }

    fn update_many(
        &self,
        updates: Vec<EntryUpdate>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        self.apply_updates(updates)
    }

    fn save_plan(
        &self,
        user_id: i32,
        change: PlanChange,
        updates: Vec<EntryUpdate>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        self.apply_plan(user_id, change, updates)
    }
}

#[cfg(test)]
#[path = "budget_entry_tests.rs"]
mod tests;
