//! Initial schema: users and their monthly budget entries.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS budget_entries CASCADE;
             DROP TABLE IF EXISTS users CASCADE;
             DROP FUNCTION IF EXISTS set_updated_at() CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at() RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TABLE users (
    id SERIAL PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    full_name VARCHAR(120) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TRIGGER trg_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

-- One row per user and calendar month
CREATE TABLE budget_entries (
    id SERIAL PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    month SMALLINT NOT NULL,
    year INTEGER NOT NULL,
    planned_income NUMERIC(14, 2),
    planned_expense NUMERIC(14, 2),
    planned_balance NUMERIC(14, 2) NOT NULL DEFAULT 0,
    realized_balance NUMERIC(14, 2),
    status VARCHAR(16) NOT NULL DEFAULT 'neutral',
    gap_amount NUMERIC(14, 2),
    gap_percentage NUMERIC(20, 4),
    gap_status VARCHAR(16),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_budget_entries_user_month_year UNIQUE (user_id, month, year),
    CONSTRAINT chk_budget_entries_month CHECK (month BETWEEN 1 AND 12),
    CONSTRAINT chk_budget_entries_status CHECK (status IN ('deficit', 'surplus', 'neutral')),
    CONSTRAINT chk_budget_entries_gap_status
        CHECK (gap_status IS NULL OR gap_status IN ('deficit', 'surplus', 'neutral'))
);

-- Window lookups: user + year, ordered by month
CREATE INDEX idx_budget_entries_user_year ON budget_entries(user_id, year, month);

CREATE TRIGGER trg_budget_entries_updated_at
    BEFORE UPDATE ON budget_entries
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";
