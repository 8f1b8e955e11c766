//! Database seeder for Fluxo development and testing.
//!
//! Seeds a demo user and a full current-year flow with sample income and
//! expenses, then reallocates it from the current month.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use fluxo_core::auth::hash_password;
use fluxo_core::flow::{Clock, FlowReallocator, MonthRef, StoreError, SystemClock};
use fluxo_db::{BudgetEntryRepository, UserRepository};
use fluxo_shared::FlowConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const DEMO_EMAIL: &str = "demo@fluxo.dev";
const DEMO_PASSWORD: &str = "fluxo-demo-123";

/// Sample (income, expense) per month, January first.
const SAMPLE_PLAN: [(Decimal, Decimal); 12] = [
    (dec!(5200.00), dec!(4100.00)),
    (dec!(5200.00), dec!(4350.00)),
    (dec!(5200.00), dec!(4800.00)),
    (dec!(5200.00), dec!(3900.00)),
    (dec!(5450.00), dec!(4200.00)),
    (dec!(5450.00), dec!(5900.00)),
    (dec!(5450.00), dec!(4000.00)),
    (dec!(5450.00), dec!(4100.00)),
    (dec!(5450.00), dec!(4650.00)),
    (dec!(5450.00), dec!(4300.00)),
    (dec!(5450.00), dec!(4400.00)),
    (dec!(10900.00), dec!(7200.00)),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = Arc::new(fluxo_db::connect(&database_url).await?);

    println!("Seeding demo user...");
    let users = UserRepository::new(Arc::clone(&db));
    let user_id = match users.find_by_email(DEMO_EMAIL).await? {
        Some(user) => {
            println!("  Demo user already exists, skipping...");
            user.id
        }
        None => {
            let hash = hash_password(DEMO_PASSWORD)?;
            users.create(DEMO_EMAIL, &hash, "Demo User").await?.id
        }
    };

    // Same month boundary as the server.
    let flow_config = FlowConfig::load().context("Failed to load flow configuration")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::from_name(&flow_config.timezone)?);
    let year = clock.current_month().year;
    let entries = Arc::new(BudgetEntryRepository::new(db));

    println!("Seeding {year} flow...");
    match entries.create_year(user_id, year).await {
        Ok(_) => {}
        Err(StoreError::Conflict(_)) => println!("  Flow already exists, refreshing plan..."),
        Err(e) => return Err(e.into()),
    }

    for (month, (income, expense)) in (1u32..).zip(SAMPLE_PLAN) {
        entries
            .update_plan(user_id, MonthRef::new(year, month)?, Some(income), Some(expense))
            .await?;
    }

    let reallocated = FlowReallocator::new(entries, clock)
        .reallocate(user_id)
        .await?;
    println!("  Reallocated {} months", reallocated.len());

    println!("Seeding complete! Log in as {DEMO_EMAIL} / {DEMO_PASSWORD}");
    Ok(())
}
