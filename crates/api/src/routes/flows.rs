//! Monthly cash flow routes.
//!
//! Handlers translate engine results into the Portuguese JSON fields the
//! front end consumes; the engine itself never formats responses.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use fluxo_core::flow::{
    BudgetEntry, FlowComparator, FlowReallocator, FlowStatus, MonthRef, PlanChange,
};

/// Creates the flow routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flows", get(list_flow).post(create_flow))
        .route("/flows/reallocate", post(reallocate_flow))
        .route("/flows/compare", post(compare_flow))
        .route("/flows/{month}", put(update_month))
        .route("/flows/{month}/realized", put(record_realized))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for updating a month's plan.
#[derive(Debug, Deserialize)]
pub struct UpdateMonthRequest {
    /// Planned income.
    pub receita: Option<Decimal>,
    /// Planned expense.
    pub despesa: Option<Decimal>,
}

/// Request body for recording a realized balance.
#[derive(Debug, Deserialize)]
pub struct RealizedRequest {
    /// Realized balance; `null` clears it.
    pub saldo_realizado: Option<Decimal>,
}

/// One month of the planned flow.
#[derive(Debug, Serialize)]
pub struct FlowMonthResponse {
    /// Month number.
    pub mes: u32,
    /// Month name.
    pub nome: &'static str,
    /// Planned income.
    pub receita: Decimal,
    /// Planned expense.
    pub despesa: Decimal,
    /// Cumulative planned balance.
    pub saldo: Decimal,
    /// Sign of the planned balance.
    pub status: FlowStatus,
}

impl From<&BudgetEntry> for FlowMonthResponse {
    fn from(entry: &BudgetEntry) -> Self {
        Self {
            mes: entry.month,
            nome: entry.period().month_name(),
            receita: entry.income(),
            despesa: entry.expense(),
            saldo: entry.planned_balance,
            status: entry.status,
        }
    }
}

/// One month of the planned-vs-realized comparison.
#[derive(Debug, Serialize)]
pub struct FlowGapResponse {
    /// Month number.
    pub mes: u32,
    /// Month name.
    pub nome: &'static str,
    /// Planned balance.
    pub saldo_previsto: Decimal,
    /// Realized balance.
    pub saldo_realizado: Decimal,
    /// Realized minus planned.
    pub diferenca: Decimal,
    /// Gap as a ratio of the planned balance.
    pub percentual: Decimal,
    /// Sign of the gap.
    pub status: FlowStatus,
}

impl From<&BudgetEntry> for FlowGapResponse {
    fn from(entry: &BudgetEntry) -> Self {
        Self {
            mes: entry.month,
            nome: entry.period().month_name(),
            saldo_previsto: entry.planned_balance,
            saldo_realizado: entry.realized(),
            diferenca: entry.gap_amount.unwrap_or_default(),
            percentual: entry.gap_percentage.unwrap_or_default(),
            status: entry.gap_status.unwrap_or(FlowStatus::Neutral),
        }
    }
}

fn flow_response(entries: &[BudgetEntry]) -> Vec<FlowMonthResponse> {
    entries.iter().map(FlowMonthResponse::from).collect()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /flows - Current-year flow.
async fn list_flow(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let year = state.clock.current_month().year;
    let entries = state.entries.list_year(user.user_id(), year).await?;

    Ok(Json(flow_response(&entries)))
}

/// POST /flows - Create the current-year flow.
async fn create_flow(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let year = state.clock.current_month().year;
    let entries = state.entries.create_year(user.user_id(), year).await?;

    info!(user_id = user.user_id(), year, "Flow created");

    Ok((StatusCode::CREATED, Json(flow_response(&entries))))
}

/// PUT /flows/{month} - Update a month's plan and reallocate in one commit.
async fn update_month(
    State(state): State<AppState>,
    user: AuthUser,
    Path(month): Path<u32>,
    Json(payload): Json<UpdateMonthRequest>,
) -> ApiResult<impl IntoResponse> {
    let change = PlanChange {
        period: MonthRef::new(state.clock.current_month().year, month)?,
        income: payload.receita,
        expense: payload.despesa,
    };

    let entries = FlowReallocator::new(state.entries.clone(), state.clock.clone())
        .replan(user.user_id(), change)
        .await?;

    Ok(Json(flow_response(&entries)))
}

/// PUT /flows/{month}/realized - Record a month's realized balance.
async fn record_realized(
    State(state): State<AppState>,
    user: AuthUser,
    Path(month): Path<u32>,
    Json(payload): Json<RealizedRequest>,
) -> ApiResult<impl IntoResponse> {
    let period = MonthRef::new(state.clock.current_month().year, month)?;

    state
        .entries
        .record_realized(user.user_id(), period, payload.saldo_realizado)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /flows/reallocate - Recompute planned balances from the current month.
async fn reallocate_flow(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let entries = FlowReallocator::new(state.entries.clone(), state.clock.clone())
        .reallocate(user.user_id())
        .await?;

    Ok(Json(flow_response(&entries)))
}

/// POST /flows/compare - Reconcile realized against planned balances.
async fn compare_flow(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let entries = FlowComparator::new(state.entries.clone(), state.clock.clone())
        .reconcile(user.user_id())
        .await?;

    Ok(Json(
        entries.iter().map(FlowGapResponse::from).collect::<Vec<_>>(),
    ))
}
