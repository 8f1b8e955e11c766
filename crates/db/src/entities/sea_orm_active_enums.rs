//! `SeaORM` active enums.

use fluxo_core::flow::FlowStatus as CoreFlowStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sign classification stored in `budget_entries.status` and `budget_entries.gap_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum FlowStatus {
    #[sea_orm(string_value = "deficit")]
    Deficit,
    #[sea_orm(string_value = "surplus")]
    Surplus,
    #[sea_orm(string_value = "neutral")]
    Neutral,
}

impl From<CoreFlowStatus> for FlowStatus {
    fn from(status: CoreFlowStatus) -> Self {
        match status {
            CoreFlowStatus::Deficit => Self::Deficit,
            CoreFlowStatus::Surplus => Self::Surplus,
            CoreFlowStatus::Neutral => Self::Neutral,
        }
    }
}

impl From<FlowStatus> for CoreFlowStatus {
    fn from(status: FlowStatus) -> Self {
        match status {
            FlowStatus::Deficit => Self::Deficit,
            FlowStatus::Surplus => Self::Surplus,
            FlowStatus::Neutral => Self::Neutral,
        }
    }
}
