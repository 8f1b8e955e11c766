//! `SeaORM` entity definitions.

pub mod budget_entries;
pub mod sea_orm_active_enums;
pub mod users;
