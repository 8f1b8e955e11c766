//! Core business logic for Fluxo.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `flow` - Monthly cash-flow reallocation and planned-vs-realized comparison
//! - `auth` - Password hashing

pub mod auth;
pub mod flow;
