//! mediclerk-core
//!
//! Pure domain types and REST path conventions shared by every MediClerk
//! crate. No HTTP dependency.

pub mod endpoints;
pub mod error;
pub mod models;
