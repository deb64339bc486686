//! Shared types and models for the Storehouse Ledger
//!
//! This crate contains the domain model, the finance invariant arithmetic,
//! and the generic list-query types used by every list endpoint. It performs
//! no I/O; everything here is pure and unit-testable.

pub mod finance;
pub mod models;
pub mod query;
pub mod types;

pub use finance::*;
pub use models::*;
pub use query::*;
pub use types::*;
