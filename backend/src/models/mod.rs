//! Database models for the Storehouse Ledger
//!
//! Re-exports models from the shared crate; row-decoding structs live next
//! to the services that run the queries.

pub use shared::models::*;
