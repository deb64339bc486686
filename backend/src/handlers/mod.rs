//! HTTP handlers for the Storehouse Ledger

mod health;
mod ledger;
mod movement;
mod report;
mod stock;

pub use health::*;
pub use ledger::*;
pub use movement::*;
pub use report::*;
pub use stock::*;
