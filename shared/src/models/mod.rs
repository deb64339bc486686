//! Domain models for the Storehouse Ledger

mod ledger;
mod movement;
mod party;
mod report;
mod sale;
mod stock;

pub use ledger::*;
pub use movement::*;
pub use party::*;
pub use report::*;
pub use sale::*;
pub use stock::*;
