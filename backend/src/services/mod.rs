//! Business logic services for the Storehouse Ledger

pub mod ledger;
pub mod movement;
pub mod pagination;
pub mod party;
pub mod report;
pub mod stock;

pub use ledger::LedgerService;
pub use movement::MovementService;
pub use party::PartyService;
pub use report::ReportService;
pub use stock::StockService;
