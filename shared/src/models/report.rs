//! KPI report shapes
//!
//! The accumulation arithmetic lives here as pure methods so the report
//! service only has to run queries and feed rows in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MeasurementUnit, StockKind};

/// Remaining stock per kind and measurement unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTotals {
    pub raw_kg: Decimal,
    pub raw_unit: Decimal,
    pub product_kg: Decimal,
    pub product_unit: Decimal,
}

impl StockTotals {
    /// Fold one (kind, unit) bucket into the totals
    pub fn add(&mut self, kind: StockKind, unit: MeasurementUnit, quantity: Decimal) {
        match (kind, unit) {
            (StockKind::RawMaterial, MeasurementUnit::Kg) => self.raw_kg += quantity,
            (StockKind::RawMaterial, MeasurementUnit::Unit) => self.raw_unit += quantity,
            (StockKind::Product, MeasurementUnit::Kg) => self.product_kg += quantity,
            (StockKind::Product, MeasurementUnit::Unit) => self.product_unit += quantity,
        }
    }
}

/// Outstanding balances against external parties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminBalances {
    /// What the organization still owes its suppliers
    pub total_debt_from_suppliers: Decimal,
    /// What clients still owe the organization
    pub total_credit_from_clients: Decimal,
}

/// Full KPI rollup for one time window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiReport {
    pub stock: StockTotals,
    pub total_profit: Decimal,
    pub admin: AdminBalances,
}

/// Profit contributed by one sale
pub fn profit_contribution(
    sell_price: Decimal,
    buy_price: Decimal,
    sold_amount: Decimal,
) -> Decimal {
    (sell_price - buy_price) * sold_amount
}
