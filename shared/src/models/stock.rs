//! Stock items and batches

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{MeasurementUnit, StockKind};

/// A raw material or product tracked by the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItem {
    pub id: Uuid,
    pub name: String,
    pub kind: StockKind,
    pub unit: MeasurementUnit,
    /// Low-stock threshold; informational only
    pub min_threshold: Option<Decimal>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One discrete lot of quantity added to a stock item at a unit cost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: Uuid,
    pub stock_item_id: Uuid,
    pub amount: Decimal,
    pub buy_price: Decimal,
    /// Always `amount * buy_price`; re-derived on every amendment
    pub total_cost: Decimal,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
