//! Sale transactions
//!
//! Sales are recorded by a collaborator outside this subsystem; the KPI
//! engine reads them for profit and stock consumption.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One sale of part of a batch to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub client_id: Uuid,
    pub sold_amount: Decimal,
    pub sell_price: Decimal,
    pub created_at: DateTime<Utc>,
}
