//! Payment and debt postings

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{CorrelationRef, PaymentType};

/// Money actually transferred for one event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub amount: Decimal,
    pub from_party: Uuid,
    pub to_party: Uuid,
    pub payment_type: PaymentType,
    pub correlation: CorrelationRef,
    pub created_at: DateTime<Utc>,
}

/// Money still owed for the same event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: Uuid,
    pub amount: Decimal,
    pub from_party: Uuid,
    pub to_party: Uuid,
    pub correlation: CorrelationRef,
    pub created_at: DateTime<Utc>,
}
