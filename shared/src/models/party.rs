//! Ledger parties
//!
//! Party management itself lives outside the ledger; the coordinator only
//! needs identity, kind, and active status for its referential checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::PartyKind;

/// A supplier, client, or staff member referenced by ledger rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub id: Uuid,
    pub name: String,
    pub kind: PartyKind,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
