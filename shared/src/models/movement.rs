//! Movement log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::MovementAction;

/// Immutable audit record of one stock-affecting action
///
/// Written once by the transaction coordinator and never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementLogEntry {
    pub id: Uuid,
    pub stock_item_id: Uuid,
    pub batch_id: Option<Uuid>,
    pub action: MovementAction,
    pub comment: String,
    pub actor_id: Uuid,
    pub created_at: DateTime<Utc>,
}
