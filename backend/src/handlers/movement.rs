//! HTTP handlers for the movement log

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::MovementService;
use crate::AppState;
use shared::{ListQuery, MovementLogEntry, Page};

#[derive(Debug, Deserialize)]
pub struct ListMovementsParams {
    #[serde(flatten)]
    pub query: ListQuery,
    pub stock_item_id: Option<Uuid>,
}

/// List movement log entries
pub async fn list_movements(
    State(state): State<AppState>,
    Query(params): Query<ListMovementsParams>,
) -> AppResult<Json<Page<MovementLogEntry>>> {
    let service = MovementService::new(state.db);
    let page = service.list(params.stock_item_id, &params.query).await?;
    Ok(Json(page))
}
