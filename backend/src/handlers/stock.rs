//! HTTP handlers for stock items and batches

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentActor;
use crate::services::stock::{
    AddBatchInput, AmendBatchInput, AmendedBatchView, BatchFinanceView, CreateItemWithBatchInput,
    DeleteResult, StockService, UpdateItemInput,
};
use crate::AppState;
use shared::{Batch, ListQuery, Page, StockItem, StockKind};

/// List-query parameters plus the optional kind restriction
#[derive(Debug, Deserialize)]
pub struct ListItemsParams {
    #[serde(flatten)]
    pub query: ListQuery,
    pub kind: Option<StockKind>,
}

/// Create a stock item together with its first batch
pub async fn create_item_with_batch(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(input): Json<CreateItemWithBatchInput>,
) -> AppResult<Json<BatchFinanceView>> {
    let service = StockService::new(state.db);
    let view = service.create_item_with_batch(actor.0, input).await?;
    Ok(Json(view))
}

/// List stock items
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ListItemsParams>,
) -> AppResult<Json<Page<StockItem>>> {
    let service = StockService::new(state.db);
    let page = service.list_items(params.kind, &params.query).await?;
    Ok(Json(page))
}

/// Edit item metadata
pub async fn update_item(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<StockItem>> {
    let service = StockService::new(state.db);
    let item = service.update_item(actor.0, item_id, input).await?;
    Ok(Json(item))
}

/// Soft-delete a stock item
pub async fn delete_item(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<DeleteResult>> {
    let service = StockService::new(state.db);
    let result = service.delete_item(actor.0, item_id).await?;
    Ok(Json(result))
}

/// Add a batch to an existing stock item
pub async fn add_batch(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(item_id): Path<Uuid>,
    Json(input): Json<AddBatchInput>,
) -> AppResult<Json<BatchFinanceView>> {
    let service = StockService::new(state.db);
    let view = service.add_batch(actor.0, item_id, input).await?;
    Ok(Json(view))
}

/// List a stock item's batches
pub async fn list_batches(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<Batch>>> {
    let service = StockService::new(state.db);
    let page = service.list_batches(item_id, &query).await?;
    Ok(Json(page))
}

/// Amend a batch and reconcile its postings
pub async fn amend_batch(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<AmendBatchInput>,
) -> AppResult<Json<AmendedBatchView>> {
    let service = StockService::new(state.db);
    let view = service.amend_batch(actor.0, batch_id, input).await?;
    Ok(Json(view))
}

/// Soft-delete a batch
pub async fn delete_batch(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<DeleteResult>> {
    let service = StockService::new(state.db);
    let result = service.delete_batch(actor.0, batch_id).await?;
    Ok(Json(result))
}
