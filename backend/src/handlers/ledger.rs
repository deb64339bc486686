//! HTTP handlers for payment and debt listings

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::AppResult;
use crate::services::LedgerService;
use crate::AppState;
use shared::{Debt, ListQuery, Page, Payment};

/// List payments
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<Payment>>> {
    let service = LedgerService::new(state.db);
    let page = service.list_payments(&query).await?;
    Ok(Json(page))
}

/// List debts
pub async fn list_debts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<Debt>>> {
    let service = LedgerService::new(state.db);
    let page = service.list_debts(&query).await?;
    Ok(Json(page))
}
