//! Route definitions for the Storehouse Ledger

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Stock items and their batches
        .nest("/stock", stock_routes())
        // Batch amendment and deletion
        .nest("/batches", batch_routes())
        // Movement log
        .nest("/movements", movement_routes())
        // Payment and debt listings
        .nest("/finance", finance_routes())
        // KPI reports
        .nest("/reports", report_routes())
}

fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_item_with_batch))
        .route("/", get(handlers::list_items))
        .route("/:id", put(handlers::update_item))
        .route("/:id", delete(handlers::delete_item))
        .route("/:id/batches", post(handlers::add_batch))
        .route("/:id/batches", get(handlers::list_batches))
}

fn batch_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", put(handlers::amend_batch))
        .route("/:id", delete(handlers::delete_batch))
}

fn movement_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_movements))
}

fn finance_routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(handlers::list_payments))
        .route("/debts", get(handlers::list_debts))
}

fn report_routes() -> Router<AppState> {
    Router::new().route("/kpi", get(handlers::get_kpi_report))
}
