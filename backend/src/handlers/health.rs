//! Service health endpoint

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Whether the ledger store answered a round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageStatus {
    Reachable,
    Unreachable,
}

impl StorageStatus {
    fn status_code(self) -> StatusCode {
        match self {
            StorageStatus::Reachable => StatusCode::OK,
            StorageStatus::Unreachable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub service: &'static str,
    pub version: &'static str,
    pub storage: StorageStatus,
}

/// Liveness endpoint; answers 503 when the store is unreachable so a
/// load balancer can rotate the instance out
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let storage = match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => StorageStatus::Reachable,
        Err(e) => {
            tracing::warn!("health check could not reach the ledger store: {}", e);
            StorageStatus::Unreachable
        }
    };

    (
        storage.status_code(),
        Json(HealthStatus {
            service: "storehouse-ledger",
            version: env!("CARGO_PKG_VERSION"),
            storage,
        }),
    )
}
