//! HTTP handlers for KPI reports

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::AppResult;
use crate::services::report::{ReportQuery, ReportService};
use crate::AppState;
use shared::KpiReport;

/// KPI rollup for a time window
pub async fn get_kpi_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<KpiReport>> {
    let service = ReportService::new(state.db);
    let report = service.kpi(&query).await?;
    Ok(Json(report))
}
