use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::AdminSession;
use crate::errors::CoreError;
use crate::server::app::AppState;
use crate::services::SizeChartSummary;

const LATEST_CHARTS: u64 = 3;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub chart_count: u64,
    pub latest_charts: Vec<SizeChartSummary>,
}

#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "admin",
    security(("session_token" = [])),
    responses(
        (status = 200, description = "Chart count and the newest charts", body = DashboardResponse),
        (status = 401, description = "Missing or invalid session token", body = crate::server::errors::ErrorBody)
    )
)]
pub async fn dashboard(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, CoreError> {
    let chart_count = state.charts.count().await?;
    let latest_charts = state.charts.list_latest(LATEST_CHARTS).await?;

    Ok(Json(DashboardResponse {
        chart_count,
        latest_charts,
    }))
}
