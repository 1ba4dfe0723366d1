use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::AdminSession;
use crate::errors::{CoreError, CoreResult};
use crate::server::app::AppState;
use crate::server::errors::ErrorBody;
use crate::server::middleware::{Validate, ValidatedJson};
use crate::services::{
    normalize_product_ids, SizeChart, SizeChartInput, SizeChartSummary, ValidationService,
};

/// Body of create and update requests
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SizeChartRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    /// Replaces the linked products when present
    #[serde(default)]
    pub product_ids: Option<Vec<String>>,
}

impl Validate for SizeChartRequest {
    fn validate(&self) -> CoreResult<()> {
        ValidationService::validate_chart_name(&self.name)?;
        ValidationService::validate_chart_grid(&self.columns, &self.rows)?;
        if let Some(product_ids) = &self.product_ids {
            normalize_product_ids(product_ids.as_slice())?;
        }
        Ok(())
    }

    fn malformed(body: &Value) -> CoreError {
        if !field_has_shape::<Vec<String>>(body, "columns")
            || !field_has_shape::<Vec<Vec<String>>>(body, "rows")
        {
            let field = if field_has_shape::<Vec<String>>(body, "columns") {
                "rows"
            } else {
                "columns"
            };
            return CoreError::invalid_field(field, "Invalid columns or rows format");
        }
        if !field_has_shape::<String>(body, "name") {
            return CoreError::invalid_field("name", "Name must be a string");
        }
        if !field_has_shape::<Option<String>>(body, "description") {
            return CoreError::invalid_field("description", "Description must be a string");
        }
        if !field_has_shape::<Option<Vec<String>>>(body, "productIds") {
            return CoreError::invalid_field("productIds", "Invalid productIds format");
        }
        CoreError::validation("Request body must be a JSON object")
    }
}

/// Absent fields fall back to their defaults, so only present ones are checked.
fn field_has_shape<T: DeserializeOwned>(body: &Value, field: &str) -> bool {
    body.get(field)
        .map_or(true, |value| serde_json::from_value::<T>(value.clone()).is_ok())
}

impl From<SizeChartRequest> for SizeChartInput {
    fn from(request: SizeChartRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            columns: request.columns,
            rows: request.rows,
            product_ids: request.product_ids,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MutationResponse {
    pub success: bool,
    pub id: String,
}

impl MutationResponse {
    fn ok(id: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            id: id.into(),
        })
    }
}

#[utoipa::path(
    get,
    path = "/size-charts",
    tag = "admin",
    security(("session_token" = [])),
    responses(
        (status = 200, description = "All size charts, newest first", body = [SizeChartSummary]),
        (status = 401, description = "Missing or invalid session token", body = ErrorBody)
    )
)]
pub async fn list_size_charts(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<SizeChartSummary>>, CoreError> {
    Ok(Json(state.charts.list_all().await?))
}

#[utoipa::path(
    post,
    path = "/size-charts",
    tag = "admin",
    security(("session_token" = [])),
    request_body = SizeChartRequest,
    responses(
        (status = 200, description = "Size chart created", body = MutationResponse),
        (status = 400, description = "Invalid chart", body = ErrorBody),
        (status = 401, description = "Missing or invalid session token", body = ErrorBody)
    )
)]
pub async fn create_size_chart(
    session: AdminSession,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SizeChartRequest>,
) -> Result<Json<MutationResponse>, CoreError> {
    let chart = state.charts.create(payload.into()).await?;
    info!(shop = %session.shop, chart_id = %chart.id, "Size chart created from admin");

    Ok(MutationResponse::ok(chart.id))
}

#[utoipa::path(
    get,
    path = "/size-charts/{id}",
    tag = "admin",
    security(("session_token" = [])),
    params(
        ("id" = String, Path, description = "Size chart ID")
    ),
    responses(
        (status = 200, description = "Size chart found", body = SizeChart),
        (status = 401, description = "Missing or invalid session token", body = ErrorBody),
        (status = 404, description = "Size chart not found", body = ErrorBody)
    )
)]
pub async fn get_size_chart(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SizeChart>, CoreError> {
    Ok(Json(state.charts.get_by_id(&id).await?))
}

#[utoipa::path(
    put,
    path = "/size-charts/{id}",
    tag = "admin",
    security(("session_token" = [])),
    params(
        ("id" = String, Path, description = "Size chart ID")
    ),
    request_body = SizeChartRequest,
    responses(
        (status = 200, description = "Size chart replaced", body = MutationResponse),
        (status = 400, description = "Invalid chart", body = ErrorBody),
        (status = 401, description = "Missing or invalid session token", body = ErrorBody),
        (status = 404, description = "Size chart not found", body = ErrorBody)
    )
)]
pub async fn update_size_chart(
    session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<SizeChartRequest>,
) -> Result<Json<MutationResponse>, CoreError> {
    let chart = state.charts.update(&id, payload.into()).await?;
    info!(shop = %session.shop, chart_id = %chart.id, "Size chart updated from admin");

    Ok(MutationResponse::ok(chart.id))
}

#[utoipa::path(
    delete,
    path = "/size-charts/{id}",
    tag = "admin",
    security(("session_token" = [])),
    params(
        ("id" = String, Path, description = "Size chart ID")
    ),
    responses(
        (status = 200, description = "Size chart deleted", body = MutationResponse),
        (status = 401, description = "Missing or invalid session token", body = ErrorBody),
        (status = 404, description = "Size chart not found", body = ErrorBody)
    )
)]
pub async fn delete_size_chart(
    session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, CoreError> {
    state.charts.delete(&id).await?;
    info!(shop = %session.shop, chart_id = %id, "Size chart deleted from admin");

    Ok(MutationResponse::ok(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_of(err: &CoreError) -> Option<&str> {
        err.fields()
            .and_then(|fields| fields.get("field"))
            .map(String::as_str)
    }

    #[test]
    fn grid_shape_errors_name_the_field() {
        let err = SizeChartRequest::malformed(&json!({ "name": "T", "columns": "Size" }));
        assert_eq!(err.message(), "Invalid columns or rows format");
        assert_eq!(field_of(&err), Some("columns"));

        let err = SizeChartRequest::malformed(&json!({
            "name": "T",
            "columns": ["Size"],
            "rows": [["S", 1]]
        }));
        assert_eq!(err.message(), "Invalid columns or rows format");
        assert_eq!(field_of(&err), Some("rows"));
    }

    #[test]
    fn other_shape_errors_name_the_field() {
        let err = SizeChartRequest::malformed(&json!({ "name": 5 }));
        assert_eq!(field_of(&err), Some("name"));

        let err = SizeChartRequest::malformed(&json!({ "name": "T", "productIds": "1" }));
        assert_eq!(field_of(&err), Some("productIds"));

        let err = SizeChartRequest::malformed(&json!(["not", "an", "object"]));
        assert!(err.is_validation());
        assert_eq!(field_of(&err), None);
    }
}
