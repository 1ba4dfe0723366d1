//! Public, unauthenticated lookup used by storefront scripts.

use axum::{
    extract::{Query, State},
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS},
        StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::server::app::AppState;
use crate::server::errors::ErrorBody;
use crate::services::SizeChart;

pub const ALLOWED_METHODS: &str = "GET, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub product_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChartLookupResponse {
    /// `null` when the product has no chart
    pub chart: Option<SizeChart>,
}

#[utoipa::path(
    get,
    path = "/size-chart",
    tag = "storefront",
    operation_id = "lookup_size_chart",
    params(
        ("productId" = String, Query, description = "Numeric product id or product GID")
    ),
    responses(
        (status = 200, description = "Chart linked to the product, or null", body = ChartLookupResponse),
        (status = 400, description = "productId missing", body = ErrorBody),
        (status = 500, description = "Lookup failed", body = ErrorBody)
    )
)]
pub async fn get_size_chart(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Response {
    let Some(product_id) = query.product_id.filter(|id| !id.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("Product ID required")),
        )
            .into_response();
    };

    match state.charts.find_chart_for_product(&product_id).await {
        Ok(chart) => {
            debug!(product_id = %product_id, found = chart.is_some(), "Storefront chart lookup");
            Json(ChartLookupResponse { chart }).into_response()
        }
        Err(err) => {
            error!(product_id = %product_id, error = %err, "Storefront chart lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("Failed to load size chart")),
            )
                .into_response()
        }
    }
}

/// Bare `OPTIONS` requests; real CORS preflights are answered by the CORS layer.
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS),
            (ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
        ],
    )
}
