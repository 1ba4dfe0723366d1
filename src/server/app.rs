use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::Method,
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use super::errors::ErrorBody;
use super::handlers::{dashboard, health, size_charts, storefront};
use crate::auth::SessionVerifier;
use crate::services::{SizeChart, SizeChartService, SizeChartSummary};

#[derive(Clone)]
pub struct AppState {
    pub charts: SizeChartService,
    pub sessions: Arc<dyn SessionVerifier>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, sessions: Arc<dyn SessionVerifier>) -> Self {
        Self {
            charts: SizeChartService::new(db),
            sessions,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        storefront::get_size_chart,
        size_charts::list_size_charts,
        size_charts::create_size_chart,
        size_charts::get_size_chart,
        size_charts::update_size_chart,
        size_charts::delete_size_chart,
        dashboard::dashboard,
    ),
    components(schemas(
        SizeChart,
        SizeChartSummary,
        size_charts::SizeChartRequest,
        size_charts::MutationResponse,
        storefront::ChartLookupResponse,
        dashboard::DashboardResponse,
        ErrorBody,
    )),
    modifiers(&SessionTokenAddon),
    tags(
        (name = "storefront", description = "Public chart lookup for storefront pages"),
        (name = "admin", description = "Size chart management for the embedded admin app")
    )
)]
pub struct ApiDoc;

struct SessionTokenAddon;

impl Modify for SessionTokenAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub async fn create_app(
    db: DatabaseConnection,
    sessions: Arc<dyn SessionVerifier>,
) -> Result<Router> {
    let state = AppState::new(db, sessions);

    let app = Router::new()
        .route("/health", get(health::health_check))
        .merge(storefront_routes())
        .merge(admin_routes())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    Ok(app)
}

/// Storefront scripts call from shop origins, so only this route gets CORS.
fn storefront_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route(
            "/size-chart",
            get(storefront::get_size_chart).options(storefront::preflight),
        )
        .layer(cors)
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/size-charts",
            get(size_charts::list_size_charts).post(size_charts::create_size_chart),
        )
        .route(
            "/size-charts/:id",
            get(size_charts::get_size_chart)
                .put(size_charts::update_size_chart)
                .delete(size_charts::delete_size_chart),
        )
        .route("/dashboard", get(dashboard::dashboard))
}
