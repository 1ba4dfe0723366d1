pub mod app;
pub mod errors;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateDirection {
    Up,
    Down,
    Fresh,
}

use crate::auth::ShopifySessionVerifier;
use crate::config::ServerConfig;
use crate::database::{connection::*, migrations::Migrator};
use anyhow::Result;
use sea_orm_migration::prelude::*;
use tracing::info;

pub async fn start_server(config: &ServerConfig) -> Result<()> {
    config.validate()?;

    let db = establish_connection(&config.database_url()).await?;

    setup_database(&db).await?;

    let sessions = Arc::new(ShopifySessionVerifier::new(
        &config.shopify.api_key,
        &config.shopify.api_secret,
    ));
    let app = app::create_app(db, sessions).await?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("Server running on http://{}", config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  /health                     - Health check");
    info!("  /docs                       - Swagger UI documentation");
    info!("  /size-chart                 - Public chart lookup (CORS enabled)");
    info!("  /size-charts[/:id]          - Admin chart management");
    info!("  /dashboard                  - Admin overview");
}

pub async fn migrate_database(database_path: &str, direction: MigrateDirection) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    match direction {
        MigrateDirection::Up => {
            info!("Running migrations up");
            Migrator::up(&db, None).await?;
        }
        MigrateDirection::Down => {
            info!("Running migrations down");
            Migrator::down(&db, None).await?;
        }
        MigrateDirection::Fresh => {
            info!("Running fresh migrations (down then up)");
            Migrator::down(&db, None).await?;
            Migrator::up(&db, None).await?;
        }
    }

    info!("Database migration completed");
    Ok(())
}
