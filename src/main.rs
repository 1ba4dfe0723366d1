use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use sizechart::config::{ServerConfig, ShopifyCredentials};
use sizechart::server;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the admin API and the public storefront lookup
    Serve {
        #[clap(short, long, default_value = "3000")]
        port: u16,
        #[clap(short, long, default_value = "sizechart.db")]
        database: String,
        #[clap(long, env = "SHOPIFY_API_KEY")]
        api_key: String,
        #[clap(long, env = "SHOPIFY_API_SECRET", hide_env_values = true)]
        api_secret: String,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Init {
        #[clap(short, long, default_value = "sizechart.db")]
        database: String,
    },
    Migrate {
        #[clap(subcommand)]
        direction: server::MigrateDirection,
        #[clap(short, long, default_value = "sizechart.db")]
        database: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Serve {
            port,
            database,
            api_key,
            api_secret,
        } => {
            let config = ServerConfig {
                port,
                database_path: database,
                shopify: ShopifyCredentials {
                    api_key,
                    api_secret,
                },
            };
            info!("Starting server on port {}", port);
            server::start_server(&config).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Init { database } => {
                info!("Initializing database: {}", database);
                server::migrate_database(&database, server::MigrateDirection::Up).await?;
            }
            DbCommands::Migrate {
                direction,
                database,
            } => {
                info!("Running database migration: {:?}", direction);
                server::migrate_database(&database, direction).await?;
            }
        },
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_deref()
        .unwrap_or("info")
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter(log_level)))
        .without_time()
        .init();
}

/// sqlx statement logs only appear once the level reaches debug.
fn log_filter(log_level: Level) -> String {
    let sqlx_level = if log_level >= Level::DEBUG {
        log_level
    } else {
        Level::WARN
    };
    format!(
        "sqlx={},sea_orm_migration=info,{}",
        sqlx_level, log_level
    )
}
