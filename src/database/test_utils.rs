use sea_orm::DatabaseConnection;

use super::connection::{establish_connection, setup_database};

pub async fn setup_test_db() -> DatabaseConnection {
    // In-memory SQLite, one pooled connection
    let db = establish_connection("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");

    setup_database(&db)
        .await
        .expect("Failed to run migrations");

    db
}
