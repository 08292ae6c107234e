#![cfg(test)]
use sea_orm::DatabaseConnection;

/// A fresh, migrated in-memory database per test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_memory().await
}
