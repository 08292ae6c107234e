use crate::db::{connect_memory, connect_with_config, DatabaseConfig};
use anyhow::Result;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use std::time::Duration;

#[tokio::test]
async fn test_memory_connection_is_migrated() -> Result<()> {
    let db = connect_memory().await?;
    assert_eq!(db.get_database_backend(), DatabaseBackend::Sqlite);

    let stmt = Statement::from_string(
        DatabaseBackend::Sqlite,
        "SELECT count(*) AS n FROM sqlite_master WHERE type = 'table' AND name IN ('bid_list','curve_point','rating','rule_name','trade','app_user','role','user_role','user_credentials')".to_string(),
    );
    let row = db.query_one(stmt).await?.expect("row");
    let n: i32 = row.try_get("", "n")?;
    assert_eq!(n, 9);
    Ok(())
}

#[tokio::test]
async fn test_custom_config_connection() -> Result<()> {
    let config = DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout: Duration::from_secs(5),
        ..DatabaseConfig::default()
    };
    let db = connect_with_config(&config).await?;
    let row = db
        .query_one(Statement::from_string(DatabaseBackend::Sqlite, "SELECT 1 AS test".to_string()))
        .await?
        .expect("row");
    let value: i32 = row.try_get("", "test")?;
    assert_eq!(value, 1);
    Ok(())
}

#[test]
fn test_config_conversion_uses_seconds() {
    let raw = configs::DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 7,
        min_connections: 3,
        connect_timeout_secs: 4,
        idle_timeout_secs: 5,
        max_lifetime_secs: 6,
        acquire_timeout_secs: 8,
        sqlx_logging: true,
    };
    let cfg = DatabaseConfig::from(&raw);
    assert_eq!(cfg.max_connections, 7);
    assert_eq!(cfg.connect_timeout, Duration::from_secs(4));
    assert_eq!(cfg.acquire_timeout, Duration::from_secs(8));
    assert!(cfg.sqlx_logging);
}
