use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::config::AppConfig;

/// Opens the single-file SQLite store, creating the file if absent.
pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(true);

    let db = SqlitePoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect_with(options)
        .await
        .with_context(|| {
            format!(
                "open sqlite database at {}",
                config.database_path.display()
            )
        })?;
    Ok(db)
}

/// Private in-memory database. A single long-lived connection keeps the
/// data alive for the lifetime of the pool.
#[cfg(test)]
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("open in-memory sqlite database")?;
    Ok(db)
}
