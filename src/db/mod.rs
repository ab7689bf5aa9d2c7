pub mod models;

use crate::error::Result;
use crate::sql_constants::{CREATE_DATE_INDEX, CREATE_SCHEDULER_TABLE};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;

pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_SCHEDULER_TABLE).execute(pool).await?;
    sqlx::query(CREATE_DATE_INDEX).execute(pool).await?;

    tracing::debug!("Database schema is up to date");

    Ok(())
}
