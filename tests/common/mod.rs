//! Common utilities for integration tests

use assert_cmd::Command;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;
use todo_scheduler::db::{create_pool, run_migrations};

/// Get the path to the `scheduler` binary
///
/// Prefers `CARGO_BIN_EXE_scheduler`, which cargo sets for integration tests
/// even with a custom target directory.
#[allow(dead_code)]
#[allow(deprecated)] // cargo_bin() is only the fallback
pub fn scheduler_binary() -> PathBuf {
    std::env::var("CARGO_BIN_EXE_scheduler")
        .map(PathBuf::from)
        .unwrap_or_else(|_| assert_cmd::cargo::cargo_bin("scheduler"))
}

/// Create a Command for `scheduler` with the server environment cleared
#[allow(dead_code)]
pub fn scheduler_command() -> Command {
    let mut cmd = Command::new(scheduler_binary());
    cmd.env_remove("TODO_PORT")
        .env_remove("TODO_HOST")
        .env_remove("TODO_DBFILE")
        .env_remove("TODO_WEBDIR")
        .env_remove("TODO_LOGFILE")
        .env_remove("RUST_LOG");
    cmd
}

/// A migrated database living in its own temporary directory
///
/// Keep the returned `TempDir` alive for as long as the pool is used.
#[allow(dead_code)]
pub async fn setup_test_db() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("scheduler.db");

    let pool = create_pool(&db_path).await.unwrap();
    run_migrations(&pool).await.unwrap();

    (pool, temp_dir)
}
