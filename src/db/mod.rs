//! Database module providing connection management, migrations, and queries.
//!
//! Query functions take any `ConnectionTrait` so the same code runs against
//! the pool or inside a transaction opened by a service.

pub mod audits;
pub mod cases;
pub mod check_results;
pub mod pages;
pub mod retests;
pub mod statements;
pub mod wcag_definitions;

use std::time::Duration;

use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, DbErr, SqlErr,
    TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::{Config, DatabaseSettings};
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        Self::connect(&config.database).await
    }

    /// Open a pool with explicit settings.
    pub async fn connect(settings: &DatabaseSettings) -> AppResult<Self> {
        let mut options = ConnectOptions::new(settings.url.clone());
        options
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        info!(
            max_connections = settings.max_connections,
            "Database connection established"
        );

        Ok(DbPool { conn })
    }

    /// Get access to the connection for executing queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Begin a transaction. Dropping it without `commit` rolls back.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        let txn = self
            .conn
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;
        Ok(txn)
    }

    /// Apply all pending schema migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))?;
        info!("Database migrations complete");
        Ok(())
    }
}

/// Turn the affected-row count of a versioned update into a result.
///
/// Callers load the row first, so zero rows here means the stored version
/// moved on (or the row was soft-deleted) since the caller read it.
pub(crate) fn check_swapped(rows_affected: u64, what: impl FnOnce() -> String) -> AppResult<()> {
    if rows_affected == 0 {
        let what = what();
        tracing::warn!(record = %what, "Rejected stale write");
        return Err(AppError::ConcurrentModification(what));
    }
    Ok(())
}

/// Whether a write was refused by a unique index.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Version written by a successful compare-and-swap.
pub(crate) fn next_version(expected: i32) -> AppResult<i32> {
    expected
        .checked_add(1)
        .ok_or_else(|| AppError::Integrity("version counter overflow".to_string()))
}
