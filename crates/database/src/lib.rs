//! Hellospring Database Crate
//!
//! Persistence for `Member` records: connection management, the embedded
//! `member` migration, and repository implementations.

use hellospring_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::{prepare_database, DatabaseConnection};
pub use migrations::run_migrations;

pub use entities::Member;
pub use repos::{MemberRepository, MemberStore, MemoryMemberStore};
pub use types::{StorageError, StorageResult};

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> StorageResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| StorageError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| StorageError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}
