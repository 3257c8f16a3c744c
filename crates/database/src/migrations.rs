//! Database migrations

use anyhow::Context;
use sqlx::{migrate::Migrator, SqlitePool};
use tracing::info;

// Embedded from crates/database/migrations at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("database migrations failed")?;
    info!("database migrations applied");
    Ok(())
}
