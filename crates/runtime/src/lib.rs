use anyhow::{Context, Result};
use hellospring_config::AppConfig;
use hellospring_database::{initialize_database, DatabaseConnection, MemberStore};
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::EnvFilter;

    /// Filter used when `RUST_LOG` is unset; sqlx statement logging stays quiet.
    pub const DEFAULT_FILTER: &str = "info,sqlx=warn";

    /// Install the global subscriber. Logs go to stderr so command output on
    /// stdout stays clean.
    pub fn init_tracing() -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub database: DatabaseConnection,
    pub members: MemberStore,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise database")?;

        let database = DatabaseConnection::from_pool(db_pool);
        database
            .test_connection()
            .await
            .context("database health check failed")?;

        let members = MemberStore::new(database.pool().clone());

        info!(url = %config.database.url, "member store ready");

        Ok(Self { database, members })
    }

    pub async fn shutdown(self) {
        self.database.close().await;
        info!("database pool closed");
    }
}
