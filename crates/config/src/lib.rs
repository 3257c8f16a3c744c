use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "hellospring.toml",
    "config/hellospring.toml",
    "crates/config/hellospring.toml",
    "../hellospring.toml",
    "../config/hellospring.toml",
];

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "HELLOSPRING_CONFIG";

const ENV_PREFIX: &str = "HELLOSPRING";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Where the `member` table lives and how many pooled connections may reach it.
///
/// ```
/// use hellospring_config::DatabaseConfig;
///
/// let database = DatabaseConfig::default();
/// assert_eq!(database.url, "sqlite://hellospring.db");
/// assert_eq!(database.max_connections, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://hellospring.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use hellospring_config::load;
///
/// std::env::remove_var("HELLOSPRING_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.database.url.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("database.url", defaults.database.url.clone())
        .context("unable to register database url default")?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )
        .context("unable to register database pool size default")?;

    let environment_overrides = config::Environment::with_prefix(ENV_PREFIX).separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via HELLOSPRING_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    ensure!(
        config.database.max_connections > 0,
        "invalid configuration: database.max_connections must be at least 1"
    );

    debug!(?config, "loaded configuration");
    Ok(config)
}
