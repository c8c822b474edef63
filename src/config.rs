//! Environment-driven configuration and logging setup.

use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub const ROOT_ENV: &str = "MICROCOSM_ROOT";
pub const CATALOG_ENV: &str = "MICROCOSM_CATALOG";
pub const LOG_ENV: &str = "MICROCOSM_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Data root hint; validated later by [`crate::find_data_root`].
    pub root: Option<PathBuf>,
    /// Explicit catalog file, bypassing root discovery.
    pub catalog: Option<PathBuf>,
    pub log_filter: String,
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup so tests need not touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            root: non_empty(ROOT_ENV).map(PathBuf::from),
            catalog: non_empty(CATALOG_ENV).map(PathBuf::from),
            log_filter: non_empty(LOG_ENV)
                .or_else(|| non_empty("RUST_LOG"))
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

/// Install the global fmt subscriber on stderr.
///
/// An unparsable filter falls back to the default level with a warning.
pub fn init_tracing(config: &Config) {
    let (filter, rejected) = match EnvFilter::try_new(&config.log_filter) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(DEFAULT_LOG_FILTER), Some(err)),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if let Some(err) = rejected {
        warn!("Invalid {LOG_ENV} value '{}': {err}", config.log_filter);
    }
    if installed {
        info!("microcosm-log v{} starting", env!("CARGO_PKG_VERSION"));
    }
}
