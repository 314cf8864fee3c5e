//! Application settings loaded from `config.toml`.
//!
//! The file names the database, the user whose budgets are tracked, the near-limit
//! threshold used for progress status, whether writes are mirrored to a remote store,
//! and a list of budgets that are upserted on start-up.

use crate::core::progress::DEFAULT_NEAR_LIMIT_PERCENT;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Database URL; `DATABASE_URL` in the environment takes precedence
    #[serde(default)]
    pub database_url: Option<String>,
    /// User whose records the binary works with
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Percentage at which a budget counts as near its limit
    #[serde(default = "default_near_limit_percent")]
    pub near_limit_percent: i64,
    /// Remote sync settings
    #[serde(default)]
    pub sync: SyncConfig,
    /// Budgets to upsert on start-up
    #[serde(default)]
    pub budgets: Vec<BudgetSeed>,
}

/// Remote sync settings
#[derive(Debug, Default, Deserialize)]
pub struct SyncConfig {
    /// Mirror every local write to an in-process remote store
    #[serde(default)]
    pub mirror_to_memory_remote: bool,
}

/// A single budget to seed
#[derive(Debug, Deserialize, Clone)]
pub struct BudgetSeed {
    /// Expense category name
    pub category: String,
    /// Ceiling for the month
    pub amount: f64,
    /// Month (1-12); defaults to the current month
    #[serde(default)]
    pub month: Option<u32>,
    /// Year; defaults to the current year
    #[serde(default)]
    pub year: Option<i32>,
}

fn default_user_id() -> String {
    "local".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

const fn default_near_limit_percent() -> i64 {
    DEFAULT_NEAR_LIMIT_PERCENT
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            user_id: default_user_id(),
            log_filter: default_log_filter(),
            near_limit_percent: default_near_limit_percent(),
            sync: SyncConfig::default(),
            budgets: Vec::new(),
        }
    }
}

/// Parses settings from a TOML string.
///
/// # Errors
/// Returns an error if the TOML is malformed or a seed has a negative amount.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents)?;

    if let Some(seed) = config
        .budgets
        .iter()
        .find(|seed| !seed.amount.is_finite() || seed.amount < 0.0)
    {
        return Err(Error::Config {
            message: format!(
                "Budget seed for '{}' has invalid amount {}",
                seed.category, seed.amount
            ),
        });
    }

    Ok(config)
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A budget seed is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads `./config.toml`, falling back to defaults when the file does not exist.
pub fn load_default_config() -> Result<AppConfig> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_config(path)
    } else {
        tracing::info!("No config.toml found, using default settings");
        Ok(AppConfig::default())
    }
}
