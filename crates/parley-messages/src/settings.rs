//! Runtime settings for the message store
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults (cap 100, window 30 days, in-memory store)
//! 2. An optional TOML file
//! 3. Environment variables prefixed `PARLEY_`, nested keys joined with `__`
//!    (e.g. `PARLEY_RESULT_CAP=50`, `PARLEY_STORE__PATH=/var/lib/parley.db`)

use crate::selection::{SelectionPolicy, DEFAULT_RECENT_WINDOW_DAYS, DEFAULT_RESULT_CAP};
use chrono::Utc;
use config::{Config, Environment, File};
use parley_storage::StoreConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const ENV_PREFIX: &str = "PARLEY";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageSettings {
    /// Records returned by a capped lookup
    pub result_cap: u32,
    /// Days covered by a recent-window lookup
    pub recent_window_days: i64,
    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            result_cap: DEFAULT_RESULT_CAP,
            recent_window_days: DEFAULT_RECENT_WINDOW_DAYS,
            store: StoreConfig::default(),
        }
    }
}

impl MessageSettings {
    /// Load from defaults and the environment
    pub fn load() -> Result<Self, SettingsError> {
        Self::build(None)
    }

    /// Load from defaults, `path` (if it exists) and the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::build(Some(path.as_ref()))
    }

    fn build(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            .set_default("result_cap", i64::from(DEFAULT_RESULT_CAP))?
            .set_default("recent_window_days", DEFAULT_RECENT_WINDOW_DAYS)?;

        if let Some(path) = path {
            debug!("Reading settings file {:?}", path);
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings: MessageSettings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.result_cap == 0 {
            return Err(SettingsError::Invalid(
                "result_cap must be at least 1".to_string(),
            ));
        }
        if self.recent_window_days <= 0 {
            return Err(SettingsError::Invalid(format!(
                "recent_window_days must be positive, got {}",
                self.recent_window_days
            )));
        }

        // The cutoff (now - window) must be a representable instant
        let reachable = chrono::Duration::try_days(self.recent_window_days)
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .is_some();
        if !reachable {
            return Err(SettingsError::Invalid(format!(
                "recent_window_days is too large, got {}",
                self.recent_window_days
            )));
        }
        Ok(())
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        let window = chrono::Duration::try_days(self.recent_window_days)
            .unwrap_or(chrono::Duration::MAX);
        SelectionPolicy::new(self.result_cap, window)
    }
}
