use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for opening a document store
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the local database file (None for in-memory)
    pub path: Option<PathBuf>,
    /// Optional Turso URL; with `path` set the local file becomes an embedded replica
    pub sync_url: Option<String>,
    /// Optional Turso auth token
    pub auth_token: Option<String>,
    /// Per-operation timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl StoreConfig {
    /// File-backed configuration for local development
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_in_memory_without_timeout() {
        let config = StoreConfig::default();
        assert!(config.path.is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_local() {
        let config = StoreConfig::local("/tmp/parley/messages.db");
        assert_eq!(config.path, Some(PathBuf::from("/tmp/parley/messages.db")));
        assert!(config.sync_url.is_none());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"path": "data/messages.db", "timeout_secs": 5}"#).unwrap();
        assert_eq!(config.path, Some(PathBuf::from("data/messages.db")));
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert!(config.auth_token.is_none());
    }
}
