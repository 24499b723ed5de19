use std::path::Path;

use serde::{Deserialize, Serialize};

use nf_core::{NfError, NfResult};

/// Runtime configuration loaded from a TOML file, with `NOTEFUL_*`
/// environment variables taking precedence over file values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub server: ServerSection,
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind_host: String,
    pub rest_port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_host: "127.0.0.1".into(),
            rest_port: 8000,
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub data_dir: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_dir: "data".into(),
        }
    }
}

impl RuntimeConfig {
    /// Load config from `path`. A missing file is not an error: defaults
    /// apply, and env overrides still run.
    pub fn load(path: &Path) -> NfResult<Self> {
        let config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| NfError::Config(format!("failed to read {}: {e}", path.display())))?;
            toml::from_str(&raw)
                .map_err(|e| NfError::Config(format!("failed to parse {}: {e}", path.display())))?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(host) = non_empty_env("NOTEFUL_BIND_HOST") {
            self.server.bind_host = host;
        }
        if let Some(port) = non_empty_env("NOTEFUL_PORT").and_then(|p| p.parse().ok()) {
            self.server.rest_port = port;
        }
        if let Some(dir) = non_empty_env("NOTEFUL_DATA_DIR") {
            self.storage.data_dir = dir;
        }
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_local_only() {
        let config = RuntimeConfig::default();
        assert_eq!(config.server.bind_host, "127.0.0.1");
        assert_eq!(config.server.rest_port, 8000);
        assert!(config.server.cors_allowed_origins.is_empty());
        assert_eq!(config.storage.data_dir, "data");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            [server]
            rest_port = 9000

            [storage]
            data_dir = "/var/lib/noteful"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.rest_port, 9000);
        assert_eq!(config.server.bind_host, "127.0.0.1");
        assert_eq!(config.storage.data_dir, "/var/lib/noteful");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let config = RuntimeConfig::load(Path::new("/nonexistent/noteful.toml")).unwrap();
        assert_eq!(config.server.rest_port, 8000);
    }
}
