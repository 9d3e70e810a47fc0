//! Configuration loading.
//!
//! Resolution order: explicit file, then `./wq.toml` when present, then
//! built-in defaults. Environment variables (`WQ_*`) override whatever the
//! file provided.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{WqError, WqResult};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "wq.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WqConfig {
    pub source: SourceConfig,
    pub graph: GraphConfig,
    pub sync: SyncConfig,
    pub server: ServerConfig,
}

/// Relational snapshot location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/wikiquran.db"),
        }
    }
}

/// Which storage engine holds the materialized graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphBackend {
    Neo4j,
    Sqlite,
}

impl GraphBackend {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> WqResult<Self> {
        match s.to_lowercase().as_str() {
            "neo4j" => Ok(Self::Neo4j),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(WqError::config(format!(
                "unknown graph backend '{}' (expected neo4j or sqlite)",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neo4j => "neo4j",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Configuration for the graph store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub backend: GraphBackend,
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
    /// Database file used when `backend = "sqlite"`.
    pub sqlite_path: PathBuf,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            backend: GraphBackend::Neo4j,
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
            max_connections: 8,
            sqlite_path: PathBuf::from("data/graph.db"),
        }
    }
}

/// Synthesis job tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Rows per upsert round-trip.
    pub batch_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { batch_size: 500 }
    }
}

/// HTTP server binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl WqConfig {
    /// Load configuration from `path`, or `./wq.toml`, or defaults, then
    /// apply `WQ_*` environment overrides.
    pub fn load(path: Option<&Path>) -> WqResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file.
    pub fn from_file(path: &Path) -> WqResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Parse TOML text.
    pub fn from_toml(content: &str) -> WqResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> WqResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("WQ_SOURCE_DB") {
            self.source.path = PathBuf::from(v);
        }
        if let Some(v) = lookup("WQ_GRAPH_BACKEND") {
            self.graph.backend = GraphBackend::parse(&v)?;
        }
        if let Some(v) = lookup("WQ_NEO4J_URI") {
            self.graph.uri = v;
        }
        if let Some(v) = lookup("WQ_NEO4J_USER") {
            self.graph.user = v;
        }
        if let Some(v) = lookup("WQ_NEO4J_PASSWORD") {
            self.graph.password = v;
        }
        if let Some(v) = lookup("WQ_NEO4J_DATABASE") {
            self.graph.database = v;
        }
        if let Some(v) = lookup("WQ_GRAPH_DB") {
            self.graph.sqlite_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("WQ_SYNC_BATCH_SIZE") {
            self.sync.batch_size = parse_number("WQ_SYNC_BATCH_SIZE", &v)?;
        }
        if let Some(v) = lookup("WQ_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("WQ_PORT") {
            self.server.port = parse_number("WQ_PORT", &v)?;
        }
        Ok(())
    }

    /// Reject values the rest of the system cannot work with.
    pub fn validate(&self) -> WqResult<()> {
        if self.sync.batch_size == 0 {
            return Err(WqError::config("sync.batch_size must be at least 1"));
        }
        if self.graph.backend == GraphBackend::Neo4j && self.graph.max_connections == 0 {
            return Err(WqError::config("graph.max_connections must be at least 1"));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> WqResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| WqError::config(format!("{} must be a number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = WqConfig::default();
        assert_eq!(config.sync.batch_size, 500);
        assert_eq!(config.graph.backend, GraphBackend::Neo4j);
        assert_eq!(config.graph.uri, "bolt://localhost:7687");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WqConfig::from_toml(
            "[graph]\nbackend = \"sqlite\"\nsqlite_path = \"/tmp/g.db\"\n\n[sync]\nbatch_size = 250\n",
        )
        .unwrap();
        assert_eq!(config.graph.backend, GraphBackend::Sqlite);
        assert_eq!(config.graph.sqlite_path, PathBuf::from("/tmp/g.db"));
        assert_eq!(config.graph.user, "neo4j");
        assert_eq!(config.sync.batch_size, 250);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_unknown_backend_in_toml_is_rejected() {
        assert!(WqConfig::from_toml("[graph]\nbackend = \"mysql\"\n").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("WQ_GRAPH_BACKEND", "SQLite"),
            ("WQ_NEO4J_PASSWORD", "secret"),
            ("WQ_SYNC_BATCH_SIZE", "1000"),
            ("WQ_PORT", "9000"),
        ]
        .into_iter()
        .collect();

        let mut config = WqConfig::default();
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.graph.backend, GraphBackend::Sqlite);
        assert_eq!(config.graph.password, "secret");
        assert_eq!(config.sync.batch_size, 1000);
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_bad_env_number() {
        let mut config = WqConfig::default();
        let err = config
            .apply_env(|k| (k == "WQ_SYNC_BATCH_SIZE").then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, WqError::Config(_)));
    }

    #[test]
    fn test_zero_batch_size_is_invalid() {
        let mut config = WqConfig::default();
        config.sync.batch_size = 0;
        assert!(config.validate().is_err());
    }
}
