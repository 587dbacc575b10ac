//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$MAILINDEX_CONFIG` (environment variable)
//! 2. `~/.config/mailindex/config.toml` (Linux/macOS)
//!    `%APPDATA%\mailindex\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Search engine connection.
    pub engine: EngineConfig,
    /// Ingestion pipeline tuning.
    pub ingest: IngestConfig,
    /// HTTP API settings.
    pub server: ServerConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Search engine connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of the ZincSearch-compatible engine.
    pub base_url: String,
    /// Basic auth user.
    pub username: String,
    /// Basic auth password.
    pub password: String,
    /// Name of the index documents are written to and searched in.
    pub index: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

/// Ingestion pipeline tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Number of parse/submit workers (0 = number of CPUs).
    pub workers: usize,
    /// Capacity of the queue between the file walker and the workers.
    pub job_queue_capacity: usize,
    /// Capacity of the queue between the workers and the aggregator.
    pub result_queue_capacity: usize,
    /// Log a progress line every this many indexed emails (0 = never).
    pub progress_every: u64,
    /// Forward empty files to the workers so they are counted as skipped.
    pub report_empty_files: bool,
}

/// HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4080".to_string(),
            username: "admin".to_string(),
            password: "admin".to_string(),
            index: "emails".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl EngineConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            job_queue_capacity: 100,
            result_queue_capacity: 100,
            progress_every: 100,
            report_empty_files: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MAILINDEX_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("mailindex").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailindex")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.engine.base_url, "http://localhost:4080");
        assert_eq!(cfg.engine.index, "emails");
        assert_eq!(cfg.ingest.job_queue_capacity, 100);
        assert_eq!(cfg.ingest.result_queue_capacity, 100);
        assert_eq!(cfg.ingest.workers, 0);
        assert!(cfg.ingest.report_empty_files);
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[engine]
base_url = "http://zinc:4080"

[ingest]
workers = 4
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert_eq!(cfg.engine.base_url, "http://zinc:4080");
        assert_eq!(cfg.ingest.workers, 4);
        // Other fields use defaults
        assert_eq!(cfg.engine.username, "admin");
        assert_eq!(cfg.ingest.progress_every, 100);
        assert_eq!(cfg.general.log_level, "warn");
    }

    #[test]
    fn test_request_timeout_never_zero() {
        let engine = EngineConfig {
            request_timeout_secs: 0,
            ..EngineConfig::default()
        };
        assert_eq!(engine.request_timeout(), Duration::from_secs(1));
    }
}
