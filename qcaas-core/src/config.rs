//! Configuration system for QCaaS.
//!
//! Uses `figment` for layered configuration: defaults -> user config file -> workspace file ->
//! environment -> CLI overrides. Configuration is loaded from `~/.config/qcaas/config.toml`
//! and/or `qcaas.toml` in the workspace directory. The deployment variables `PORT`,
//! `CORS_ORIGINS` and `LOG_LEVEL` are still honoured on top of the `QCAAS_` prefix.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::{Uncased, UncasedStr},
};
use qcaas_ml::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the workspace-level configuration.
pub const WORKSPACE_CONFIG_FILE: &str = "qcaas.toml";

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// `*` for any origin, otherwise a comma-separated origin list.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl ServerConfig {
    /// `host:port` suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Explicit origin list, or `None` when every origin is allowed.
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let raw = self.cors_origins.trim();
        if raw.is_empty() || raw == "*" {
            return None;
        }
        Some(
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> String {
    "*".to_string()
}

/// Log output settings consumed by the binary's subscriber setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write JSON logs to daily rolling files.
    #[serde(default)]
    pub json_file: bool,
    /// Directory for the JSON log files (defaults to the platform data dir).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_file: false,
            log_dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// User-level config path (`~/.config/qcaas/config.toml` on Linux).
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "qcaas", "qcaas")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Map the bare deployment variables onto their nested config keys.
fn legacy_env_key(key: &UncasedStr) -> Option<Uncased<'_>> {
    match key.as_str().to_ascii_uppercase().as_str() {
        "PORT" => Some("server.port".into()),
        "CORS_ORIGINS" => Some("server.cors_origins".into()),
        "LOG_LEVEL" => Some("logging.level".into()),
        _ => None,
    }
}

/// Load configuration by merging all layers.
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&AppConfig>,
) -> Result<AppConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    // User-level config
    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = ws.join(WORKSPACE_CONFIG_FILE);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Environment variables (QCAAS_SERVER__PORT, QCAAS_PIPELINE__QUANTUM__SHOTS, etc.)
    figment = figment.merge(Env::prefixed("QCAAS_").split("__"));
    figment = figment.merge(Env::raw().filter_map(legacy_env_key));

    // Explicit overrides
    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Load configuration from one explicit file instead of the user/workspace search.
pub fn load_config_file(path: &Path) -> Result<AppConfig, Box<figment::Error>> {
    Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file_exact(path))
        .merge(Env::prefixed("QCAAS_").split("__"))
        .merge(Env::raw().filter_map(legacy_env_key))
        .extract()
        .map_err(Box::new)
}
