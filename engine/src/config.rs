//! Configuration loading from `~/.almacen/config.toml`.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8080/api"
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [app]
//! ascii_only = false
//! high_contrast = false
//! reduced_motion = false
//! ```

use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use almacen_client::{ClientConfig, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use almacen_types::UiOptions;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Environment variable that overrides `[api] base_url`.
pub const BASE_URL_ENV: &str = "ALMACEN_API_URL";

#[derive(Debug, Default, Deserialize)]
pub struct AlmacenConfig {
    pub api: Option<ApiConfig>,
    pub app: Option<AppConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend; `/auth/signin` is appended. Supports `${VAR}` expansion.
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for icons and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable panel animations and spinner motion.
    #[serde(default)]
    pub reduced_motion: bool,
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(end_rel) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + end_rel];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[start + 2 + end_rel + 1..];
    }

    out.push_str(rest);
    out
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".almacen").join("config.toml"))
}

/// Pick the base URL: environment override, then config, then the default.
/// Blank values are skipped.
#[must_use]
pub fn resolve_base_url(configured: Option<&str>, env_override: Option<String>) -> String {
    env_override
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            configured
                .map(|raw| expand_env_vars(raw).trim().to_string())
                .filter(|value| !value.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

impl AlmacenConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Missing file is `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        let configured = self.api.as_ref().and_then(|api| api.base_url.as_deref());
        resolve_base_url(configured, env::var(BASE_URL_ENV).ok())
    }

    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let api = self.api.as_ref();
        let timeout = api
            .and_then(|api| api.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let connect_timeout = api
            .and_then(|api| api.connect_timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        ClientConfig::new(self.base_url())
            .with_timeout(Duration::from_secs(timeout))
            .with_connect_timeout(Duration::from_secs(connect_timeout))
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
                reduced_motion: app.reduced_motion,
            })
            .unwrap_or_default()
    }
}
