// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for polctl.
//!
//! Supports loading configuration from TOML files with the following search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `./polctl.toml` (current directory)
//! 3. `~/.config/polctl/polctl.toml` (XDG config)
//! 4. `/etc/polctl/polctl.toml` (system-wide)

use std::path::{Path, PathBuf};
use std::time::Duration;

use polctl_app::config::config_search_paths;
use polctl_app::{ConfigError, ConfigFile};
use polctl_core::FileStore;
use serde::{Deserialize, Serialize};

use crate::manifest::ManifestSource;

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Where durable and session state live
    pub storage: StorageConfig,
    /// Default workspaces manifest
    pub manifest: ManifestConfig,
    /// Outbound HTTP settings
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for `console.db` (workspaces, active workspace).
    pub data_dir: Option<PathBuf>,
    /// Directory for `session.db` (tokens).
    pub session_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn durable_path(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.join("console.db"),
            None => FileStore::durable_default_path(),
        }
    }

    pub fn session_path(&self) -> PathBuf {
        match &self.session_dir {
            Some(dir) => dir.join("session.db"),
            None => FileStore::session_default_path(),
        }
    }
}

/// `url` takes precedence over `path`; with neither the built-in default
/// workspace is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub url: Option<String>,
    pub path: Option<PathBuf>,
}

impl ManifestConfig {
    pub fn source(&self, http: &reqwest::Client) -> ManifestSource {
        if let Some(url) = &self.url {
            return ManifestSource::remote(url.clone(), http.clone());
        }
        if let Some(path) = &self.path {
            return ManifestSource::File(path.clone());
        }
        ManifestSource::Builtin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_log_level(self.general.log_level.as_deref())?;

        if self.http.timeout_ms == 0 {
            return Err("[http].timeout_ms must be > 0".to_string());
        }
        if let Some(url) = &self.manifest.url {
            if url.trim().is_empty() {
                return Err("[manifest].url must not be empty when set".to_string());
            }
        }
        validate_path("[manifest].path", self.manifest.path.as_deref())?;
        validate_path("[storage].data_dir", self.storage.data_dir.as_deref())?;
        validate_path("[storage].session_dir", self.storage.session_dir.as_deref())?;

        Ok(())
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        <Self as ConfigFile>::load_from_file(path)
    }

    /// Load configuration from the default search paths.
    /// Returns default config if no config file is found.
    pub fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        <Self as ConfigFile>::load_from_default_paths()
    }

    /// Generate an example configuration as a TOML string.
    pub fn example_toml() -> String {
        let example = ClientConfig {
            general: GeneralConfig {
                log_level: Some("info".to_string()),
            },
            storage: StorageConfig {
                data_dir: Some(PathBuf::from("/var/lib/polctl")),
                session_dir: None,
            },
            manifest: ManifestConfig {
                url: Some("https://console.example.com/workspaces.json".to_string()),
                path: None,
            },
            http: HttpConfig::default(),
        };

        toml::to_string_pretty(&example).unwrap_or_default()
    }
}

fn validate_log_level(level: Option<&str>) -> Result<(), String> {
    if let Some(level) = level {
        match level {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "[general].log_level '{}' is invalid (expected one of: trace, debug, info, warn, error)",
                    level
                ))
            }
        }
    }
    Ok(())
}

fn validate_path(field: &str, path: Option<&Path>) -> Result<(), String> {
    match path {
        Some(p) if p.as_os_str().is_empty() => Err(format!("{field} must not be empty when set")),
        _ => Ok(()),
    }
}

impl ConfigFile for ClientConfig {
    fn config_filename() -> &'static str {
        "polctl.toml"
    }

    fn default_search_paths() -> Vec<PathBuf> {
        config_search_paths("polctl", Self::config_filename())
    }
}
