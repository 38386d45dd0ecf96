// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, String),

    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, String),
}

/// Returns the default search paths for `filename`
/// (current directory → XDG config → /etc).
pub fn config_search_paths(app: &str, filename: &str) -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(filename)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(app).join(filename));
    }
    paths.push(PathBuf::from("/etc").join(app).join(filename));
    paths
}

fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;
    toml::from_str::<T>(&content).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))
}

/// Trait for loading a whole-file TOML configuration.
pub trait ConfigFile: Sized + Default + DeserializeOwned {
    /// File name looked up in each search directory (e.g. `"polctl.toml"`).
    fn config_filename() -> &'static str;

    /// Ordered candidate paths; the first existing file wins.
    fn default_search_paths() -> Vec<PathBuf>;

    /// Load from a specific file path.
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this type.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        load_toml(path)
    }

    /// Search [`Self::default_search_paths`] and load the first file found.
    ///
    /// Returns `(config, path_where_found)` or `(Default::default(), None)`
    /// when no config file exists.
    fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in Self::default_search_paths() {
            if path.exists() {
                let cfg = Self::load_from_file(&path)?;
                return Ok((cfg, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }
}
