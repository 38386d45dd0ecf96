// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Server-provided default workspace manifest.
//!
//! The manifest is a JSON document shaped like [`WorkspacesConfig`]. Fetching
//! it never fails: any problem is logged and the single built-in default
//! workspace is returned instead.

use std::path::{Path, PathBuf};

use polctl_core::WorkspacesConfig;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub enum ManifestSource {
    /// `GET` a URL (e.g. `https://console.example.com/workspaces.json`).
    Remote { url: String, http: reqwest::Client },
    /// Read a local JSON file.
    File(PathBuf),
    /// No manifest; always the built-in default.
    #[default]
    Builtin,
}

impl ManifestSource {
    pub fn remote(url: impl Into<String>, http: reqwest::Client) -> Self {
        Self::Remote {
            url: url.into(),
            http,
        }
    }

    pub async fn fetch(&self) -> WorkspacesConfig {
        match self {
            Self::Remote { url, http } => match fetch_remote(http, url).await {
                Ok(config) => {
                    debug!("Loaded {} workspace(s) from {}", config.workspaces.len(), url);
                    config
                }
                Err(e) => {
                    warn!("Failed to load workspaces manifest from {}: {}", url, e);
                    WorkspacesConfig::fallback()
                }
            },
            Self::File(path) => match read_file(path).await {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        "Failed to load workspaces manifest {}: {}",
                        path.display(),
                        e
                    );
                    WorkspacesConfig::fallback()
                }
            },
            Self::Builtin => WorkspacesConfig::fallback(),
        }
    }
}

async fn fetch_remote(http: &reqwest::Client, url: &str) -> Result<WorkspacesConfig, String> {
    let response = http.get(url).send().await.map_err(|e| e.to_string())?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("server responded with {}", status));
    }
    let body = response.bytes().await.map_err(|e| e.to_string())?;
    serde_json::from_slice(&body).map_err(|e| format!("invalid manifest: {}", e))
}

async fn read_file(path: &Path) -> Result<WorkspacesConfig, String> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| format!("invalid manifest: {}", e))
}
