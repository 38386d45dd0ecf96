// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! HTTP clients for the Polaris REST APIs.
//!
//! Every request re-reads the active workspace and its token, so switching
//! workspaces or logging in takes effect on the next call without rebuilding
//! the client.

use std::sync::Arc;

use polctl_app::join_url;
use polctl_protocol::{bearer_header_value, ErrorResponse};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::context::ConsoleContext;
use crate::error::ApiError;
use crate::navigation::{Navigation, Navigator};

pub const MANAGEMENT_PATH: &str = "/api/management/v1";
pub const CATALOG_PATH: &str = "/api/catalog/v1";
pub const POLARIS_CATALOG_PATH: &str = "/api/catalog/polaris/v1";

/// Factory for the per-API [`RestClient`]s.
#[derive(Clone)]
pub struct ApiClient {
    ctx: ConsoleContext,
    http: reqwest::Client,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(ctx: ConsoleContext, http: reqwest::Client, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            ctx,
            http,
            navigator,
        }
    }

    pub fn management(&self) -> RestClient {
        self.client(MANAGEMENT_PATH)
    }

    pub fn catalog(&self) -> RestClient {
        self.client(CATALOG_PATH)
    }

    /// Iceberg REST catalog mounted under the Polaris prefix.
    pub fn polaris(&self) -> RestClient {
        self.client(POLARIS_CATALOG_PATH)
    }

    fn client(&self, path_suffix: &'static str) -> RestClient {
        RestClient {
            api: self.clone(),
            path_suffix,
        }
    }
}

#[derive(Clone)]
pub struct RestClient {
    api: ApiClient,
    path_suffix: &'static str,
}

impl RestClient {
    pub fn path_suffix(&self) -> &'static str {
        self.path_suffix
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send::<(), T>(Method::DELETE, path, None).await
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let ctx = &self.api.ctx;
        let Some(workspace) = ctx.active().get() else {
            return Err(ApiError::MissingBaseUrl);
        };
        let Some(base) = workspace.api_base() else {
            return Err(ApiError::MissingBaseUrl);
        };

        let url = join_url(&join_url(base, self.path_suffix), path);
        debug!("{} {} (workspace '{}')", method, url, workspace.name);

        let mut request = self
            .api
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json")
            .header(workspace.realm_header_name(), workspace.realm.as_str());
        if let Some(token) = ctx.credentials().get_token(&workspace.name) {
            request = request.header(AUTHORIZATION, bearer_header_value(&token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // the workspace captured above, not whatever is active by now
            warn!("{} returned 401, clearing session for '{}'", url, workspace.name);
            if let Err(e) = ctx.credentials().clear_token(&workspace.name) {
                warn!("Failed to clear token for '{}': {}", workspace.name, e);
            }
            self.api.navigator.navigate(Navigation::Login);
            return Err(ApiError::Unauthorized);
        }

        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status, &bytes),
            });
        }
        decode_body(&bytes)
    }
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let result = if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_slice(bytes)
    };
    result.map_err(|e| ApiError::Decode(e.to_string()))
}

fn error_message(status: StatusCode, bytes: &[u8]) -> String {
    if let Ok(envelope) = serde_json::from_slice::<ErrorResponse>(bytes) {
        return envelope.error.message;
    }
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        text.to_string()
    }
}
