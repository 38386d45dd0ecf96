// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! OAuth client-credentials payloads and bearer token helpers.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

/// Strip the "Bearer " prefix from a token string (case-insensitive).
///
/// If the string starts with "Bearer " (ignoring case), returns the remainder.
/// Otherwise returns the original trimmed string.
pub fn strip_bearer(value: &str) -> &str {
    let trimmed = value.trim();
    let prefix = "bearer ";
    match trimmed.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => trimmed[prefix.len()..].trim_start(),
        _ => trimmed,
    }
}

/// Value for an `Authorization` header carrying `token`.
pub fn bearer_header_value(token: &str) -> String {
    format!("Bearer {}", strip_bearer(token))
}

/// Principal identity used for the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
}

impl ClientCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: scope.into(),
        }
    }

    /// Form fields for `application/x-www-form-urlencoded` token requests.
    pub fn form(&self) -> [(&'static str, &str); 4] {
        [
            ("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("scope", &self.scope),
        ]
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}

/// Successful token endpoint response.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub issued_token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("issued_token_type", &self.issued_token_type)
            .field("scope", &self.scope)
            .finish()
    }
}

/// RFC 6749 error body returned by the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl OAuthError {
    /// Human-readable message, preferring the description.
    pub fn message(&self) -> &str {
        self.error_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&self.error)
    }
}
