// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! OAuth2 client-credentials exchange against a workspace's token endpoint.

use polctl_app::join_url;
use polctl_core::{AuthConfig, Workspace};
use polctl_protocol::{ClientCredentials, OAuthError, TokenResponse};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Polaris' built-in token endpoint, relative to `server.api`.
pub const TOKEN_PATH: &str = "/api/catalog/v1/oauth/tokens";

/// Token URL plus the scope its provider declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEndpoint {
    pub url: String,
    pub scope: Option<String>,
}

#[derive(Clone)]
pub struct TokenExchanger {
    http: reqwest::Client,
}

impl TokenExchanger {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Where to exchange credentials for `workspace`.
    ///
    /// The first internal provider wins. OIDC providers need an interactive
    /// flow this client does not have.
    pub fn token_endpoint(workspace: &Workspace) -> Result<TokenEndpoint, AuthError> {
        let mut oidc_only = false;
        for auth in &workspace.auth {
            match auth {
                AuthConfig::Internal { url, .. } if !url.trim().is_empty() => {
                    let scope = auth.scope().trim();
                    return Ok(TokenEndpoint {
                        url: url.trim().to_string(),
                        scope: (!scope.is_empty()).then(|| scope.to_string()),
                    });
                }
                AuthConfig::Internal { .. } => {}
                AuthConfig::Oidc { .. } => oidc_only = true,
            }
        }
        if oidc_only {
            return Err(AuthError::UnsupportedProvider("oidc"));
        }

        workspace
            .api_base()
            .map(|base| TokenEndpoint {
                url: join_url(base, TOKEN_PATH),
                scope: None,
            })
            .ok_or_else(|| AuthError::NoTokenEndpoint(workspace.name.clone()))
    }

    pub async fn exchange(
        &self,
        endpoint: &str,
        credentials: &ClientCredentials,
        realm_header: &str,
        realm: &str,
    ) -> Result<TokenResponse, AuthError> {
        info!(
            "Requesting token from {} for client '{}' (realm {})",
            endpoint, credentials.client_id, realm
        );

        let response = self
            .http
            .post(endpoint)
            .header(realm_header, realm)
            .form(&credentials.form())
            .send()
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            let token: TokenResponse =
                serde_json::from_slice(&bytes).map_err(|e| AuthError::Decode(e.to_string()))?;
            if token.access_token.is_empty() {
                return Err(AuthError::Decode("empty access_token".to_string()));
            }
            debug!("Token issued, expires_in={:?}", token.expires_in);
            return Ok(token);
        }

        if let Ok(err) = serde_json::from_slice::<OAuthError>(&bytes) {
            warn!("Token endpoint rejected credentials: {}", err.error);
            return Err(AuthError::Rejected(err.message().to_string()));
        }
        Err(AuthError::Status {
            status: status.as_u16(),
            message: String::from_utf8_lossy(&bytes).trim().to_string(),
        })
    }
}
