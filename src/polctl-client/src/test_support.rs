// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Fixtures shared by the unit tests.

use polctl_core::{AuthConfig, ServerConfig, Workspace};
use wiremock::ResponseTemplate;

/// JSON response with `body` sent verbatim.
pub fn json_response(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body, "application/json")
}

/// Workspace pointing at `api` with one internal provider under it.
pub fn workspace(name: &str, api: &str) -> Workspace {
    Workspace {
        name: name.to_string(),
        description: format!("{name} workspace"),
        is_default: false,
        realm_header: "Polaris-Realm".to_string(),
        realm: "POLARIS".to_string(),
        server: Some(ServerConfig {
            api: api.to_string(),
        }),
        auth: vec![AuthConfig::Internal {
            url: format!("{api}/api/catalog/v1/oauth/tokens"),
            scope: "PRINCIPAL_ROLE:ALL".to_string(),
        }],
    }
}

pub fn two_workspace_manifest() -> String {
    r#"{
        "workspaces": [
            {
                "name": "alpha",
                "description": "Alpha",
                "is_default": true,
                "realm-header": "Polaris-Realm",
                "realm": "ALPHA",
                "server": { "api": "http://alpha.example.com" },
                "auth": [{ "type": "internal", "url": "http://alpha.example.com/api/v1/oauth/tokens", "scope": "PRINCIPAL_ROLE:ALL" }]
            },
            {
                "name": "beta",
                "description": "Beta",
                "is_default": false,
                "realm-header": "X-Tenant",
                "realm": "BETA",
                "server": { "api": "http://beta.example.com" },
                "auth": [{ "type": "oidc", "url": "https://idp.example.com", "client_id": "console", "scope": "openid" }]
            }
        ]
    }"#
    .to_string()
}
