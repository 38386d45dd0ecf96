// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Workspace data model.
//!
//! A workspace is a named connection to one catalog deployment: the server
//! base URL, the realm sent with every request, and the ordered list of
//! methods that can produce a bearer token for it.

use serde::{Deserialize, Serialize};

/// Header carrying the realm when a workspace does not name one.
pub const DEFAULT_REALM_HEADER: &str = "Polaris-Realm";

const DEFAULT_WORKSPACE_NAME: &str = "Default Polaris";
const DEFAULT_REALM: &str = "POLARIS";
const DEFAULT_SERVER_API: &str = "http://localhost:8181";
const DEFAULT_TOKEN_URL: &str = "http://localhost:8181/api/v1/oauth/tokens";
pub const DEFAULT_SCOPE: &str = "PRINCIPAL_ROLE:ALL";

/// One way of obtaining a token for a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthConfig {
    /// Client-credentials exchange against the catalog's own token endpoint.
    Internal { url: String, scope: String },
    /// External identity provider.
    Oidc {
        url: String,
        client_id: String,
        scope: String,
    },
}

impl AuthConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Internal { .. } => "internal",
            Self::Oidc { .. } => "oidc",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Internal { url, .. } | Self::Oidc { url, .. } => url,
        }
    }

    pub fn scope(&self) -> &str {
        match self {
            Self::Internal { scope, .. } | Self::Oidc { scope, .. } => scope,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub api: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(rename = "realm-header", default = "default_realm_header")]
    pub realm_header: String,
    #[serde(default)]
    pub realm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub auth: Vec<AuthConfig>,
}

fn default_realm_header() -> String {
    DEFAULT_REALM_HEADER.to_string()
}

impl Workspace {
    /// The hardcoded workspace used whenever nothing better is available.
    pub fn builtin_default() -> Self {
        Self {
            name: DEFAULT_WORKSPACE_NAME.to_string(),
            description: "Default Polaris Workspace".to_string(),
            is_default: true,
            realm_header: DEFAULT_REALM_HEADER.to_string(),
            realm: DEFAULT_REALM.to_string(),
            server: Some(ServerConfig {
                api: DEFAULT_SERVER_API.to_string(),
            }),
            auth: vec![AuthConfig::Internal {
                url: DEFAULT_TOKEN_URL.to_string(),
                scope: DEFAULT_SCOPE.to_string(),
            }],
        }
    }

    /// Header name used to send the realm. Empty values fall back to
    /// [`DEFAULT_REALM_HEADER`].
    pub fn realm_header_name(&self) -> &str {
        let name = self.realm_header.trim();
        if name.is_empty() {
            DEFAULT_REALM_HEADER
        } else {
            name
        }
    }

    /// Copy of this workspace sending `realm` under `realm_header`.
    pub fn with_realm(mut self, realm_header: &str, realm: &str) -> Self {
        self.realm_header = realm_header.to_string();
        self.realm = realm.to_string();
        self
    }

    /// Server base URL, if one is configured.
    pub fn api_base(&self) -> Option<&str> {
        self.server
            .as_ref()
            .map(|s| s.api.trim())
            .filter(|api| !api.is_empty())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("workspace name must not be empty".to_string());
        }
        if self.realm.trim().is_empty() {
            return Err(format!("workspace '{}': realm must not be empty", self.name));
        }
        if self.auth.is_empty() {
            return Err(format!(
                "workspace '{}': at least one auth provider is required",
                self.name
            ));
        }
        for (idx, provider) in self.auth.iter().enumerate() {
            if provider.url().trim().is_empty() {
                return Err(format!(
                    "workspace '{}': auth[{}] ({}) url must not be empty",
                    self.name,
                    idx,
                    provider.kind()
                ));
            }
            if let AuthConfig::Oidc { client_id, .. } = provider {
                if client_id.trim().is_empty() {
                    return Err(format!(
                        "workspace '{}': auth[{}] (oidc) client_id must not be empty",
                        self.name, idx
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspacesConfig {
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
}

impl WorkspacesConfig {
    /// A config holding only [`Workspace::builtin_default`].
    pub fn fallback() -> Self {
        Self {
            workspaces: vec![Workspace::builtin_default()],
        }
    }

    pub fn find(&self, name: &str) -> Option<&Workspace> {
        self.workspaces.iter().find(|ws| ws.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// First workspace flagged default, else the first entry, else the
    /// built-in default.
    pub fn resolve_default(&self) -> Workspace {
        self.workspaces
            .iter()
            .find(|ws| ws.is_default)
            .or_else(|| self.workspaces.first())
            .cloned()
            .unwrap_or_else(Workspace::builtin_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, is_default: bool) -> Workspace {
        Workspace {
            name: name.to_string(),
            is_default,
            ..Workspace::builtin_default()
        }
    }

    #[test]
    fn test_parse_workspace_json() {
        let json = r#"{
            "name": "prod",
            "description": "Production",
            "is_default": false,
            "realm-header": "X-Realm",
            "realm": "PROD",
            "server": { "api": "https://polaris.example.com" },
            "auth": [
                { "type": "internal", "url": "https://polaris.example.com/api/v1/oauth/tokens", "scope": "PRINCIPAL_ROLE:ALL" },
                { "type": "oidc", "url": "https://idp.example.com", "client_id": "console", "scope": "openid" }
            ]
        }"#;
        let ws: Workspace = serde_json::from_str(json).unwrap();
        assert_eq!(ws.realm_header_name(), "X-Realm");
        assert_eq!(ws.api_base(), Some("https://polaris.example.com"));
        assert_eq!(ws.auth.len(), 2);
        assert_eq!(ws.auth[0].kind(), "internal");
        assert_eq!(
            ws.auth[1],
            AuthConfig::Oidc {
                url: "https://idp.example.com".to_string(),
                client_id: "console".to_string(),
                scope: "openid".to_string(),
            }
        );
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let value = serde_json::to_value(Workspace::builtin_default()).unwrap();
        assert_eq!(value["realm-header"], "Polaris-Realm");
        assert_eq!(value["auth"][0]["type"], "internal");
        assert_eq!(value["server"]["api"], "http://localhost:8181");
    }

    #[test]
    fn test_missing_realm_header_defaults() {
        let ws: Workspace = serde_json::from_str(r#"{"name":"a","realm":"R"}"#).unwrap();
        assert_eq!(ws.realm_header_name(), DEFAULT_REALM_HEADER);

        let ws: Workspace =
            serde_json::from_str(r#"{"name":"a","realm":"R","realm-header":""}"#).unwrap();
        assert_eq!(ws.realm_header_name(), DEFAULT_REALM_HEADER);
        assert_eq!(ws.api_base(), None);
    }

    #[test]
    fn test_unknown_auth_type_is_rejected() {
        let json = r#"{"name":"a","realm":"R","auth":[{"type":"saml","url":"x"}]}"#;
        assert!(serde_json::from_str::<Workspace>(json).is_err());
    }

    #[test]
    fn test_resolve_default_prefers_flagged() {
        let config = WorkspacesConfig {
            workspaces: vec![named("W1", true), named("W2", false)],
        };
        assert_eq!(config.resolve_default().name, "W1");

        let config = WorkspacesConfig {
            workspaces: vec![named("W1", false), named("W2", true)],
        };
        assert_eq!(config.resolve_default().name, "W2");
    }

    #[test]
    fn test_resolve_default_falls_back_to_first() {
        let config = WorkspacesConfig {
            workspaces: vec![named("W1", false), named("W2", false)],
        };
        assert_eq!(config.resolve_default().name, "W1");
    }

    #[test]
    fn test_resolve_default_empty_is_builtin() {
        let config = WorkspacesConfig::default();
        assert_eq!(config.resolve_default(), Workspace::builtin_default());
    }

    #[test]
    fn test_with_realm_keeps_identity() {
        let ws = named("W1", false).with_realm("X-Tenant", "ACME");
        assert_eq!(ws.name, "W1");
        assert_eq!(ws.realm_header_name(), "X-Tenant");
        assert_eq!(ws.realm, "ACME");
    }

    #[test]
    fn test_validate() {
        assert!(Workspace::builtin_default().validate().is_ok());

        let mut ws = Workspace::builtin_default();
        ws.auth.clear();
        assert!(ws.validate().is_err());

        let mut ws = Workspace::builtin_default();
        ws.name = "  ".to_string();
        assert!(ws.validate().is_err());

        let mut ws = Workspace::builtin_default();
        ws.auth = vec![AuthConfig::Oidc {
            url: "https://idp".to_string(),
            client_id: String::new(),
            scope: "openid".to_string(),
        }];
        assert!(ws.validate().is_err());
    }
}
