// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfigInfo {
    /// S3, GCS, AZURE or FILE.
    pub storage_type: String,
    #[serde(default)]
    pub allowed_locations: Vec<String>,
    /// Provider-specific settings (role ARN, tenant id, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// INTERNAL or EXTERNAL.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_config_info: Option<StorageConfigInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogList {
    #[serde(default)]
    pub catalogs: Vec<Catalog>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCatalogRequest {
    pub catalog: Catalog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_version: Option<i64>,
}

impl Principal {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client_id: None,
            properties: BTreeMap::new(),
            create_timestamp: None,
            last_update_timestamp: None,
            entity_version: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrincipalList {
    #[serde(default)]
    pub principals: Vec<Principal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrincipalRequest {
    pub principal: Principal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_rotation_required: Option<bool>,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for PrincipalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrincipalCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Returned once when a principal is created; the secret is not retrievable later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalWithCredentials {
    pub principal: Principal,
    pub credentials: PrincipalCredentials,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalRole {
    pub name: String,
    #[serde(default)]
    pub federated: bool,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_version: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrincipalRoleList {
    #[serde(default)]
    pub roles: Vec<PrincipalRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrincipalRoleRequest {
    pub principal_role: PrincipalRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRole {
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_version: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogRoleList {
    #[serde(default)]
    pub roles: Vec<CatalogRole>,
}

/// Iceberg REST namespace listing; each namespace is a list of levels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceList {
    #[serde(default)]
    pub namespaces: Vec<Vec<String>>,
    #[serde(
        rename = "next-page-token",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorModel {
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub code: u16,
}

/// Error envelope shared by the management and catalog APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorModel,
}
