// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Wire types for talking to a Polaris catalog server.
//!
//! This crate holds the OAuth client-credentials exchange payloads, bearer
//! header helpers, and the management / catalog REST request and response
//! bodies used by the console.

pub mod auth;
pub mod types;

// Re-export commonly used items
pub use auth::{bearer_header_value, strip_bearer, ClientCredentials, OAuthError, TokenResponse};
pub use types::{
    Catalog, CatalogList, CatalogRole, CatalogRoleList, CreateCatalogRequest,
    CreatePrincipalRequest, CreatePrincipalRoleRequest, ErrorResponse, NamespaceList, Principal,
    PrincipalList, PrincipalRole, PrincipalRoleList, PrincipalWithCredentials,
};
