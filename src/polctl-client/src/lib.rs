// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Workspace and credential management for the Polaris console.
//!
//! Durable state (the workspace list and the active workspace) and
//! session-scoped state (bearer tokens per workspace) are kept in two
//! independent [`polctl_core::KvStore`]s, bundled in a [`ConsoleContext`]
//! that is passed explicitly to the request clients and the session
//! controller.

pub mod active;
pub mod api_client;
pub mod config;
pub mod context;
pub mod credentials;
pub mod error;
pub mod manifest;
pub mod navigation;
pub mod resources;
pub mod session;
pub mod token;
pub mod workspaces;

#[cfg(test)]
mod test_support;

pub use active::ActiveWorkspace;
pub use api_client::{ApiClient, RestClient};
pub use context::ConsoleContext;
pub use credentials::CredentialStore;
pub use error::{ApiError, AuthError, WorkspaceError};
pub use manifest::ManifestSource;
pub use navigation::{Navigation, Navigator};
pub use session::{SessionController, SessionState};
pub use token::{TokenEndpoint, TokenExchanger};
pub use workspaces::WorkspaceStore;
