// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use polctl_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Workspace '{0}' already exists")]
    DuplicateName(String),

    #[error("Workspace '{0}' not found")]
    NotFound(String),

    #[error("Invalid workspace: {0}")]
    Invalid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of requests issued through a [`crate::RestClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No server URL: activate a workspace with server.api set")]
    MissingBaseUrl,

    #[error("Unauthorized: the session for this workspace has been cleared, log in again")]
    Unauthorized,

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Failures of the credential exchange.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Workspace '{0}' has no token endpoint")]
    NoTokenEndpoint(String),

    #[error("{0} authentication is not supported yet, use an internal provider")]
    UnsupportedProvider(&'static str),

    #[error("Authentication failed: {0}")]
    Rejected(String),

    #[error("Token endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid token response: {0}")]
    Decode(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
