// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod model;
pub mod store;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use model::{AuthConfig, ServerConfig, Workspace, WorkspacesConfig, DEFAULT_REALM_HEADER, DEFAULT_SCOPE};
pub use store::{FileStore, JsonStoreExt, KvStore, MemoryStore, StoreError};
