// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::sync::Arc;

use polctl_core::{KvStore, MemoryStore, StoreError, WorkspacesConfig};
use tracing::info;

use crate::active::ActiveWorkspace;
use crate::credentials::CredentialStore;
use crate::manifest::ManifestSource;
use crate::workspaces::WorkspaceStore;

/// Stores shared by the request clients and the session controller.
///
/// `durable` keeps the workspace list and the active workspace; `session`
/// keeps tokens and is expected to go away with the login session.
#[derive(Clone)]
pub struct ConsoleContext {
    workspaces: WorkspaceStore,
    credentials: CredentialStore,
    active: ActiveWorkspace,
}

impl ConsoleContext {
    pub fn new(
        durable: Arc<dyn KvStore>,
        session: Arc<dyn KvStore>,
        manifest: ManifestSource,
    ) -> Self {
        Self {
            workspaces: WorkspaceStore::new(durable.clone(), manifest),
            credentials: CredentialStore::new(session),
            active: ActiveWorkspace::new(durable),
        }
    }

    /// Everything in memory, no manifest.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            ManifestSource::Builtin,
        )
    }

    pub fn workspaces(&self) -> &WorkspaceStore {
        &self.workspaces
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn active(&self) -> &ActiveWorkspace {
        &self.active
    }

    /// Delete `name` from the list and drop what hangs off it: its token,
    /// and the active pointer if it names the removed workspace.
    pub fn remove_workspace(
        &self,
        config: &WorkspacesConfig,
        name: &str,
    ) -> Result<WorkspacesConfig, StoreError> {
        let next = self.workspaces.delete(config, name)?;
        self.credentials.clear_token(name)?;
        if self.active.name().as_deref() == Some(name) {
            info!("Removed workspace '{}' was active, clearing it", name);
            self.active.clear()?;
        }
        Ok(next)
    }
}
