// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::sync::Arc;

use polctl_core::{JsonStoreExt, KvStore, StoreError, Workspace};

pub const ACTIVE_WORKSPACE_KEY: &str = "polaris_workspace";

/// The workspace currently routing and authorizing requests.
///
/// Stored as a full copy, independent of the workspace list, so editing or
/// deleting list entries does not change it.
#[derive(Clone)]
pub struct ActiveWorkspace {
    store: Arc<dyn KvStore>,
}

impl ActiveWorkspace {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// The active workspace; a malformed stored value reads as none.
    pub fn get(&self) -> Option<Workspace> {
        self.store.get_json(ACTIVE_WORKSPACE_KEY)
    }

    pub fn name(&self) -> Option<String> {
        self.get().map(|ws| ws.name)
    }

    pub fn set(&self, workspace: &Workspace) -> Result<(), StoreError> {
        self.store.set_json(ACTIVE_WORKSPACE_KEY, workspace)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(ACTIVE_WORKSPACE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polctl_core::MemoryStore;

    #[test]
    fn test_set_get_clear() {
        let active = ActiveWorkspace::new(Arc::new(MemoryStore::new()));
        assert!(active.get().is_none());

        let ws = Workspace::builtin_default();
        active.set(&ws).unwrap();
        assert_eq!(active.get(), Some(ws));
        assert_eq!(active.name().as_deref(), Some("Default Polaris"));

        active.clear().unwrap();
        assert!(active.get().is_none());
    }

    #[test]
    fn test_malformed_reads_as_none() {
        let store = Arc::new(MemoryStore::new());
        store.set(ACTIVE_WORKSPACE_KEY, "[1, 2").unwrap();
        let active = ActiveWorkspace::new(store);
        assert!(active.get().is_none());
    }
}
