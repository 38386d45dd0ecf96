// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Bearer tokens keyed by workspace name.
//!
//! The whole name→token map lives under one key of the session store and is
//! read, changed and rewritten in full by every mutation. A blob that does
//! not decode counts as an empty map and is replaced on the next write.

use std::collections::BTreeMap;
use std::sync::Arc;

use polctl_core::{JsonStoreExt, KvStore, StoreError, WorkspacesConfig};
use tracing::debug;

pub const TOKENS_KEY: &str = "polaris_workspace_tokens";

type TokenMap = BTreeMap<String, String>;

#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KvStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    fn read_map(&self) -> TokenMap {
        self.store.get_json(TOKENS_KEY).unwrap_or_default()
    }

    fn write_map(&self, tokens: &TokenMap) -> Result<(), StoreError> {
        self.store.set_json(TOKENS_KEY, tokens)
    }

    /// Token for `workspace`; empty strings count as absent.
    pub fn get_token(&self, workspace: &str) -> Option<String> {
        self.read_map()
            .remove(workspace)
            .filter(|token| !token.is_empty())
    }

    pub fn set_token(&self, token: &str, workspace: &str) -> Result<(), StoreError> {
        let mut tokens = self.read_map();
        tokens.insert(workspace.to_string(), token.to_string());
        self.write_map(&tokens)
    }

    pub fn clear_token(&self, workspace: &str) -> Result<(), StoreError> {
        let mut tokens = self.read_map();
        tokens.remove(workspace);
        self.write_map(&tokens)
    }

    pub fn has_token(&self, workspace: &str) -> bool {
        self.get_token(workspace).is_some()
    }

    /// Names of workspaces currently holding a token, sorted.
    pub fn workspaces_with_tokens(&self) -> Vec<String> {
        self.read_map()
            .into_iter()
            .filter(|(_, token)| !token.is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Drop tokens whose workspace is not in `config`. Returns the dropped names.
    pub fn prune(&self, config: &WorkspacesConfig) -> Result<Vec<String>, StoreError> {
        let mut tokens = self.read_map();
        let orphans: Vec<String> = tokens
            .keys()
            .filter(|name| !config.contains(name))
            .cloned()
            .collect();
        if orphans.is_empty() {
            return Ok(orphans);
        }
        for name in &orphans {
            tokens.remove(name);
        }
        debug!("Pruned {} orphaned token(s)", orphans.len());
        self.write_map(&tokens)?;
        Ok(orphans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polctl_core::{MemoryStore, Workspace};

    fn store() -> (Arc<MemoryStore>, CredentialStore) {
        let kv = Arc::new(MemoryStore::new());
        (kv.clone(), CredentialStore::new(kv))
    }

    #[test]
    fn test_set_then_clear() {
        let (_, creds) = store();
        creds.set_token("tok-1", "W1").unwrap();
        assert!(creds.has_token("W1"));
        assert_eq!(creds.get_token("W1").as_deref(), Some("tok-1"));

        creds.clear_token("W1").unwrap();
        assert!(!creds.has_token("W1"));
        assert_eq!(creds.get_token("W1"), None);
    }

    #[test]
    fn test_tokens_are_isolated_per_workspace() {
        let (_, creds) = store();
        creds.set_token("a", "W1").unwrap();
        creds.set_token("b", "W2").unwrap();
        creds.clear_token("W1").unwrap();

        assert!(!creds.has_token("W1"));
        assert_eq!(creds.get_token("W2").as_deref(), Some("b"));
        assert_eq!(creds.workspaces_with_tokens(), vec!["W2".to_string()]);
    }

    #[test]
    fn test_empty_token_counts_as_absent() {
        let (_, creds) = store();
        creds.set_token("", "W1").unwrap();
        assert!(!creds.has_token("W1"));
        assert!(creds.workspaces_with_tokens().is_empty());
    }

    #[test]
    fn test_corrupted_blob_is_empty_and_heals() {
        let (kv, creds) = store();
        kv.set(TOKENS_KEY, "{\"W1\": ").unwrap();
        assert!(!creds.has_token("W1"));

        creds.set_token("tok", "W2").unwrap();
        assert_eq!(creds.get_token("W2").as_deref(), Some("tok"));
        assert!(kv.get_json::<TokenMap>(TOKENS_KEY).is_some());
    }

    #[test]
    fn test_wrong_shape_is_empty() {
        let (kv, creds) = store();
        kv.set(TOKENS_KEY, r#"{"W1": 42}"#).unwrap();
        assert_eq!(creds.get_token("W1"), None);
    }

    #[test]
    fn test_prune_orphans() {
        let (_, creds) = store();
        creds.set_token("a", "Default Polaris").unwrap();
        creds.set_token("b", "gone").unwrap();

        let removed = creds.prune(&WorkspacesConfig {
            workspaces: vec![Workspace::builtin_default()],
        })
        .unwrap();
        assert_eq!(removed, vec!["gone".to_string()]);
        assert!(creds.has_token("Default Polaris"));
        assert!(!creds.has_token("gone"));
    }
}
