// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Durable list of workspace configurations.
//!
//! Mutations take the current config by reference, persist the new value in
//! a single write and hand it back; the argument is never modified.

use std::sync::Arc;

use polctl_core::{JsonStoreExt, KvStore, StoreError, Workspace, WorkspacesConfig};
use tracing::{debug, info, warn};

use crate::error::WorkspaceError;
use crate::manifest::ManifestSource;

pub const WORKSPACES_KEY: &str = "polaris_workspaces_config";

#[derive(Clone)]
pub struct WorkspaceStore {
    store: Arc<dyn KvStore>,
    manifest: ManifestSource,
}

impl WorkspaceStore {
    pub fn new(store: Arc<dyn KvStore>, manifest: ManifestSource) -> Self {
        Self { store, manifest }
    }

    /// Locally persisted config, if present and well-formed.
    pub fn stored(&self) -> Option<WorkspacesConfig> {
        self.store.get_json(WORKSPACES_KEY)
    }

    /// Local config, else the server manifest (persisted for next time).
    /// Never fails; the worst case is the built-in default workspace.
    pub async fn load_config(&self) -> WorkspacesConfig {
        if let Some(config) = self.stored() {
            return config;
        }

        let config = self.manifest.fetch().await;
        if let Err(e) = self.save(&config) {
            warn!("Failed to persist workspaces config: {}", e);
        }
        config
    }

    pub async fn find(&self, name: &str) -> Option<Workspace> {
        self.load_config().await.find(name).cloned()
    }

    pub fn save(&self, config: &WorkspacesConfig) -> Result<(), StoreError> {
        self.store.set_json(WORKSPACES_KEY, config)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(WORKSPACES_KEY)
    }

    /// Append `workspace`. Names must be unique.
    pub fn add(
        &self,
        config: &WorkspacesConfig,
        workspace: Workspace,
    ) -> Result<WorkspacesConfig, WorkspaceError> {
        if config.contains(&workspace.name) {
            return Err(WorkspaceError::DuplicateName(workspace.name));
        }

        let mut next = config.clone();
        info!("Adding workspace '{}'", workspace.name);
        next.workspaces.push(workspace);
        self.save(&next)?;
        Ok(next)
    }

    /// Replace the first workspace named `old_name`. Without a match the
    /// list is persisted unchanged. Renaming onto another existing name is
    /// rejected.
    pub fn update(
        &self,
        config: &WorkspacesConfig,
        old_name: &str,
        workspace: Workspace,
    ) -> Result<WorkspacesConfig, WorkspaceError> {
        let mut next = config.clone();
        let Some(idx) = next.workspaces.iter().position(|ws| ws.name == old_name) else {
            debug!("No workspace named '{}' to update", old_name);
            self.save(&next)?;
            return Ok(next);
        };

        let collides = next
            .workspaces
            .iter()
            .enumerate()
            .any(|(i, ws)| i != idx && ws.name == workspace.name);
        if collides {
            return Err(WorkspaceError::DuplicateName(workspace.name));
        }

        info!("Updating workspace '{}'", old_name);
        next.workspaces[idx] = workspace;
        self.save(&next)?;
        Ok(next)
    }

    /// Remove every workspace named `name`.
    pub fn delete(
        &self,
        config: &WorkspacesConfig,
        name: &str,
    ) -> Result<WorkspacesConfig, StoreError> {
        let next = WorkspacesConfig {
            workspaces: config
                .workspaces
                .iter()
                .filter(|ws| ws.name != name)
                .cloned()
                .collect(),
        };
        self.save(&next)?;
        Ok(next)
    }

    pub fn resolve_default(config: &WorkspacesConfig) -> Workspace {
        config.resolve_default()
    }

    /// Throw away local edits and reload the server manifest.
    ///
    /// Destructive; callers confirm with the user first.
    pub async fn reset_from_server(&self) -> Result<WorkspacesConfig, StoreError> {
        self.clear()?;
        let config = self.manifest.fetch().await;
        self.save(&config)?;
        info!("Reset workspaces from server ({} entries)", config.workspaces.len());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{json_response, two_workspace_manifest, workspace};
    use polctl_core::MemoryStore;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer};

    fn memory_store(manifest: ManifestSource) -> (Arc<MemoryStore>, WorkspaceStore) {
        let kv = Arc::new(MemoryStore::new());
        (kv.clone(), WorkspaceStore::new(kv, manifest))
    }

    #[tokio::test]
    async fn test_load_without_local_persists_manifest() {
        let (_, store) = memory_store(ManifestSource::Builtin);
        assert!(store.stored().is_none());

        let config = store.load_config().await;
        assert_eq!(config, WorkspacesConfig::fallback());
        assert_eq!(store.stored(), Some(config));
    }

    #[tokio::test]
    async fn test_malformed_local_falls_back() {
        let (kv, store) = memory_store(ManifestSource::Builtin);
        kv.set(WORKSPACES_KEY, "{\"workspaces\": [").unwrap();

        let config = store.load_config().await;
        assert_eq!(config, WorkspacesConfig::fallback());
    }

    #[tokio::test]
    async fn test_add_then_load_contains_once() {
        let (_, store) = memory_store(ManifestSource::Builtin);
        let config = store.load_config().await;
        store.add(&config, workspace("W1", "http://w1")).unwrap();

        let loaded = store.load_config().await;
        let matches = loaded.workspaces.iter().filter(|ws| ws.name == "W1").count();
        assert_eq!(matches, 1);
        assert_eq!(loaded.workspaces.len(), 2);
    }

    #[test]
    fn test_add_rejects_duplicate_name() {
        let (_, store) = memory_store(ManifestSource::Builtin);
        let config = store
            .add(&WorkspacesConfig::default(), workspace("W1", "http://a"))
            .unwrap();
        let err = store.add(&config, workspace("W1", "http://b")).unwrap_err();
        assert!(matches!(err, WorkspaceError::DuplicateName(name) if name == "W1"));
        assert_eq!(store.stored().unwrap().workspaces.len(), 1);
    }

    #[test]
    fn test_add_does_not_mutate_argument() {
        let (_, store) = memory_store(ManifestSource::Builtin);
        let config = WorkspacesConfig::default();
        let next = store.add(&config, workspace("W1", "http://a")).unwrap();
        assert!(config.workspaces.is_empty());
        assert_eq!(next.workspaces.len(), 1);
    }

    #[test]
    fn test_update_missing_name_persists_unchanged() {
        let (kv, store) = memory_store(ManifestSource::Builtin);
        let config = WorkspacesConfig {
            workspaces: vec![workspace("W1", "http://a")],
        };
        assert!(kv.get(WORKSPACES_KEY).is_none());

        let next = store.update(&config, "A", workspace("A", "http://x")).unwrap();
        assert_eq!(next, config);
        assert_eq!(store.stored(), Some(config));
    }

    #[test]
    fn test_update_replaces_first_match_only() {
        let (_, store) = memory_store(ManifestSource::Builtin);
        let mut second = workspace("W1", "http://second");
        second.description = "second".to_string();
        let config = WorkspacesConfig {
            workspaces: vec![workspace("W1", "http://first"), second.clone()],
        };

        let next = store
            .update(&config, "W1", workspace("W1", "http://edited"))
            .unwrap();
        assert_eq!(next.workspaces[0].api_base(), Some("http://edited"));
        assert_eq!(next.workspaces[1], second);
    }

    #[test]
    fn test_update_missing_name_ignores_colliding_replacement() {
        let (_, store) = memory_store(ManifestSource::Builtin);
        let config = WorkspacesConfig {
            workspaces: vec![workspace("W1", "http://a")],
        };

        let next = store.update(&config, "A", workspace("W1", "http://x")).unwrap();
        assert_eq!(next, config);
        assert_eq!(store.stored(), Some(config));
    }

    #[test]
    fn test_update_rename() {
        let (_, store) = memory_store(ManifestSource::Builtin);
        let config = WorkspacesConfig {
            workspaces: vec![workspace("W1", "http://a"), workspace("W2", "http://b")],
        };

        let next = store.update(&config, "W1", workspace("W3", "http://a")).unwrap();
        assert!(next.contains("W3"));
        assert!(!next.contains("W1"));

        let err = store
            .update(&next, "W3", workspace("W2", "http://a"))
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::DuplicateName(_)));
    }

    #[test]
    fn test_delete_removes_all_and_is_idempotent() {
        let (_, store) = memory_store(ManifestSource::Builtin);
        let config = WorkspacesConfig {
            workspaces: vec![
                workspace("W1", "http://a"),
                workspace("W2", "http://b"),
                workspace("W1", "http://c"),
            ],
        };

        let once = store.delete(&config, "W1").unwrap();
        assert_eq!(once.workspaces.len(), 1);
        assert_eq!(once.workspaces[0].name, "W2");

        let twice = store.delete(&once, "W1").unwrap();
        assert_eq!(once, twice);
        assert_eq!(store.stored(), Some(twice));
    }

    #[test]
    fn test_resolve_default_scenarios() {
        let mut w1 = workspace("W1", "http://a");
        w1.is_default = true;
        let config = WorkspacesConfig {
            workspaces: vec![w1, workspace("W2", "http://b")],
        };
        assert_eq!(WorkspaceStore::resolve_default(&config).name, "W1");
        assert_eq!(
            WorkspaceStore::resolve_default(&WorkspacesConfig::default()),
            Workspace::builtin_default()
        );
    }

    #[tokio::test]
    async fn test_reset_from_server_replaces_local_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workspaces.json"))
            .respond_with(json_response(200, &two_workspace_manifest()))
            .expect(2)
            .mount(&server)
            .await;
        let manifest = ManifestSource::remote(
            format!("{}/workspaces.json", server.uri()),
            reqwest::Client::new(),
        );
        let (_, store) = memory_store(manifest);

        let config = store.load_config().await;
        assert_eq!(config.workspaces.len(), 2);
        let config = store.add(&config, workspace("local", "http://local")).unwrap();
        assert_eq!(config.workspaces.len(), 3);

        let reset = store.reset_from_server().await.unwrap();
        let names: Vec<&str> = reset.workspaces.iter().map(|ws| ws.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        assert_eq!(store.stored(), Some(reset));
    }

    #[tokio::test]
    async fn test_reset_with_unreachable_server_uses_builtin() {
        let (_, store) = memory_store(ManifestSource::remote(
            "http://127.0.0.1:9/workspaces.json",
            reqwest::Client::new(),
        ));
        store
            .add(&WorkspacesConfig::default(), workspace("local", "http://local"))
            .unwrap();

        let reset = store.reset_from_server().await.unwrap();
        assert_eq!(reset, WorkspacesConfig::fallback());
    }
}
