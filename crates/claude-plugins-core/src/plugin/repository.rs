//! Claude Code configuration repository
//!
//! Typed access to the three documents this crate works with:
//! `~/.claude/settings.json` (global, read-only here),
//! `~/.claude/plugins/installed_plugins.json` (registry) and
//! `<project>/.claude/settings.json` (local).

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{project_dir, ClaudePaths};
use crate::error::{PluginsError, Result};
use crate::plugin::resolver::resolve;
use crate::plugin::scope::{apply_scope_change, timestamp_now, ScopeTarget};
use crate::plugin::settings::{self, EnabledPlugins};
use crate::plugin::types::{InstalledPlugins, PluginId, Scope};
use crate::store::{Document, DocumentStore, FsStore};

const PLUGINS_KEY: &str = "plugins";

/// Which settings document an enable/disable targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettingsScope {
    /// <project>/.claude/settings.json
    #[default]
    Local,
    /// ~/.claude/settings.json (managed by Claude Code itself; never written)
    Global,
}

pub struct ConfigRepository<S = FsStore> {
    paths: ClaudePaths,
    store: S,
}

impl ConfigRepository<FsStore> {
    /// Repository over the real filesystem
    pub fn new(paths: ClaudePaths) -> Self {
        Self::with_store(paths, FsStore)
    }
}

impl<S: DocumentStore> ConfigRepository<S> {
    pub fn with_store(paths: ClaudePaths, store: S) -> Self {
        Self { paths, store }
    }

    pub fn paths(&self) -> &ClaudePaths {
        &self.paths
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Path of the local settings file for a project (current directory when `None`)
    pub fn local_settings_path(&self, project: Option<&Path>) -> Result<PathBuf> {
        Ok(ClaudePaths::local_settings_file(&project_dir(project)?))
    }

    /// Load a document, treating missing or unreadable files as empty
    fn load_or_empty(&self, path: &Path, what: &str) -> Document {
        match self.store.load(path) {
            Ok(Some(document)) => document,
            Ok(None) => Document::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read {}, treating as empty", what);
                Document::new()
            }
        }
    }

    fn save_document(&self, path: &Path, document: &Document, what: &str) -> Result<()> {
        self.store.save(path, document).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to write {}", what);
            e
        })
    }

    // ========== Installed Plugins ==========

    /// Load the installed-plugins registry (empty if missing or unreadable)
    pub fn installed_plugins(&self) -> InstalledPlugins {
        let path = self.paths.installed_plugins_file();
        let document = self.load_or_empty(&path, "installed plugins");
        registry_from(&path, &document)
    }

    /// Save the registry as `{"plugins": ...}`.
    ///
    /// Other top-level keys of a readable existing document are kept in place.
    pub fn save_installed_plugins(&self, registry: &InstalledPlugins) -> Result<()> {
        let path = self.paths.installed_plugins_file();
        let mut document = self.load_or_empty(&path, "installed plugins");
        self.write_registry(&path, &mut document, registry)
    }

    fn write_registry(
        &self,
        path: &Path,
        document: &mut Document,
        registry: &InstalledPlugins,
    ) -> Result<()> {
        document.insert(PLUGINS_KEY.to_string(), registry.to_value());
        self.save_document(path, document, "installed plugins")?;
        debug!(count = registry.len(), "saved installed plugins");
        Ok(())
    }

    /// Change the scope of one installation and persist the registry.
    ///
    /// `query` is resolved like any plugin name. The registry is read once and
    /// written back from that same snapshot. For [`Scope::Project`] the project
    /// path defaults to the current directory and is stored in absolute form.
    pub fn change_plugin_scope(
        &self,
        query: &str,
        scope: Scope,
        installation_index: usize,
        project_path: Option<&Path>,
    ) -> Result<PluginId> {
        let path = self.paths.installed_plugins_file();
        let mut document = self.load_or_empty(&path, "installed plugins");
        let mut registry = registry_from(&path, &document);

        let id = resolve(&registry, query).into_result(query)?;
        let target = ScopeTarget::resolve(scope, project_path)?;

        if let Err(e) = apply_scope_change(
            &mut registry,
            id.as_str(),
            &target,
            installation_index,
            &timestamp_now(),
        ) {
            warn!(plugin = %id, error = %e, "scope change rejected");
            return Err(e);
        }

        self.write_registry(&path, &mut document, &registry)?;
        debug!(plugin = %id, scope = %scope, index = installation_index, "changed plugin scope");
        Ok(id)
    }

    // ========== Settings ==========

    /// Global settings (~/.claude/settings.json)
    pub fn global_settings(&self) -> Document {
        self.load_or_empty(&self.paths.global_settings_file(), "global settings")
    }

    /// Local settings (<project>/.claude/settings.json)
    pub fn local_settings(&self, project: Option<&Path>) -> Result<Document> {
        let path = self.local_settings_path(project)?;
        Ok(self.load_or_empty(&path, "local settings"))
    }

    /// Write local settings, creating `<project>/.claude` if needed
    pub fn save_local_settings(&self, settings: &Document, project: Option<&Path>) -> Result<()> {
        let path = self.local_settings_path(project)?;
        self.save_document(&path, settings, "local settings")
    }

    /// Layered enabled flags: global entries overridden by local ones
    pub fn enabled_plugins(&self, project: Option<&Path>) -> Result<EnabledPlugins> {
        let global = self.global_settings();
        let local = self.local_settings(project)?;
        Ok(settings::layer(&global, &local))
    }

    /// Set a plugin's enabled flag in local settings.
    ///
    /// [`SettingsScope::Global`] is refused: the global file belongs to Claude Code.
    pub fn set_plugin_enabled(
        &self,
        id: &str,
        enabled: bool,
        project: Option<&Path>,
        scope: SettingsScope,
    ) -> Result<()> {
        if scope == SettingsScope::Global {
            warn!(plugin = id, "global scope modification is not implemented");
            return Err(PluginsError::UnsupportedOperation {
                operation: "modifying global plugin settings; use local scope".to_string(),
            });
        }

        let path = self.local_settings_path(project)?;
        let mut local = self.load_or_empty(&path, "local settings");
        settings::set_enabled(&mut local, &path, id, enabled)?;
        self.save_document(&path, &local, "local settings")?;
        debug!(plugin = id, enabled, path = %path.display(), "updated local plugin state");
        Ok(())
    }
}

fn registry_from(path: &Path, document: &Document) -> InstalledPlugins {
    match InstalledPlugins::from_document(path, document) {
        Ok(registry) => {
            debug!(count = registry.len(), "loaded installed plugins");
            registry
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "invalid installed plugins registry, treating as empty");
            InstalledPlugins::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const CLAUDE_DIR: &str = "/home/u/.claude";
    const PROJECT: &str = "/work/app";

    fn memory_repo() -> ConfigRepository<MemoryStore> {
        ConfigRepository::with_store(
            ClaudePaths::with_dir(PathBuf::from(CLAUDE_DIR)),
            MemoryStore::new(),
        )
    }

    fn local_path() -> PathBuf {
        ClaudePaths::local_settings_file(Path::new(PROJECT))
    }

    /// Readable store whose writes always fail
    #[derive(Default)]
    struct ReadOnlyStore(MemoryStore);

    impl DocumentStore for ReadOnlyStore {
        fn load(&self, path: &Path) -> Result<Option<Document>> {
            self.0.load(path)
        }

        fn save(&self, _path: &Path, _document: &Document) -> Result<()> {
            Err(PluginsError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn exists(&self, path: &Path) -> bool {
            self.0.exists(path)
        }
    }

    fn read_only_repo() -> ConfigRepository<ReadOnlyStore> {
        let repo = ConfigRepository::with_store(
            ClaudePaths::with_dir(PathBuf::from(CLAUDE_DIR)),
            ReadOnlyStore::default(),
        );
        repo.store().0.insert_json(
            repo.paths().installed_plugins_file(),
            &json!({"plugins": {"a@m": [{"scope": "user"}]}}),
        );
        repo
    }

    #[test]
    fn missing_documents_are_empty() {
        let repo = memory_repo();
        assert!(repo.installed_plugins().is_empty());
        assert!(repo.global_settings().is_empty());
        assert!(repo.local_settings(Some(Path::new(PROJECT))).unwrap().is_empty());
    }

    #[test]
    fn corrupt_registry_presents_as_empty() {
        let repo = memory_repo();
        repo.store()
            .insert_raw(repo.paths().installed_plugins_file(), "{ broken");
        assert!(repo.installed_plugins().is_empty());
    }

    #[test]
    fn corrupt_local_does_not_hide_global() {
        let repo = memory_repo();
        repo.store().insert_json(
            repo.paths().global_settings_file(),
            &json!({"enabledPlugins": {"a@m": true}}),
        );
        repo.store().insert_raw(local_path(), "not json");

        let enabled = repo.enabled_plugins(Some(Path::new(PROJECT))).unwrap();
        assert_eq!(enabled.get("a@m"), Some(&true));
    }

    #[test]
    fn set_plugin_enabled_local() {
        let repo = memory_repo();
        repo.store()
            .insert_json(local_path(), &json!({"permissions": {"allow": []}}));

        repo.set_plugin_enabled("a@m", true, Some(Path::new(PROJECT)), SettingsScope::Local)
            .unwrap();

        let local = repo.store().json(&local_path()).unwrap();
        assert_eq!(local["enabledPlugins"]["a@m"], json!(true));
        assert_eq!(local["permissions"], json!({"allow": []}));
    }

    #[test]
    fn set_plugin_enabled_global_is_unsupported() {
        let repo = memory_repo();
        let global_path = repo.paths().global_settings_file();
        repo.store()
            .insert_json(&global_path, &json!({"enabledPlugins": {"a@m": true}}));
        let before = repo.store().raw(&global_path);

        let err = repo
            .set_plugin_enabled("a@m", false, Some(Path::new(PROJECT)), SettingsScope::Global)
            .unwrap_err();

        assert!(matches!(err, PluginsError::UnsupportedOperation { .. }));
        assert_eq!(repo.store().raw(&global_path), before);
        assert!(!repo.store().exists(&local_path()));
    }

    #[test]
    fn save_installed_plugins_keeps_other_keys() {
        let repo = memory_repo();
        let path = repo.paths().installed_plugins_file();
        repo.store().insert_raw(
            &path,
            r#"{"version": 2, "plugins": {"a@m": [{"scope": "user"}]}}"#,
        );

        let registry = repo.installed_plugins();
        repo.save_installed_plugins(&registry).unwrap();

        let saved = repo.store().raw(&path).unwrap();
        assert!(saved.starts_with("{\n  \"version\": 2,\n  \"plugins\""));
    }

    #[test]
    fn change_scope_to_user_removes_project_path() {
        let repo = memory_repo();
        let path = repo.paths().installed_plugins_file();
        repo.store().insert_json(
            &path,
            &json!({"plugins": {"a@m": [{"scope": "project", "projectPath": "/old", "version": "1"}]}}),
        );

        repo.change_plugin_scope("a@m", Scope::User, 0, None).unwrap();

        let saved = repo.store().json(&path).unwrap();
        let record = &saved["plugins"]["a@m"][0];
        assert_eq!(record["scope"], json!("user"));
        assert!(record.get("projectPath").is_none());
        assert_eq!(record["version"], json!("1"));
        assert!(record["lastUpdated"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn change_scope_out_of_range_does_not_write() {
        let repo = memory_repo();
        let path = repo.paths().installed_plugins_file();
        repo.store()
            .insert_raw(&path, r#"{"plugins": {"a@m": [{"scope": "user"}]}}"#);

        let err = repo.change_plugin_scope("a@m", Scope::Global, 3, None).unwrap_err();
        assert!(matches!(err, PluginsError::InstallationIndexOutOfRange { .. }));
        assert_eq!(
            repo.store().raw(&path).unwrap(),
            r#"{"plugins": {"a@m": [{"scope": "user"}]}}"#
        );
    }

    #[test]
    fn filesystem_local_settings_created_with_directory() {
        let tmp = TempDir::new().unwrap();
        let repo = ConfigRepository::new(ClaudePaths::with_dir(tmp.path().join(".claude")));
        let project = tmp.path().join("project");
        fs::create_dir(&project).unwrap();

        repo.set_plugin_enabled("a@m", false, Some(&project), SettingsScope::Local)
            .unwrap();

        let content = fs::read_to_string(project.join(".claude/settings.json")).unwrap();
        assert_eq!(content, "{\n  \"enabledPlugins\": {\n    \"a@m\": false\n  }\n}");
    }

    #[test]
    fn change_scope_resolves_partial_name() {
        let repo = memory_repo();
        let path = repo.paths().installed_plugins_file();
        repo.store()
            .insert_json(&path, &json!({"plugins": {"alpha@m": [{"scope": "user"}]}}));

        let id = repo.change_plugin_scope("alp", Scope::Global, 0, None).unwrap();

        assert_eq!(id.as_str(), "alpha@m");
        let saved = repo.store().json(&path).unwrap();
        assert_eq!(saved["plugins"]["alpha@m"][0]["scope"], json!("global"));
    }

    #[test]
    fn failed_writes_are_reported() {
        let repo = read_only_repo();
        let project = Some(Path::new(PROJECT));

        let err = repo
            .set_plugin_enabled("a@m", true, project, SettingsScope::Local)
            .unwrap_err();
        assert!(matches!(err, PluginsError::Io(_)));

        let err = repo.save_local_settings(&Document::new(), project).unwrap_err();
        assert!(matches!(err, PluginsError::Io(_)));

        let err = repo.change_plugin_scope("a@m", Scope::Global, 0, None).unwrap_err();
        assert!(matches!(err, PluginsError::Io(_)));
        assert_eq!(
            repo.store().0.json(&repo.paths().installed_plugins_file()).unwrap(),
            json!({"plugins": {"a@m": [{"scope": "user"}]}})
        );
    }
}
