//! Plugin operations exposed to front-ends
//!
//! Every mutating operation resolves the user-supplied name first, so partial
//! names work everywhere and ambiguity is always reported, never guessed.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::{project_dir, ClaudePaths, ConfigDescription};
use crate::error::{PluginsError, Result};
use crate::plugin::repository::{ConfigRepository, SettingsScope};
use crate::plugin::resolver::{resolve, Resolution};
use crate::plugin::status::project_status;
use crate::plugin::sync::{seed_local_settings, SyncReport};
use crate::plugin::types::{PluginId, PluginInfo, PluginStatusView, Scope};
use crate::store::{DocumentStore, FsStore};

/// Boolean outcome plus a human-readable reason, for callers that want flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationStatus {
    pub success: bool,
    pub message: Option<String>,
}

impl OperationStatus {
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                message: None,
            },
            Err(e) => Self {
                success: false,
                message: Some(e.to_string()),
            },
        }
    }
}

impl From<PluginsError> for OperationStatus {
    fn from(e: PluginsError) -> Self {
        Self {
            success: false,
            message: Some(e.to_string()),
        }
    }
}

pub struct PluginManager<S = FsStore> {
    repository: ConfigRepository<S>,
}

impl PluginManager<FsStore> {
    pub fn new(paths: ClaudePaths) -> Self {
        Self::with_repository(ConfigRepository::new(paths))
    }
}

impl<S: DocumentStore> PluginManager<S> {
    pub fn with_repository(repository: ConfigRepository<S>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &ConfigRepository<S> {
        &self.repository
    }

    /// Installed plugins sorted by name
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        self.repository
            .installed_plugins()
            .sorted_by_name()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Resolve a full or partial plugin name to its identity
    pub fn resolve(&self, query: &str) -> Resolution {
        resolve(&self.repository.installed_plugins(), query)
    }

    /// Global and local status of every installed plugin (list-status)
    pub fn plugin_status(&self, project: Option<&Path>) -> Result<Vec<(PluginId, PluginStatusView)>> {
        let registry = self.repository.installed_plugins();
        let global = self.repository.global_settings();
        let local = self.repository.local_settings(project)?;
        Ok(project_status(&registry, &global, &local))
    }

    pub fn enable(&self, query: &str, project: Option<&Path>) -> Result<PluginId> {
        self.set_enabled(query, true, project)
    }

    pub fn disable(&self, query: &str, project: Option<&Path>) -> Result<PluginId> {
        self.set_enabled(query, false, project)
    }

    fn set_enabled(&self, query: &str, enabled: bool, project: Option<&Path>) -> Result<PluginId> {
        let id = self.resolve(query).into_result(query)?;
        self.repository
            .set_plugin_enabled(id.as_str(), enabled, project, SettingsScope::Local)?;
        info!(plugin = %id, enabled, "plugin state updated");
        Ok(id)
    }

    pub fn change_scope(
        &self,
        query: &str,
        scope: Scope,
        installation_index: usize,
        project_path: Option<&Path>,
    ) -> Result<PluginId> {
        let id = self
            .repository
            .change_plugin_scope(query, scope, installation_index, project_path)?;
        info!(plugin = %id, %scope, index = installation_index, "plugin scope changed");
        Ok(id)
    }

    /// Add every installed plugin missing from local settings as disabled
    pub fn sync(&self, project: Option<&Path>) -> Result<SyncReport> {
        let registry = self.repository.installed_plugins();
        let path = self.repository.local_settings_path(project)?;
        let mut local = self.repository.local_settings(project)?;

        let report = seed_local_settings(&registry, &mut local, &path)?;
        if report.changed() {
            self.repository.save_local_settings(&local, project)?;
        }

        info!(
            added = report.added.len(),
            skipped = report.skipped.len(),
            "synced plugins to local settings"
        );
        Ok(report)
    }

    /// Configuration locations for a project; reads nothing but existence
    pub fn describe_config(&self, project: Option<&Path>) -> Result<ConfigDescription> {
        let paths = self.repository.paths();
        let store = self.repository.store();
        let project = project_dir(project)?;
        let local_settings = ClaudePaths::local_settings_file(&project);
        let global_settings = paths.global_settings_file();
        let installed_plugins = paths.installed_plugins_file();

        Ok(ConfigDescription {
            claude_dir: paths.claude_dir().to_path_buf(),
            global_settings_exists: store.exists(&global_settings),
            global_settings,
            installed_plugins_exists: store.exists(&installed_plugins),
            installed_plugins,
            local_settings_exists: store.exists(&local_settings),
            local_settings,
            project,
        })
    }
}
