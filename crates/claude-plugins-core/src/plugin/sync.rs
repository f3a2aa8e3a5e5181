//! Seeding a project's local settings from the installed-plugins registry

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::plugin::settings::enabled_plugins_mut;
use crate::plugin::types::{InstalledPlugins, PluginId};
use crate::store::Document;

/// Result of a sync: which identities were added and which already existed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub added: Vec<PluginId>,
    pub skipped: Vec<PluginId>,
}

impl SyncReport {
    /// Whether the local settings were modified
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Add every registry identity missing from local `enabledPlugins` as `false`.
/// Existing entries are never touched.
pub fn seed_local_settings(
    registry: &InstalledPlugins,
    local: &mut Document,
    path: &Path,
) -> Result<SyncReport> {
    let enabled = enabled_plugins_mut(local, path)?;
    let mut report = SyncReport::default();

    for entry in registry {
        if enabled.contains_key(entry.id.as_str()) {
            report.skipped.push(entry.id.clone());
        } else {
            enabled.insert(entry.id.to_string(), Value::Bool(false));
            report.added.push(entry.id.clone());
        }
    }

    Ok(report)
}
