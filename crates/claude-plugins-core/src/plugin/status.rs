//! Per-plugin status projection
//!
//! Global and local states are reported side by side, straight from each
//! settings document, so divergence between the two stays visible.

use crate::plugin::settings::plugin_state;
use crate::plugin::types::{InstalledPlugins, PluginId, PluginInfo, PluginStatusView};
use crate::store::Document;

impl PluginStatusView {
    pub fn project(plugin: &PluginInfo, global: &Document, local: &Document) -> Self {
        let id = plugin.id.as_str();
        Self {
            name: plugin.name().to_string(),
            marketplace: plugin.marketplace().to_string(),
            version: plugin.version().map(str::to_string),
            global_status: plugin_state(global, id),
            local_status: plugin_state(local, id),
            scope: plugin.scope().map(str::to_string),
            all_scopes: plugin.all_scopes(),
            install_path: plugin.install_path().map(str::to_string),
        }
    }
}

/// Status of every installed plugin, sorted by name component
pub fn project_status(
    registry: &InstalledPlugins,
    global: &Document,
    local: &Document,
) -> Vec<(PluginId, PluginStatusView)> {
    registry
        .sorted_by_name()
        .into_iter()
        .map(|plugin| {
            (
                plugin.id.clone(),
                PluginStatusView::project(plugin, global, local),
            )
        })
        .collect()
}
