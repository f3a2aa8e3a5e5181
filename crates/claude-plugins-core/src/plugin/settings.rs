//! `enabledPlugins` access on Claude Code settings documents
//!
//! ```json
//! {
//!   "enabledPlugins": {
//!     "kotlin-lsp@claude-plugins-official": true
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{PluginsError, Result};
use crate::plugin::types::PluginState;
use crate::store::{json_kind, Document};

pub const ENABLED_PLUGINS_KEY: &str = "enabledPlugins";

/// Plugin identity -> enabled flag
pub type EnabledPlugins = BTreeMap<String, bool>;

/// Boolean entries of a document's `enabledPlugins` (other values are ignored)
pub fn enabled_plugins(settings: &Document) -> EnabledPlugins {
    settings
        .get(ENABLED_PLUGINS_KEY)
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(id, value)| value.as_bool().map(|enabled| (id.clone(), enabled)))
                .collect()
        })
        .unwrap_or_default()
}

/// Tri-state lookup of one plugin in a settings document
pub fn plugin_state(settings: &Document, id: &str) -> PluginState {
    settings
        .get(ENABLED_PLUGINS_KEY)
        .and_then(|map| map.get(id))
        .and_then(Value::as_bool)
        .into()
}

/// Overlay local entries on global ones; local wins per key
pub fn layer(global: &Document, local: &Document) -> EnabledPlugins {
    let mut enabled = enabled_plugins(global);
    enabled.extend(enabled_plugins(local));
    enabled
}

/// Get the `enabledPlugins` object, creating it when absent
pub fn enabled_plugins_mut<'a>(
    settings: &'a mut Document,
    path: &Path,
) -> Result<&'a mut Map<String, Value>> {
    let entry = settings
        .entry(ENABLED_PLUGINS_KEY)
        .or_insert_with(|| Value::Object(Map::new()));

    if entry.is_null() {
        *entry = Value::Object(Map::new());
    }

    let kind = json_kind(entry);
    entry
        .as_object_mut()
        .ok_or_else(|| PluginsError::InvalidDocument {
            path: path.to_path_buf(),
            message: format!("'{}' must be an object, found {}", ENABLED_PLUGINS_KEY, kind),
        })
}

/// Set one plugin's flag, creating `enabledPlugins` if needed
pub fn set_enabled(settings: &mut Document, path: &Path, id: &str, enabled: bool) -> Result<()> {
    let map = enabled_plugins_mut(settings, path)?;
    map.insert(id.to_string(), Value::Bool(enabled));
    Ok(())
}
