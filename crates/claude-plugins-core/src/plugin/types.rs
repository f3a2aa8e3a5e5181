//! Claude Code plugin type definitions
//!
//! Types for the installed-plugins registry (installed_plugins.json) and the
//! derived status views.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{PluginsError, Result};
use crate::store::{json_kind, Document};

/// Marketplace reported for identities without an `@`
pub const UNKNOWN_MARKETPLACE: &str = "unknown";

const PLUGINS_KEY: &str = "plugins";

/// Plugin identity: "plugin-name@marketplace"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginId(String);

impl PluginId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name component (before the first `@`)
    pub fn name(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(name, _)| name)
    }

    /// Marketplace component (after the first `@`)
    pub fn marketplace(&self) -> &str {
        self.0
            .split_once('@')
            .map_or(UNKNOWN_MARKETPLACE, |(_, marketplace)| marketplace)
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PluginId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PluginId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for PluginId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Installation scope accepted for scope changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Bound to one project directory (carries projectPath)
    Project,
    /// Per-user installation
    #[default]
    User,
    /// Machine-wide installation
    Global,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::User => "user",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "project" => Ok(Self::Project),
            "user" => Ok(Self::User),
            "global" => Ok(Self::Global),
            _ => Err(format!(
                "Invalid scope '{}'. Must be: project, user, global",
                s
            )),
        }
    }
}

/// One installation of a plugin (an element of installed_plugins.json arrays).
///
/// Kept as an ordered field map: known fields have accessors, everything else
/// is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallationRecord(Map<String, Value>);

impl InstallationRecord {
    pub const VERSION: &'static str = "version";
    pub const SCOPE: &'static str = "scope";
    pub const INSTALL_PATH: &'static str = "installPath";
    pub const PROJECT_PATH: &'static str = "projectPath";
    pub const LAST_UPDATED: &'static str = "lastUpdated";

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.str_field(Self::VERSION)
    }

    /// Raw scope string; the host tool may write scopes beyond [`Scope`]
    pub fn scope(&self) -> Option<&str> {
        self.str_field(Self::SCOPE)
    }

    pub fn install_path(&self) -> Option<&str> {
        self.str_field(Self::INSTALL_PATH)
    }

    pub fn project_path(&self) -> Option<&str> {
        self.str_field(Self::PROJECT_PATH)
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.str_field(Self::LAST_UPDATED)
    }

    pub fn set_scope(&mut self, scope: Scope) {
        self.set_str(Self::SCOPE, scope.as_str());
    }

    pub fn set_project_path(&mut self, path: &Path) {
        self.set_str(Self::PROJECT_PATH, &path.to_string_lossy());
    }

    /// Remove projectPath, keeping the position of every other field
    pub fn clear_project_path(&mut self) -> bool {
        self.0.shift_remove(Self::PROJECT_PATH).is_some()
    }

    pub fn set_last_updated(&mut self, timestamp: &str) {
        self.set_str(Self::LAST_UPDATED, timestamp);
    }

    fn set_str(&mut self, key: &str, value: &str) {
        // Existing keys keep their position
        self.0
            .insert(key.to_string(), Value::String(value.to_string()));
    }
}

/// A registry entry: identity plus its ordered installations
#[derive(Debug, Clone, PartialEq)]
pub struct PluginInfo {
    pub id: PluginId,
    pub installations: Vec<InstallationRecord>,
}

impl PluginInfo {
    pub fn new(id: impl Into<PluginId>, installations: Vec<InstallationRecord>) -> Self {
        Self {
            id: id.into(),
            installations,
        }
    }

    pub fn name(&self) -> &str {
        self.id.name()
    }

    pub fn marketplace(&self) -> &str {
        self.id.marketplace()
    }

    /// Version of the first installation
    pub fn version(&self) -> Option<&str> {
        self.installations.first().and_then(|i| i.version())
    }

    /// Scope of the first installation
    pub fn scope(&self) -> Option<&str> {
        self.installations.first().and_then(|i| i.scope())
    }

    /// Distinct scopes across all installations, first-seen order
    pub fn all_scopes(&self) -> Vec<String> {
        let mut scopes: Vec<String> = Vec::new();
        for scope in self.installations.iter().filter_map(|i| i.scope()) {
            if !scope.is_empty() && !scopes.iter().any(|s| s == scope) {
                scopes.push(scope.to_string());
            }
        }
        scopes
    }

    /// Install path of the first installation
    pub fn install_path(&self) -> Option<&str> {
        self.installations.first().and_then(|i| i.install_path())
    }
}

/// The `plugins` mapping of installed_plugins.json, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstalledPlugins {
    entries: Vec<PluginInfo>,
}

impl InstalledPlugins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the registry from an installed_plugins.json document
    pub fn from_document(path: &Path, document: &Document) -> Result<Self> {
        let plugins = match document.get(PLUGINS_KEY) {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(Value::Object(plugins)) => plugins,
            Some(other) => {
                return Err(PluginsError::InvalidDocument {
                    path: path.to_path_buf(),
                    message: format!("'plugins' must be an object, found {}", json_kind(other)),
                })
            }
        };

        let mut entries = Vec::with_capacity(plugins.len());
        for (id, installations) in plugins {
            let installations: Vec<InstallationRecord> =
                serde_json::from_value(installations.clone()).map_err(|e| {
                    PluginsError::InvalidDocument {
                        path: path.to_path_buf(),
                        message: format!("installations of '{}': {}", id, e),
                    }
                })?;
            entries.push(PluginInfo::new(id.as_str(), installations));
        }

        Ok(Self { entries })
    }

    /// JSON value for the `plugins` key
    pub fn to_value(&self) -> Value {
        let plugins: Map<String, Value> = self
            .entries
            .iter()
            .map(|entry| {
                let installations = entry
                    .installations
                    .iter()
                    .map(|record| Value::Object(record.fields().clone()))
                    .collect();
                (entry.id.to_string(), Value::Array(installations))
            })
            .collect();
        Value::Object(plugins)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PluginInfo> {
        self.entries.iter()
    }

    pub fn get(&self, id: &str) -> Option<&PluginInfo> {
        self.entries.iter().find(|e| e.id.as_str() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PluginInfo> {
        self.entries.iter_mut().find(|e| e.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Entries sorted by name component (stable)
    pub fn sorted_by_name(&self) -> Vec<&PluginInfo> {
        let mut sorted: Vec<&PluginInfo> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.name().cmp(b.name()));
        sorted
    }
}

impl FromIterator<PluginInfo> for InstalledPlugins {
    fn from_iter<T: IntoIterator<Item = PluginInfo>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a InstalledPlugins {
    type Item = &'a PluginInfo;
    type IntoIter = std::slice::Iter<'a, PluginInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Tri-state enabled status of a plugin in one settings document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PluginState {
    Enabled,
    Disabled,
    /// Key absent from the settings document
    #[default]
    Undefined,
}

impl PluginState {
    pub fn as_option(&self) -> Option<bool> {
        match self {
            Self::Enabled => Some(true),
            Self::Disabled => Some(false),
            Self::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, Self::Undefined)
    }
}

impl From<Option<bool>> for PluginState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Enabled,
            Some(false) => Self::Disabled,
            None => Self::Undefined,
        }
    }
}

impl From<bool> for PluginState {
    fn from(value: bool) -> Self {
        Some(value).into()
    }
}

impl fmt::Display for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => write!(f, "Enabled"),
            Self::Disabled => write!(f, "Disabled"),
            Self::Undefined => write!(f, "Undefined"),
        }
    }
}

// true / false / null, matching the settings files
impl Serialize for PluginState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

/// Read-only status projection of one installed plugin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginStatusView {
    pub name: String,
    pub marketplace: String,
    pub version: Option<String>,
    pub global_status: PluginState,
    pub local_status: PluginState,
    pub scope: Option<String>,
    pub all_scopes: Vec<String>,
    pub install_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn plugin_id_components() {
        let id = PluginId::from("kotlin-lsp@claude-plugins-official");
        assert_eq!(id.name(), "kotlin-lsp");
        assert_eq!(id.marketplace(), "claude-plugins-official");

        let bare = PluginId::from("standalone");
        assert_eq!(bare.name(), "standalone");
        assert_eq!(bare.marketplace(), UNKNOWN_MARKETPLACE);
    }

    #[test]
    fn plugin_id_splits_on_first_at() {
        let id = PluginId::from("tool@market@mirror");
        assert_eq!(id.name(), "tool");
        assert_eq!(id.marketplace(), "market@mirror");
    }

    #[test]
    fn scope_from_str() {
        assert_eq!("Project".parse::<Scope>().unwrap(), Scope::Project);
        assert_eq!("user".parse::<Scope>().unwrap(), Scope::User);
        assert!("local".parse::<Scope>().is_err());
    }

    #[test]
    fn parse_installed_plugins_document() {
        let doc = document(json!({
            "version": 2,
            "plugins": {
                "zeta@m": [{"scope": "user", "version": "1.0"}],
                "alpha@m": [
                    {"scope": "project", "projectPath": "/p", "installPath": "/cache/alpha"},
                    {"scope": "user"}
                ]
            }
        }));

        let registry = InstalledPlugins::from_document(Path::new("r.json"), &doc).unwrap();
        let ids: Vec<&str> = registry.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta@m", "alpha@m"]);

        let alpha = registry.get("alpha@m").unwrap();
        assert_eq!(alpha.scope(), Some("project"));
        assert_eq!(alpha.all_scopes(), vec!["project", "user"]);
        assert_eq!(alpha.install_path(), Some("/cache/alpha"));
        assert_eq!(alpha.version(), None);
    }

    #[test]
    fn registry_rejects_non_array_installations() {
        let doc = document(json!({"plugins": {"a@m": {"scope": "user"}}}));
        let err = InstalledPlugins::from_document(Path::new("r.json"), &doc).unwrap_err();
        assert!(matches!(err, PluginsError::InvalidDocument { .. }));
    }

    #[test]
    fn registry_round_trips_unknown_fields() {
        let doc = document(json!({
            "plugins": {
                "a@m": [{"scope": "user", "gitCommitSha": "abc", "installedAt": "2025-01-01T00:00:00Z"}]
            }
        }));

        let registry = InstalledPlugins::from_document(Path::new("r.json"), &doc).unwrap();
        assert_eq!(&registry.to_value(), doc.get("plugins").unwrap());
    }

    #[test]
    fn clear_project_path_keeps_field_order() {
        let mut record: InstallationRecord = serde_json::from_value(json!({
            "scope": "project",
            "projectPath": "/p",
            "version": "2.0"
        }))
        .unwrap();

        assert!(record.clear_project_path());
        record.set_scope(Scope::User);

        let keys: Vec<&String> = record.fields().keys().collect();
        assert_eq!(keys, vec!["scope", "version"]);
        assert_eq!(record.scope(), Some("user"));
    }

    #[test]
    fn sorted_by_name_is_stable() {
        let registry: InstalledPlugins = vec![
            PluginInfo::new("b@one", vec![]),
            PluginInfo::new("a@two", vec![]),
            PluginInfo::new("b@three", vec![]),
        ]
        .into_iter()
        .collect();

        let ids: Vec<&str> = registry
            .sorted_by_name()
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a@two", "b@one", "b@three"]);
    }

    #[test]
    fn plugin_state_serializes_as_tristate() {
        assert_eq!(serde_json::to_value(PluginState::Enabled).unwrap(), json!(true));
        assert_eq!(serde_json::to_value(PluginState::Disabled).unwrap(), json!(false));
        assert_eq!(serde_json::to_value(PluginState::Undefined).unwrap(), Value::Null);
    }
}
