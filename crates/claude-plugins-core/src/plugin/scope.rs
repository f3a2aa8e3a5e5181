//! Installation scope changes
//!
//! Edits a single installation record in place: `scope`, `projectPath` and
//! `lastUpdated` change, every other field and installation is left alone.

use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;

use crate::config::project_dir;
use crate::error::{PluginsError, Result};
use crate::plugin::types::{InstalledPlugins, Scope};

/// Current UTC time as `2025-01-31T09:15:02.123Z`
pub fn timestamp_now() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Absolute form of a project path (current directory when `None`).
///
/// Existing paths are canonicalised; missing ones are made absolute and
/// normalised lexically.
pub fn resolve_project_path(path: Option<&Path>) -> Result<PathBuf> {
    let base = project_dir(path)?;
    if let Ok(canonical) = fs::canonicalize(&base) {
        return Ok(canonical);
    }

    let absolute = if base.is_absolute() {
        base
    } else {
        std::env::current_dir()?.join(base)
    };
    Ok(normalize(&absolute))
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Destination of a scope change; a project scope always carries its path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeTarget {
    Project(PathBuf),
    User,
    Global,
}

impl ScopeTarget {
    /// Target for `scope`, resolving the project directory for [`Scope::Project`]
    pub fn resolve(scope: Scope, project_path: Option<&Path>) -> Result<Self> {
        Ok(match scope {
            Scope::Project => Self::Project(resolve_project_path(project_path)?),
            Scope::User => Self::User,
            Scope::Global => Self::Global,
        })
    }

    pub fn scope(&self) -> Scope {
        match self {
            Self::Project(_) => Scope::Project,
            Self::User => Scope::User,
            Self::Global => Scope::Global,
        }
    }
}

/// Apply a scope change to `registry[id][index]`
pub fn apply_scope_change(
    registry: &mut InstalledPlugins,
    id: &str,
    target: &ScopeTarget,
    index: usize,
    timestamp: &str,
) -> Result<()> {
    let entry = registry
        .get_mut(id)
        .ok_or_else(|| PluginsError::PluginNotFound {
            query: id.to_string(),
        })?;

    let len = entry.installations.len();
    let record = entry
        .installations
        .get_mut(index)
        .ok_or_else(|| PluginsError::InstallationIndexOutOfRange {
            id: id.to_string(),
            index,
            len,
        })?;

    record.set_scope(target.scope());
    match target {
        ScopeTarget::Project(path) => record.set_project_path(path),
        ScopeTarget::User | ScopeTarget::Global => {
            record.clear_project_path();
        }
    }
    record.set_last_updated(timestamp);

    Ok(())
}
