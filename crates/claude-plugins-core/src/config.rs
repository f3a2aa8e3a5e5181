use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{PluginsError, Result};

/// Environment variable that overrides the Claude configuration root
pub const CLAUDE_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

const CLAUDE_DIR: &str = ".claude";
const SETTINGS_FILE: &str = "settings.json";
const PLUGINS_DIR: &str = "plugins";
const INSTALLED_PLUGINS_FILE: &str = "installed_plugins.json";

/// Well-known locations of the Claude Code configuration documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaudePaths {
    /// Configuration root (~/.claude)
    claude_dir: PathBuf,
}

impl ClaudePaths {
    /// Resolve from the user's home directory
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or(PluginsError::HomeNotFound)?;
        Ok(Self::with_dir(home.join(CLAUDE_DIR)))
    }

    /// Create with a custom configuration root (for testing)
    pub fn with_dir(claude_dir: PathBuf) -> Self {
        Self { claude_dir }
    }

    /// Resolve the configuration root.
    /// Priority: explicit override > CLAUDE_CONFIG_DIR > ~/.claude
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = explicit {
            return Ok(Self::with_dir(dir));
        }

        if let Some(dir) = std::env::var_os(CLAUDE_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_dir(PathBuf::from(dir)));
        }

        Self::new()
    }

    pub fn claude_dir(&self) -> &Path {
        &self.claude_dir
    }

    /// ~/.claude/settings.json
    pub fn global_settings_file(&self) -> PathBuf {
        self.claude_dir.join(SETTINGS_FILE)
    }

    /// ~/.claude/plugins
    pub fn plugins_dir(&self) -> PathBuf {
        self.claude_dir.join(PLUGINS_DIR)
    }

    /// ~/.claude/plugins/installed_plugins.json
    pub fn installed_plugins_file(&self) -> PathBuf {
        self.plugins_dir().join(INSTALLED_PLUGINS_FILE)
    }

    /// <project>/.claude/settings.json
    pub fn local_settings_file(project_dir: &Path) -> PathBuf {
        project_dir.join(CLAUDE_DIR).join(SETTINGS_FILE)
    }
}

/// Resolve an optional project directory, defaulting to the current directory
pub fn project_dir(project: Option<&Path>) -> Result<PathBuf> {
    match project {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(std::env::current_dir()?),
    }
}

/// Snapshot of the configuration locations for a project (describe-config)
#[derive(Debug, Clone, Serialize)]
pub struct ConfigDescription {
    pub claude_dir: PathBuf,
    pub global_settings: PathBuf,
    pub global_settings_exists: bool,
    pub installed_plugins: PathBuf,
    pub installed_plugins_exists: bool,
    pub project: PathBuf,
    pub local_settings: PathBuf,
    pub local_settings_exists: bool,
}
