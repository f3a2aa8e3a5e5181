use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginsError {
    #[error("Plugin not found: {query}")]
    PluginNotFound { query: String },

    #[error("Multiple plugins match '{query}': {}. Please use the full plugin name.", .candidates.join(", "))]
    AmbiguousPlugin {
        query: String,
        candidates: Vec<String>,
    },

    #[error("Installation index {index} out of range for {id} ({len} installation(s))")]
    InstallationIndexOutOfRange { id: String, index: usize, len: usize },

    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON parse error in {path}: {message}")]
    JsonParse { path: PathBuf, message: String },

    #[error("Invalid document {path}: {message}")]
    InvalidDocument { path: PathBuf, message: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

pub type Result<T> = std::result::Result<T, PluginsError>;

impl PluginsError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::PluginNotFound { .. } => 2,
            Self::AmbiguousPlugin { .. } => 3,
            Self::InstallationIndexOutOfRange { .. } => 4,
            Self::UnsupportedOperation { .. } => 5,
            _ => 1,
        }
    }
}
