pub mod config;
pub mod error;
pub mod manager;
pub mod plugin;
pub mod store;

pub use config::{ClaudePaths, ConfigDescription};
pub use error::{PluginsError, Result};
pub use manager::{OperationStatus, PluginManager};
pub use plugin::{
    resolve, ConfigRepository, EnabledPlugins, InstallationRecord, InstalledPlugins, PluginId,
    PluginInfo, PluginState, PluginStatusView, Resolution, Scope, ScopeTarget, SettingsScope,
    SyncReport,
};
pub use store::{Document, DocumentStore, FsStore, MemoryStore};
