//! Plugin Module
//!
//! - `types`: registry, identity and status types
//! - `settings`: `enabledPlugins` access on settings documents
//! - `repository`: load/save of the Claude Code configuration documents
//! - `resolver`: full or partial name -> identity
//! - `status`: global/local status projection
//! - `scope`: installation scope changes
//! - `sync`: seeding local settings from the registry

pub mod repository;
pub mod resolver;
pub mod scope;
pub mod settings;
pub mod status;
pub mod sync;
pub mod types;

// Re-exports
pub use repository::{ConfigRepository, SettingsScope};
pub use resolver::{resolve, Resolution};
pub use scope::ScopeTarget;
pub use settings::EnabledPlugins;
pub use status::project_status;
pub use sync::SyncReport;
pub use types::{
    InstallationRecord, InstalledPlugins, PluginId, PluginInfo, PluginState, PluginStatusView,
    Scope,
};
