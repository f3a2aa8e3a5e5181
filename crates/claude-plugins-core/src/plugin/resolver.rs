//! Plugin identity resolution from full or partial names

use crate::error::{PluginsError, Result};
use crate::plugin::types::{InstalledPlugins, PluginId};

/// Outcome of resolving a user-supplied plugin name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unique(PluginId),
    NotFound,
    /// Several plugins match; the caller must be more specific
    Ambiguous(Vec<PluginId>),
}

impl Resolution {
    pub fn into_result(self, query: &str) -> Result<PluginId> {
        match self {
            Self::Unique(id) => Ok(id),
            Self::NotFound => Err(PluginsError::PluginNotFound {
                query: query.to_string(),
            }),
            Self::Ambiguous(candidates) => Err(PluginsError::AmbiguousPlugin {
                query: query.to_string(),
                candidates: candidates.into_iter().map(|id| id.to_string()).collect(),
            }),
        }
    }
}

/// Resolve `query` against the registry.
///
/// An exact identity match wins. Otherwise every entry whose name component
/// equals or contains `query` is a candidate; exactly one candidate resolves.
pub fn resolve(registry: &InstalledPlugins, query: &str) -> Resolution {
    if let Some(entry) = registry.get(query) {
        return Resolution::Unique(entry.id.clone());
    }

    let mut candidates: Vec<PluginId> = registry
        .sorted_by_name()
        .into_iter()
        .filter(|entry| entry.name().contains(query))
        .map(|entry| entry.id.clone())
        .collect();

    match candidates.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Unique(candidates.remove(0)),
        _ => Resolution::Ambiguous(candidates),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::types::PluginInfo;

    fn registry(ids: &[&str]) -> InstalledPlugins {
        ids.iter().map(|id| PluginInfo::new(*id, vec![])).collect()
    }

    #[test]
    fn exact_match_wins_over_partial() {
        let registry = registry(&["lsp@a", "kotlin-lsp@b"]);
        assert_eq!(
            resolve(&registry, "lsp@a"),
            Resolution::Unique(PluginId::from("lsp@a"))
        );
    }

    #[test]
    fn name_equality_resolves() {
        let registry = registry(&["kotlin-lsp@official", "commit-commands@official"]);
        assert_eq!(
            resolve(&registry, "kotlin-lsp"),
            Resolution::Unique(PluginId::from("kotlin-lsp@official"))
        );
    }

    #[test]
    fn unique_substring_resolves() {
        let registry = registry(&["kotlin-lsp@official", "commit-commands@official"]);
        assert_eq!(
            resolve(&registry, "kotlin"),
            Resolution::Unique(PluginId::from("kotlin-lsp@official"))
        );
    }

    #[test]
    fn substring_is_matched_against_name_only() {
        let registry = registry(&["kotlin-lsp@official"]);
        assert_eq!(resolve(&registry, "official"), Resolution::NotFound);
    }

    #[test]
    fn zero_matches_is_not_found() {
        let registry = registry(&["kotlin-lsp@official"]);
        assert_eq!(resolve(&registry, "python"), Resolution::NotFound);
        assert_eq!(resolve(&InstalledPlugins::new(), "x"), Resolution::NotFound);
    }

    #[test]
    fn multiple_matches_are_ambiguous() {
        let registry = registry(&["rust-lsp@official", "kotlin-lsp@official", "notes@x"]);
        assert_eq!(
            resolve(&registry, "lsp"),
            Resolution::Ambiguous(vec![
                PluginId::from("kotlin-lsp@official"),
                PluginId::from("rust-lsp@official"),
            ])
        );
    }

    #[test]
    fn same_name_in_two_marketplaces_is_ambiguous() {
        let registry = registry(&["fmt@one", "fmt@two"]);
        let err = resolve(&registry, "fmt").into_result("fmt").unwrap_err();
        match err {
            PluginsError::AmbiguousPlugin { candidates, .. } => {
                assert_eq!(candidates, vec!["fmt@one", "fmt@two"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn not_found_into_result() {
        let err = Resolution::NotFound.into_result("ghost").unwrap_err();
        assert!(matches!(err, PluginsError::PluginNotFound { query } if query == "ghost"));
    }
}
