//! Per-run identity and dedup ledger
//!
//! Scaffolding artifacts (the factory entry, the per-method provider
//! property and the repository shells) must be emitted once per run no
//! matter how many sites request them. Method-level artifacts are never
//! deduplicated.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Composite identity of a generated artifact
///
/// `ResultsFactory`, `ErrorRepository` and `ClassErrorsProvider` are scoped
/// to namespace and type. `ErrorsProvider` is method-scoped on purpose: each
/// method contributes its own property to the shared `{Type}ResultsProvider`
/// partial class, so it is keyed by method while still deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ArtifactKey {
    /// `ResultsFactory.{Type}` entry point
    ResultsFactory { namespace: String, type_name: String },
    /// Accessor property for one method on `{Type}ResultsProvider`
    ErrorsProvider {
        namespace: String,
        type_name: String,
        method: String,
    },
    /// `ErrorCodeRepository.{Type}Errors` shell
    ErrorRepository { namespace: String, type_name: String },
    /// Top-level `{Type}Errors` shell
    ClassErrorsProvider { namespace: String, type_name: String },
    /// Accessor class of one method
    MethodErrors {
        namespace: String,
        type_name: String,
        method: String,
    },
    /// Error-code constants of one method
    MethodErrorCodes {
        namespace: String,
        type_name: String,
        method: String,
    },
}

impl ArtifactKey {
    /// Whether the ledger gates this key. Method accessor classes and
    /// error-code constants are always emitted.
    pub fn is_deduplicated(&self) -> bool {
        !matches!(
            self,
            ArtifactKey::MethodErrors { .. } | ArtifactKey::MethodErrorCodes { .. }
        )
    }

    /// Name segments after the prefix: namespace, type, optional method, kind
    pub fn segments(&self) -> Vec<&str> {
        let (namespace, type_name, method, kind) = match self {
            ArtifactKey::ResultsFactory {
                namespace,
                type_name,
            } => (namespace, type_name, None, "ResultsFactory"),
            ArtifactKey::ErrorsProvider {
                namespace,
                type_name,
                method,
            } => (namespace, type_name, Some(method), "ErrorsProvider"),
            ArtifactKey::ErrorRepository {
                namespace,
                type_name,
            } => (namespace, type_name, None, "ErrorRepository"),
            ArtifactKey::ClassErrorsProvider {
                namespace,
                type_name,
            } => (namespace, type_name, None, "ClassErrorsProvider"),
            ArtifactKey::MethodErrors {
                namespace,
                type_name,
                method,
            } => (namespace, type_name, Some(method), "Errors"),
            ArtifactKey::MethodErrorCodes {
                namespace,
                type_name,
                method,
            } => (namespace, type_name, Some(method), "ErrorCodes"),
        };

        [Some(namespace.as_str()), Some(type_name.as_str()), method.map(String::as_str), Some(kind)]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Artifact name: `{prefix}_{namespace}_{Type}[_{Method}]_{Kind}`, empty
    /// segments omitted
    pub fn artifact_name(&self, prefix: &str) -> String {
        let mut parts = vec![prefix];
        parts.extend(self.segments());
        parts
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join("_"))
    }
}

/// Keys emitted so far in this run
#[derive(Debug, Default)]
pub struct Ledger {
    emitted: HashSet<ArtifactKey>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key`; true when it should be emitted now. Keys that are not
    /// deduplicated always pass.
    pub fn insert_if_absent(&mut self, key: &ArtifactKey) -> bool {
        if !key.is_deduplicated() {
            return true;
        }
        self.emitted.insert(key.clone())
    }

    pub fn contains(&self, key: &ArtifactKey) -> bool {
        self.emitted.contains(key)
    }

    pub fn len(&self) -> usize {
        self.emitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory(namespace: &str, type_name: &str) -> ArtifactKey {
        ArtifactKey::ResultsFactory {
            namespace: namespace.to_string(),
            type_name: type_name.to_string(),
        }
    }

    fn codes(method: &str) -> ArtifactKey {
        ArtifactKey::MethodErrorCodes {
            namespace: "Game".to_string(),
            type_name: "Api".to_string(),
            method: method.to_string(),
        }
    }

    #[test]
    fn test_scaffolding_is_emitted_once() {
        let mut ledger = Ledger::new();
        assert!(ledger.insert_if_absent(&factory("Game", "Api")));
        assert!(!ledger.insert_if_absent(&factory("Game", "Api")));
        assert!(ledger.insert_if_absent(&factory("Game", "Shop")));
        assert!(ledger.insert_if_absent(&factory("Other", "Api")));
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_method_codes_always_pass() {
        let mut ledger = Ledger::new();
        assert!(ledger.insert_if_absent(&codes("Attack")));
        assert!(ledger.insert_if_absent(&codes("Attack")));
        assert!(ledger.is_empty());
        assert!(!ledger.contains(&codes("Attack")));
    }

    #[test]
    fn test_errors_provider_is_keyed_per_method() {
        let provider = |method: &str| ArtifactKey::ErrorsProvider {
            namespace: "Game".to_string(),
            type_name: "Api".to_string(),
            method: method.to_string(),
        };
        let mut ledger = Ledger::new();
        assert!(ledger.insert_if_absent(&provider("Attack")));
        assert!(ledger.insert_if_absent(&provider("Rest")));
        assert!(!ledger.insert_if_absent(&provider("Attack")));
        assert_eq!(provider("Rest").artifact_name("Gen"), "Gen_Game_Api_Rest_ErrorsProvider");
    }

    #[test]
    fn test_kinds_do_not_collide() {
        let mut ledger = Ledger::new();
        let repository = ArtifactKey::ErrorRepository {
            namespace: "Game".to_string(),
            type_name: "Api".to_string(),
        };
        assert!(ledger.insert_if_absent(&factory("Game", "Api")));
        assert!(ledger.insert_if_absent(&repository));
    }

    #[test]
    fn test_artifact_names() {
        assert_eq!(factory("Game.Combat", "Api").artifact_name("Gen"), "Gen_Game.Combat_Api_ResultsFactory");
        assert_eq!(factory("", "Api").artifact_name("Gen"), "Gen_Api_ResultsFactory");
        assert_eq!(codes("Attack").artifact_name("Gen"), "Gen_Game_Api_Attack_ErrorCodes");
        assert_eq!(codes("Attack").artifact_name(""), "Game_Api_Attack_ErrorCodes");
        assert_eq!(codes("Attack").to_string(), "Game_Api_Attack_ErrorCodes");
    }
}
