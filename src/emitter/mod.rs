//! Template emission
//!
//! Turns one [`ErrorModel`] into normalized artifacts. Scaffolding shared by
//! every method of a type is gated by the run's [`Ledger`]; the method's own
//! accessor class and error-code constants are always produced.

pub mod naming;
pub mod normalize;
pub mod templates;

pub use naming::{accessor_name, trace_artifact_name};
pub use normalize::normalize;
pub use templates::NamedEntry;

use crate::config::{CollisionPolicy, Config, DuplicateCodePolicy, EmitConfig};
use crate::diagnostics::{error_codes::warnings, Diagnostic, DiagnosticBag};
use crate::error::GeneratorError;
use crate::ledger::{ArtifactKey, Ledger};
use crate::resolver::ErrorModel;
use crate::syntax::UsingKind;
use serde::Serialize;
use std::collections::HashSet;
use templates::Frame;

/// One generated, normalized source unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub key: ArtifactKey,
    pub name: String,
    pub text: String,
}

/// Renders error models with one configuration
pub struct Emitter<'a> {
    emit: &'a EmitConfig,
    result_type: &'a str,
}

impl<'a> Emitter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            emit: &config.emit,
            result_type: &config.grammar.result_type,
        }
    }

    /// Emit every artifact `model` needs. Nothing is recorded in `ledger`
    /// when the site faults.
    pub fn emit(
        &self,
        model: &ErrorModel,
        ledger: &mut Ledger,
        diagnostics: &mut DiagnosticBag,
    ) -> Result<Vec<Artifact>, GeneratorError> {
        let entries = self.name_entries(model, diagnostics)?;

        let site = &model.site;
        let namespace = site.namespace.as_str();
        let type_name = site.enclosing_type.as_str();
        let method = site.method_name.as_str();

        let imports = self.imports(model);
        let bare = Frame {
            namespace,
            runtime_namespace: &self.emit.runtime_namespace,
            imports: &[],
        };
        let importing = Frame {
            imports: &imports,
            ..bare.clone()
        };

        let (ns, ty) = (namespace.to_string(), type_name.to_string());
        let scaffolding = [
            (
                ArtifactKey::ResultsFactory {
                    namespace: ns.clone(),
                    type_name: ty.clone(),
                },
                templates::results_factory(&bare, type_name),
            ),
            (
                ArtifactKey::ErrorsProvider {
                    namespace: ns.clone(),
                    type_name: ty.clone(),
                    method: method.to_string(),
                },
                templates::errors_provider(&bare, type_name, method),
            ),
            (
                ArtifactKey::ErrorRepository {
                    namespace: ns.clone(),
                    type_name: ty.clone(),
                },
                templates::error_repository(&bare, type_name),
            ),
            (
                ArtifactKey::ClassErrorsProvider {
                    namespace: ns,
                    type_name: ty,
                },
                templates::class_errors_provider(&bare, type_name),
            ),
        ];

        let mut artifacts = Vec::new();
        for (key, text) in scaffolding {
            if ledger.insert_if_absent(&key) {
                artifacts.push(self.artifact(key, &text));
            } else {
                tracing::trace!(key = %key, "already emitted");
            }
        }

        let errors = templates::method_errors(
            &importing,
            type_name,
            method,
            self.result_type,
            &model.shape,
            &entries,
            self.emit.variant,
            &self.emit.debug_symbol,
        );
        artifacts.push(self.artifact(
            ArtifactKey::MethodErrors {
                namespace: namespace.to_string(),
                type_name: type_name.to_string(),
                method: method.to_string(),
            },
            &errors,
        ));

        let codes = templates::error_codes(&bare, type_name, method, &entries);
        artifacts.push(self.artifact(
            ArtifactKey::MethodErrorCodes {
                namespace: namespace.to_string(),
                type_name: type_name.to_string(),
                method: method.to_string(),
            },
            &codes,
        ));

        Ok(artifacts)
    }

    fn artifact(&self, key: ArtifactKey, text: &str) -> Artifact {
        Artifact {
            name: key.artifact_name(&self.emit.file_prefix),
            text: normalize(text),
            key,
        }
    }

    /// Using directives to repeat in the accessor class. Global usings
    /// already apply everywhere and the runtime namespace is imported at
    /// file level.
    fn imports(&self, model: &ErrorModel) -> Vec<String> {
        let mut seen = HashSet::new();
        model
            .imports
            .iter()
            .filter(|using| !using.global)
            .filter(|using| {
                !matches!(&using.kind, UsingKind::Namespace(name) if *name == self.emit.runtime_namespace)
            })
            .map(|using| using.to_string())
            .filter(|text| seen.insert(text.clone()))
            .collect()
    }

    /// Derive accessor names and apply the duplicate-code and collision
    /// policies
    fn name_entries(
        &self,
        model: &ErrorModel,
        diagnostics: &mut DiagnosticBag,
    ) -> Result<Vec<NamedEntry>, GeneratorError> {
        let site = &model.site;
        let mut codes: HashSet<i64> = HashSet::new();
        // Accessors live in `{Method}Errors` and constants in `{Method}`; a
        // C# member may not share its enclosing class's name
        let reserved = [format!("{}Errors", site.method_name), site.method_name.clone()];
        let clashes = |name: &str, taken: &HashSet<String>| {
            taken.contains(name) || reserved.iter().any(|r| r == name)
        };
        let mut taken: HashSet<String> = HashSet::new();
        let mut named = Vec::with_capacity(model.entries.len());

        for entry in &model.entries {
            if !codes.insert(entry.code) {
                match self.emit.duplicate_codes {
                    DuplicateCodePolicy::Error => {
                        return Err(GeneratorError::DuplicateCode {
                            method: site.qualified_id.clone(),
                            code: entry.code,
                        })
                    }
                    DuplicateCodePolicy::Warn => diagnostics.push(
                        Diagnostic::warning(warnings::DUPLICATE_ERROR_CODE)
                            .message(format!(
                                "error code {} is used more than once on `{}`",
                                entry.code, site.qualified_id
                            ))
                            .span(site.span.clone())
                            .build(),
                    ),
                    DuplicateCodePolicy::Allow => {}
                }
            }

            let base = accessor_name(&entry.message, entry.code);
            let mut name = base.clone();
            if clashes(&name, &taken) {
                if self.emit.name_collisions == CollisionPolicy::Error {
                    return Err(GeneratorError::NameCollision {
                        method: site.qualified_id.clone(),
                        name,
                    });
                }
                name = format!("{}{}", base, entry.code.unsigned_abs());
                let mut counter = 2;
                while clashes(&name, &taken) {
                    name = format!("{}{}_{}", base, entry.code.unsigned_abs(), counter);
                    counter += 1;
                }
                diagnostics.push(
                    Diagnostic::warning(warnings::IDENTIFIER_COLLISION)
                        .message(format!(
                            "message \"{}\" on `{}` derives the taken name `{}`; using `{}`",
                            entry.message, site.qualified_id, base, name
                        ))
                        .span(site.span.clone())
                        .build(),
                );
            }
            taken.insert(name.clone());
            named.push(NamedEntry {
                name,
                entry: entry.clone(),
            });
        }

        Ok(named)
    }
}
