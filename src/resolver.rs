//! Return-shape resolution
//!
//! Turns a [`CandidateSite`] into an [`ErrorModel`] using the semantic
//! model: finds the method, reads its error annotations and infers the
//! payload type its accessors must produce.

use crate::config::MarkerConfig;
use crate::diagnostics::{error_codes::warnings, Diagnostic, DiagnosticBag};
use crate::error::GeneratorError;
use crate::scanner::CandidateSite;
use crate::semantic::{Compilation, MethodSymbol, TypeRef};
use crate::shape::{Inferred, ResultGrammar, ReturnShape, ShapeKind};
use crate::syntax::UsingDirective;
use serde::Serialize;

/// One `(code, message)` annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    pub code: i64,
    pub message: String,
}

impl ErrorEntry {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Everything needed to emit one site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorModel {
    pub site: CandidateSite,
    /// In declaration order
    pub entries: Vec<ErrorEntry>,
    pub shape: ReturnShape,
    /// Using directives visible at the method declaration
    pub imports: Vec<UsingDirective>,
}

/// Render a bound type as it should appear in generated code:
/// `[namespace.][containing.]name[<args>][suffix]`, with the method's own
/// generic parameters left bare.
pub fn render_type_name(ty: &TypeRef, method_generics: &[String]) -> String {
    if ty.is_tuple() {
        let elements: Vec<String> = ty
            .tuple_elements
            .iter()
            .map(|e| match &e.name {
                Some(name) => format!("{} {}", render_type_name(&e.ty, method_generics), name),
                None => render_type_name(&e.ty, method_generics),
            })
            .collect();
        return format!("({}){}", elements.join(", "), ty.suffix);
    }

    if ty.type_arguments.is_empty() && method_generics.iter().any(|g| g == &ty.name) {
        return format!("{}{}", ty.name, ty.suffix);
    }

    let mut out = String::new();
    for qualifier in [&ty.namespace, &ty.containing_type].into_iter().flatten() {
        out.push_str(qualifier);
        out.push('.');
    }
    out.push_str(&ty.name);
    if !ty.type_arguments.is_empty() {
        let args: Vec<String> = ty
            .type_arguments
            .iter()
            .map(|arg| render_type_name(arg, method_generics))
            .collect();
        out.push('<');
        out.push_str(&args.join(", "));
        out.push('>');
    }
    out.push_str(&ty.suffix);
    out
}

/// Builds error models against a compilation
pub struct Resolver<'a> {
    compilation: &'a Compilation,
    marker: &'a MarkerConfig,
    grammar: &'a ResultGrammar,
}

impl<'a> Resolver<'a> {
    pub fn new(compilation: &'a Compilation, marker: &'a MarkerConfig, grammar: &'a ResultGrammar) -> Self {
        Self {
            compilation,
            marker,
            grammar,
        }
    }

    /// Resolve one site. `Ok(None)` means the enclosing type is unknown and
    /// the site is dropped. Malformed annotations are skipped with a
    /// warning pushed to `diagnostics`.
    #[tracing::instrument(level = "debug", skip_all, fields(site = %site.qualified_id))]
    pub fn resolve(
        &self,
        site: &CandidateSite,
        diagnostics: &mut DiagnosticBag,
    ) -> Result<Option<ErrorModel>, GeneratorError> {
        let Some(symbol) = self.compilation.type_by_metadata_name(&site.metadata_name) else {
            tracing::debug!(metadata_name = %site.metadata_name, "enclosing type not found; site dropped");
            return Ok(None);
        };

        let method = self
            .select_method(symbol.methods_named(&site.method_name))
            .ok_or_else(|| GeneratorError::MissingMethod {
                type_name: symbol.name.clone(),
                method: site.method_name.clone(),
            })?;

        let entries = self.entries(method, diagnostics);
        let shape = self.shape(method)?;

        Ok(Some(ErrorModel {
            site: site.clone(),
            entries,
            shape,
            imports: method.imports.clone(),
        }))
    }

    /// First same-named method carrying the marker, else the first
    /// same-named method
    fn select_method<'m>(&self, methods: impl Iterator<Item = &'m MethodSymbol>) -> Option<&'m MethodSymbol> {
        let candidates: Vec<&MethodSymbol> = methods.collect();
        candidates
            .iter()
            .find(|m| m.attributes.iter().any(|a| self.marker.matches(&a.name)))
            .or_else(|| candidates.first())
            .copied()
    }

    fn entries(&self, method: &MethodSymbol, diagnostics: &mut DiagnosticBag) -> Vec<ErrorEntry> {
        let mut entries = Vec::new();
        for attribute in method.attributes.iter().filter(|a| self.marker.matches(&a.name)) {
            let code = attribute.int_argument(0, &self.marker.code_parameter);
            let message = attribute.str_argument(1, &self.marker.message_parameter);
            match (code, message) {
                (Some(code), Some(message)) => entries.push(ErrorEntry::new(code, message)),
                _ => diagnostics.push(
                    Diagnostic::warning(warnings::MALFORMED_ANNOTATION)
                        .message(format!(
                            "[{}] on `{}` needs an integer `{}` and a string `{}`; annotation skipped",
                            attribute.name,
                            method.name,
                            self.marker.code_parameter,
                            self.marker.message_parameter
                        ))
                        .span(attribute.span.clone())
                        .build(),
                ),
            }
        }
        entries
    }

    fn shape(&self, method: &MethodSymbol) -> Result<ReturnShape, GeneratorError> {
        let render = |ty: &TypeRef| {
            let rendered = render_type_name(ty, &method.type_parameters);
            if rendered.is_empty() {
                Err(GeneratorError::UnrenderableType(method.return_syntax.to_string()))
            } else {
                Ok(rendered)
            }
        };

        let kind = match self.grammar.infer(&method.return_type) {
            Inferred::Void => ShapeKind::Void,
            Inferred::Value(ty) => ShapeKind::Value(render(ty)?),
            Inferred::AsyncValue(ty) => ShapeKind::AsyncValue(render(ty)?),
        };

        Ok(ReturnShape {
            kind,
            generic_parameters: method.type_parameters.clone(),
        })
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
