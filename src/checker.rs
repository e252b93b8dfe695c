//! Return-type contract checking
//!
//! Every method carrying the marker attribute must return a Result shape.
//! The check is stateless per declaration, so declarations are checked in
//! parallel.

use crate::config::MarkerConfig;
use crate::diagnostics::{error_codes::contract, Diagnostic, DiagnosticBag, Suggestion};
use crate::fixer::Fixer;
use crate::scanner::is_marked;
use crate::shape::ResultGrammar;
use crate::syntax::{CompilationUnit, MethodDecl};
use rayon::prelude::*;

/// How the contract applies to one declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationState {
    NotAnnotated,
    AnnotatedSync,
    AnnotatedAsync,
}

impl DeclarationState {
    pub fn of(method: &MethodDecl, marker: &MarkerConfig) -> Self {
        if !is_marked(method, marker) {
            DeclarationState::NotAnnotated
        } else if method.is_async() {
            DeclarationState::AnnotatedAsync
        } else {
            DeclarationState::AnnotatedSync
        }
    }
}

/// The return-type contract checker
pub struct Checker<'a> {
    marker: &'a MarkerConfig,
    grammar: &'a ResultGrammar,
}

impl<'a> Checker<'a> {
    pub fn new(marker: &'a MarkerConfig, grammar: &'a ResultGrammar) -> Self {
        Self { marker, grammar }
    }

    /// Check one declaration; at most one diagnostic
    pub fn check_method(&self, method: &MethodDecl) -> Option<Diagnostic> {
        let state = DeclarationState::of(method, self.marker);
        let is_async = match state {
            DeclarationState::NotAnnotated => return None,
            DeclarationState::AnnotatedSync => false,
            DeclarationState::AnnotatedAsync => true,
        };
        if self.grammar.conforms(&method.return_type, is_async) {
            return None;
        }

        let result = self.grammar.result_type();
        let message = if is_async {
            let wrapper = self.grammar.default_wrapper();
            format!(
                "Async method '{}' defines {} but doesn't return a {w}<{r}> or {w}<{r}<T>> value",
                method.name,
                self.marker.short_name,
                w = wrapper,
                r = result
            )
        } else {
            format!(
                "Method '{}' defines {} but doesn't return a {r} or {r}<T> value",
                method.name,
                self.marker.short_name,
                r = result
            )
        };

        let mut builder = Diagnostic::error(contract::INVALID_RETURN_TYPE)
            .message(message)
            .span(method.name_span.clone());
        if let Ok(edit) = Fixer::new(self.grammar).edit_for(method) {
            builder = builder.suggestion(Suggestion::new("Fix return type").with_edit(edit));
        }
        Some(builder.build())
    }

    /// Check every method of a unit
    pub fn check_unit(&self, unit: &CompilationUnit) -> DiagnosticBag {
        let mut bag: DiagnosticBag = unit
            .methods()
            .par_iter()
            .filter_map(|method| self.check_method(method))
            .collect::<Vec<_>>()
            .into_iter()
            .collect();
        bag.sort();
        bag
    }

    /// Check many units; diagnostics are ordered by file and position
    #[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
    pub fn check_units(&self, units: &[CompilationUnit]) -> DiagnosticBag {
        let mut bag = DiagnosticBag::new();
        let per_unit: Vec<DiagnosticBag> = units.par_iter().map(|unit| self.check_unit(unit)).collect();
        for unit_bag in per_unit {
            bag.merge(unit_bag);
        }
        bag.sort();
        tracing::debug!(errors = bag.error_count(), "return-type check finished");
        bag
    }
}

#[cfg(test)]
#[path = "checker_tests.rs"]
mod tests;
