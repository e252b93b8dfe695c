//! Declaration scanning
//!
//! A purely syntactic pass: every method carrying the marker attribute
//! becomes a [`CandidateSite`]. No name resolution happens here.

use crate::config::MarkerConfig;
use crate::diagnostics::Span;
use crate::semantic::visit_types;
use crate::syntax::{CompilationUnit, MethodDecl, TypeMember};
use serde::Serialize;
use std::collections::HashSet;

/// A method flagged for generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSite {
    /// `namespace.Type.Method`, empty segments omitted
    pub qualified_id: String,
    pub namespace: String,
    /// Nearest enclosing type name
    pub enclosing_type: String,
    /// Lookup name of the enclosing type
    pub metadata_name: String,
    pub method_name: String,
    /// The method identifier
    pub span: Span,
}

impl CandidateSite {
    pub fn new(namespace: &str, enclosing_type: &str, metadata_name: &str, method: &MethodDecl) -> Self {
        let qualified_id = [namespace, enclosing_type, method.name.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(".");
        Self {
            qualified_id,
            namespace: namespace.to_string(),
            enclosing_type: enclosing_type.to_string(),
            metadata_name: metadata_name.to_string(),
            method_name: method.name.clone(),
            span: method.name_span.clone(),
        }
    }
}

/// Whether any attribute on the method names the marker
pub fn is_marked(method: &MethodDecl, marker: &MarkerConfig) -> bool {
    method.attributes().any(|a| marker.matches(a.simple_name()))
}

/// Finds candidate sites in parsed units
pub struct Scanner<'a> {
    marker: &'a MarkerConfig,
}

impl<'a> Scanner<'a> {
    pub fn new(marker: &'a MarkerConfig) -> Self {
        Self { marker }
    }

    /// Candidate sites of one unit, outer types before nested ones
    pub fn scan(&self, unit: &CompilationUnit) -> Vec<CandidateSite> {
        let mut sites = Vec::new();
        visit_types(unit, &mut |decl, scope| {
            let metadata_name = scope.qualify(&decl.name);
            for member in &decl.members {
                if let TypeMember::Method(method) = member {
                    if is_marked(method, self.marker) {
                        sites.push(CandidateSite::new(
                            &scope.namespace,
                            &decl.name,
                            &metadata_name,
                            method,
                        ));
                    }
                }
            }
        });
        sites
    }

    /// Candidate sites of many units; on a repeated qualified id the first
    /// occurrence wins.
    pub fn scan_units(&self, units: &[CompilationUnit]) -> Vec<CandidateSite> {
        let mut seen = HashSet::new();
        let mut sites = Vec::new();
        for unit in units {
            for site in self.scan(unit) {
                if seen.insert(site.qualified_id.clone()) {
                    sites.push(site);
                } else {
                    tracing::debug!(site = %site.qualified_id, "duplicate candidate discarded");
                }
            }
        }
        sites
    }
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
