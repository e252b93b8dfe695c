//! Return-type correction
//!
//! Rewrites the declared return type of an annotated method into the
//! nearest Result shape: `void` becomes `Result`, `T` becomes `Result<T>`,
//! and async methods get the same inside their async wrapper. The new type
//! is rendered as text, re-parsed, and only the return-type span of the
//! declaration is replaced.

use crate::diagnostics::Edit;
use crate::error::FixError;
use crate::shape::ResultGrammar;
use crate::syntax::{parse_type_str, CompilationUnit, MethodDecl, TypeSyntax};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation shared between a caller and a running fix
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(FixError::Cancelled)` once cancelled
    pub fn check(&self) -> Result<(), FixError> {
        if self.is_cancelled() {
            Err(FixError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Written name of a type without its own type arguments:
/// `System.Threading.Tasks.Task`
fn head_text(ty: &TypeSyntax) -> String {
    let TypeSyntax::Named {
        alias, segments, ..
    } = ty
    else {
        return ty.to_string();
    };
    let Some((last, qualifier)) = segments.split_last() else {
        return ty.to_string();
    };

    let mut parts: Vec<String> = qualifier
        .iter()
        .map(|segment| {
            if segment.type_arguments.is_empty() {
                segment.name.clone()
            } else {
                let args: Vec<String> = segment.type_arguments.iter().map(|a| a.to_string()).collect();
                format!("{}<{}>", segment.name, args.join(", "))
            }
        })
        .collect();
    parts.push(last.name.clone());

    match alias {
        Some(alias) => format!("{}::{}", alias, parts.join(".")),
        None => parts.join("."),
    }
}

/// Computes and applies return-type corrections
pub struct Fixer<'a> {
    grammar: &'a ResultGrammar,
}

impl<'a> Fixer<'a> {
    pub fn new(grammar: &'a ResultGrammar) -> Self {
        Self { grammar }
    }

    /// The corrected return type of `method`, as text
    pub fn corrected_return_type(&self, method: &MethodDecl) -> String {
        let result = self.grammar.result_type();
        let ty = &method.return_type;

        // (wrapper, payload) where a missing payload means plain `Result`
        let (wrapper, payload) = if let Some(inner) = self.grammar.unwrap_async(ty) {
            (Some(head_text(ty)), Some(inner))
        } else if self.grammar.is_unit_wrapper(ty) {
            (Some(head_text(ty)), None)
        } else if ty.is_void() {
            (None, None)
        } else {
            (None, Some(ty))
        };

        let wrapper = match wrapper {
            Some(w) => Some(w),
            None if method.is_async() => Some(self.grammar.default_wrapper().to_string()),
            None => None,
        };

        let inner = match payload {
            None => result.to_string(),
            Some(p) if self.grammar.is_result(p) => p.to_string(),
            Some(p) => format!("{}<{}>", result, p),
        };

        match wrapper {
            Some(w) => format!("{}<{}>", w, inner),
            None => inner,
        }
    }

    /// The edit replacing the return type of `method`
    pub fn edit_for(&self, method: &MethodDecl) -> Result<Edit, FixError> {
        if self.grammar.conforms(&method.return_type, method.is_async()) {
            return Err(FixError::AlreadyValid);
        }
        let text = self.corrected_return_type(method);
        let node = parse_type_str(&text).map_err(|_| FixError::Reparse(text.clone()))?;
        Ok(Edit::new(method.return_type.span().clone(), node.to_string()))
    }

    /// Find the method declaration enclosing `offset` and compute its fix.
    /// The token is checked before each step.
    pub fn compute_edit(
        &self,
        unit: &CompilationUnit,
        offset: usize,
        token: &CancellationToken,
    ) -> Result<Edit, FixError> {
        token.check()?;
        let method = unit
            .method_at(offset)
            .ok_or(FixError::NoDeclaration(offset))?;
        token.check()?;
        self.edit_for(method)
    }

    /// Apply the fix for the declaration enclosing `offset` to `source`.
    /// On any error, including cancellation, `source` is left as it was.
    pub fn fix_at(
        &self,
        source: &str,
        unit: &CompilationUnit,
        offset: usize,
        token: &CancellationToken,
    ) -> Result<String, FixError> {
        let edit = self.compute_edit(unit, offset, token)?;
        token.check()?;
        Ok(Edit::apply_all(source, &[edit]))
    }

    /// Apply fixes at every offset in one pass
    pub fn fix_all(
        &self,
        source: &str,
        unit: &CompilationUnit,
        offsets: &[usize],
        token: &CancellationToken,
    ) -> Result<String, FixError> {
        let mut edits = Vec::new();
        for &offset in offsets {
            match self.compute_edit(unit, offset, token) {
                Ok(edit) => edits.push(edit),
                Err(FixError::AlreadyValid) => {}
                Err(e) => return Err(e),
            }
        }
        token.check()?;
        Ok(Edit::apply_all(source, &edits))
    }
}

#[cfg(test)]
#[path = "fixer_tests.rs"]
mod tests;
