//! Declaration-level front end for C# sources
//!
//! This module provides:
//! - Lexer (tokenization)
//! - Parser (declaration tree construction)
//! - Syntax tree definitions
//! - Span tracking

pub mod ast;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod span;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::Parser;
pub use span::SourceFile;

use crate::diagnostics::{error_codes::syntax, Diagnostic, DiagnosticBag, Span};
use std::path::Path;

/// Parse a source file into a compilation unit
pub fn parse_file(path: &Path) -> Result<CompilationUnit, DiagnosticBag> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DiagnosticBag::from(
            Diagnostic::error(syntax::UNREADABLE_FILE)
                .message(format!("Could not read file: {}", e))
                .span(Span::file(path))
                .build(),
        )
    })?;

    parse_source(&content, path)
}

/// Parse source text into a compilation unit
pub fn parse_source(source: &str, path: &Path) -> Result<CompilationUnit, DiagnosticBag> {
    let source_file = SourceFile::new(path.to_path_buf(), source.to_string());
    let lexer = Lexer::new(&source_file);
    let mut parser = Parser::new(lexer, &source_file);
    parser.parse_compilation_unit()
}

/// Parse a single type such as `Task<Result<int>>`
pub fn parse_type_str(text: &str) -> Result<TypeSyntax, DiagnosticBag> {
    let source_file = SourceFile::new("<type>".into(), text.to_string());
    let lexer = Lexer::new(&source_file);
    let mut parser = Parser::new(lexer, &source_file);
    parser.parse_standalone_type()
}
