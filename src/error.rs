//! Library error types

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("could not read {}", .path.display())]
    #[diagnostic(code(resultgen::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration{}: {message}", located(.path))]
    #[diagnostic(
        code(resultgen::config::parse),
        help("see `[marker]`, `[grammar]` and `[emit]` in the resultgen documentation")
    )]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    #[diagnostic(code(resultgen::config::invalid))]
    Invalid(String),
}

fn located(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

/// Failure writing generated sources
#[derive(Error, Debug, Diagnostic)]
pub enum SinkError {
    #[error("could not write {}", .path.display())]
    #[diagnostic(code(resultgen::sink::io), help("check that the output directory is writable"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A failure while resolving or rendering one candidate site.
///
/// These never abort a run; the generator records them as site faults and
/// moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("method `{method}` is not declared on `{type_name}`")]
    MissingMethod { type_name: String, method: String },

    #[error("error code {code} appears more than once on `{method}`")]
    DuplicateCode { method: String, code: i64 },

    #[error("messages on `{method}` both derive the accessor name `{name}`")]
    NameCollision { method: String, name: String },

    #[error("return type `{0}` cannot be rendered")]
    UnrenderableType(String),
}

/// Why a return-type fix could not be applied
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum FixError {
    #[error("fix cancelled")]
    #[diagnostic(code(resultgen::fix::cancelled))]
    Cancelled,

    #[error("no method declaration encloses offset {0}")]
    #[diagnostic(code(resultgen::fix::no_declaration))]
    NoDeclaration(usize),

    #[error("corrected return type `{0}` does not parse")]
    #[diagnostic(code(resultgen::fix::reparse))]
    Reparse(String),

    #[error("return type already has a Result shape")]
    #[diagnostic(code(resultgen::fix::already_valid))]
    AlreadyValid,
}
