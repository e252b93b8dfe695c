//! resultgen
//!
//! Build-time generator for the Result error-reporting convention in C#
//! code bases. Methods annotated with `[ErrorResult(code, message)]` get
//! generated failure accessors, and their return types are checked (and
//! optionally fixed) against the `Result`/`Result<T>` grammar.

pub mod checker;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod fixer;
pub mod generator;
pub mod ledger;
pub mod resolver;
pub mod scanner;
pub mod semantic;
pub mod shape;
pub mod sink;
pub mod syntax;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the stderr subscriber once. Logging is on when `RUST_LOG` is
/// set; `verbose` without `RUST_LOG` means `resultgen=debug`.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) if verbose => EnvFilter::new("resultgen=debug"),
            Err(_) => return,
        };
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::checker::Checker;
    pub use crate::config::Config;
    pub use crate::diagnostics::{Diagnostic, DiagnosticBag, Severity, Span};
    pub use crate::emitter::Artifact;
    pub use crate::fixer::{CancellationToken, Fixer};
    pub use crate::generator::{GenerationReport, Generator};
    pub use crate::semantic::Compilation;
    pub use crate::sink::{DirectorySink, MemorySink, SourceSink};
}
