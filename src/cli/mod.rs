//! Command-line interface for resultgen
//!
//! Provides commands: generate, check, fix, explain

mod check_cmd;
mod explain_cmd;
mod fix_cmd;
mod generate_cmd;

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::{Config, Variant};
use crate::diagnostics::{Diagnostic, DiagnosticBag};
use crate::error::ConfigError;
use crate::syntax::{self, CompilationUnit};

/// resultgen - Result-based error accessors for C# code bases
#[derive(Parser, Debug)]
#[command(name = "resultgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output diagnostics and reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (default: nearest resultgen.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log pipeline activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate error accessors for every annotated method
    Generate {
        /// Files or directories to scan
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Output directory (default: `emit.out_dir` from the configuration)
        #[arg(long, short)]
        out_dir: Option<PathBuf>,

        /// Build variants to emit (both, debug, release)
        #[arg(long)]
        variant: Option<Variant>,

        /// Regenerate whenever a source file changes
        #[arg(long)]
        watch: bool,
    },

    /// Check that annotated methods return a Result shape
    Check {
        /// Files or directories to check
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,
    },

    /// Rewrite non-conforming return types
    Fix {
        /// Files or directories to fix
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Show what would be fixed without modifying files
        #[arg(long)]
        dry_run: bool,
    },

    /// Explain a diagnostic code in detail
    Explain {
        /// Diagnostic code to explain (e.g., E1001, W0101)
        code: String,
    },
}

/// How a command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    /// The command ran but found errors
    Failure,
}

impl From<Exit> for std::process::ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Success => std::process::ExitCode::SUCCESS,
            Exit::Failure => std::process::ExitCode::FAILURE,
        }
    }
}

impl Cli {
    /// Run the parsed command
    pub fn execute(self) -> Result<Exit, Box<dyn std::error::Error>> {
        let Cli {
            command,
            json,
            config,
            verbose: _,
        } = self;
        let config = config.as_deref();

        match command {
            Command::Generate {
                paths,
                out_dir,
                variant,
                watch,
            } => {
                let options = generate_cmd::GenerateOptions {
                    paths,
                    out_dir,
                    variant,
                    config,
                    json,
                };
                if watch {
                    generate_cmd::run_watch_generate(&options)
                } else {
                    generate_cmd::run_generate(&options)
                }
            }
            Command::Check { paths } => check_cmd::run_check(&paths, config, json),
            Command::Fix { paths, dry_run } => fix_cmd::run_fix(&paths, config, dry_run, json),
            Command::Explain { code } => explain_cmd::run_explain(&code),
        }
    }
}

/// Source files of one invocation, keyed by path
pub(crate) struct Workspace {
    pub(crate) config: Config,
    /// Directory relative configuration paths resolve against
    pub(crate) base: PathBuf,
    pub(crate) sources: BTreeMap<PathBuf, String>,
    /// Where generated sources go; never read back as input
    pub(crate) out_dir: PathBuf,
}

impl Workspace {
    /// Resolve configuration from the first path and read every `.cs` file
    /// under `paths`
    pub(crate) fn load(paths: &[PathBuf], config: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_with_output(paths, config, None)
    }

    /// Like [`Workspace::load`], with `out_dir` overriding `emit.out_dir`
    pub(crate) fn load_with_output(
        paths: &[PathBuf],
        config: Option<&Path>,
        out_dir: Option<&Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let start = paths.first().map(PathBuf::as_path).unwrap_or_else(|| Path::new("."));
        let (config, base) = Config::resolve(config, start)?;
        let out_dir = match out_dir {
            Some(dir) => dir.to_path_buf(),
            None => base.join(&config.emit.out_dir),
        };

        let mut sources = BTreeMap::new();
        for path in paths {
            for file in collect_sources(path, &out_dir)? {
                let text = std::fs::read_to_string(&file)
                    .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
                sources.insert(file, text);
            }
        }
        tracing::debug!(files = sources.len(), "loaded sources");

        Ok(Self {
            config,
            base,
            sources,
            out_dir,
        })
    }

    /// Parse every source in parallel. Files that fail to parse contribute
    /// their diagnostics instead of a unit.
    pub(crate) fn parse(&self) -> (Vec<CompilationUnit>, DiagnosticBag) {
        let parsed: Vec<_> = self
            .sources
            .par_iter()
            .map(|(path, text)| syntax::parse_source(text, path))
            .collect();

        let mut units = Vec::new();
        let mut errors = DiagnosticBag::new();
        for result in parsed {
            match result {
                Ok(unit) => units.push(unit),
                Err(bag) => errors.merge(bag),
            }
        }
        errors.sort();
        (units, errors)
    }

    pub(crate) fn source_of(&self, path: &Path) -> &str {
        self.sources.get(path).map(String::as_str).unwrap_or("")
    }

    /// Print diagnostics: JSON lines on stdout, or rendered on stderr
    pub(crate) fn report(&self, diagnostics: &DiagnosticBag, json: bool) {
        for diagnostic in diagnostics.diagnostics() {
            print_diagnostic(diagnostic, self.source_of(&diagnostic.span.file), json);
        }
    }
}

pub(crate) fn print_diagnostic(diagnostic: &Diagnostic, source: &str, json: bool) {
    if json {
        println!("{}", diagnostic.to_json());
    } else {
        eprintln!("{}", diagnostic.to_human_readable(source));
    }
}

/// `.cs` files under `path`, skipping the output directory, hidden
/// directories and build output
fn collect_sources(path: &Path, generated: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if path.is_file() {
        return Ok(if is_source(path) { vec![path.to_path_buf()] } else { Vec::new() });
    }
    if !path.is_dir() {
        return Err(format!("No such file or directory: {}", path.display()).into());
    }

    let mut results = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry_path = entry?.path();
        if entry_path.is_file() {
            if is_source(&entry_path) {
                results.push(entry_path);
            }
        } else if entry_path.is_dir() && !is_skipped_dir(&entry_path, generated) {
            results.extend(collect_sources(&entry_path, generated)?);
        }
    }
    results.sort();
    Ok(results)
}

fn is_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == crate::sink::SOURCE_EXTENSION)
}

fn is_skipped_dir(dir: &Path, generated: &Path) -> bool {
    let hidden_or_build = dir
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with('.') || name == "bin" || name == "obj");
    hidden_or_build || same_path(dir, generated)
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Render library errors that carry miette diagnostics; anything else is
/// printed plainly
pub fn render_error(error: Box<dyn std::error::Error>) -> String {
    let error = match error.downcast::<ConfigError>() {
        Ok(config) => return format!("{:?}", miette::Report::new(*config)),
        Err(other) => other,
    };
    let error = match error.downcast::<crate::error::SinkError>() {
        Ok(sink) => return format!("{:?}", miette::Report::new(*sink)),
        Err(other) => other,
    };
    format!("Error: {}", error)
}
