//! Handler for the `resultgen generate` subcommand.

use std::path::{Path, PathBuf};

use crate::config::Variant;
use crate::generator::Generator;
use crate::semantic::Compilation;
use crate::sink::DirectorySink;

use super::{Exit, Workspace};

pub(crate) struct GenerateOptions<'a> {
    pub(crate) paths: Vec<PathBuf>,
    pub(crate) out_dir: Option<PathBuf>,
    pub(crate) variant: Option<Variant>,
    pub(crate) config: Option<&'a Path>,
    pub(crate) json: bool,
}

pub(crate) fn run_generate(options: &GenerateOptions<'_>) -> Result<Exit, Box<dyn std::error::Error>> {
    let mut workspace = Workspace::load_with_output(&options.paths, options.config, options.out_dir.as_deref())?;
    if let Some(variant) = options.variant {
        workspace.config.emit.variant = variant;
    }
    let out_dir = workspace.out_dir.clone();

    let (units, parse_errors) = workspace.parse();
    workspace.report(&parse_errors, options.json);
    if parse_errors.has_errors() {
        eprintln!("\nGeneration skipped: {} file(s) failed to parse", count_files(&parse_errors));
        return Ok(Exit::Failure);
    }

    let compilation = Compilation::new(units);
    let mut sink = DirectorySink::create(&out_dir)?;
    let report = Generator::new(&workspace.config).execute(&compilation, &mut sink)?;
    let removed = sink.prune_stale(&workspace.config.emit.file_prefix)?;

    if options.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        workspace.report(&report.diagnostics, false);
        println!(
            "Generated {} artifact(s) for {} method(s) into {} ({} written, {} removed)",
            report.artifacts.len(),
            report.sites - report.dropped,
            out_dir.display(),
            sink.changed(),
            removed.len()
        );
    }

    Ok(if report.diagnostics.has_errors() {
        Exit::Failure
    } else {
        Exit::Success
    })
}

fn count_files(bag: &crate::diagnostics::DiagnosticBag) -> usize {
    let mut files: Vec<&Path> = bag.diagnostics().iter().map(|d| d.span.file.as_path()).collect();
    files.dedup();
    files.len()
}

/// Run `resultgen generate` in watch mode -- regenerate on source changes.
pub(crate) fn run_watch_generate(options: &GenerateOptions<'_>) -> Result<Exit, Box<dyn std::error::Error>> {
    use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
    use std::sync::mpsc;
    use std::time::Duration;

    println!("Watching for changes... (Ctrl+C to stop)\n");

    if let Err(e) = run_generate(options) {
        eprintln!("{}", super::render_error(e));
    }

    let (tx, rx) = mpsc::channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let touches_source = event
                    .paths
                    .iter()
                    .any(|p| p.extension().is_some_and(|ext| ext == crate::sink::SOURCE_EXTENSION));
                if touches_source
                    && (event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove())
                {
                    let _ = tx.send(event.paths);
                }
            }
        },
        Config::default().with_poll_interval(Duration::from_millis(100)),
    )?;

    for path in &options.paths {
        let watch_path = if path.is_file() {
            path.parent().unwrap_or(path).to_path_buf()
        } else {
            path.clone()
        };
        watcher.watch(&watch_path, RecursiveMode::Recursive)?;
    }

    loop {
        let mut changed = rx.recv()?;

        // Debounce: collect events until a quiet period
        while let Ok(more) = rx.recv_timeout(Duration::from_millis(200)) {
            changed.extend(more);
        }

        // Writes into the output directory do not retrigger a run
        let prefix = format!("{}_", generated_prefix(options)?);
        let only_generated = changed.iter().all(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| stem.starts_with(&prefix))
        });
        if only_generated {
            continue;
        }

        println!("Source changed, regenerating...\n");
        if let Err(e) = run_generate(options) {
            eprintln!("{}", super::render_error(e));
        }
        println!("\nWatching for changes... (Ctrl+C to stop)");
    }
}

fn generated_prefix(options: &GenerateOptions<'_>) -> Result<String, Box<dyn std::error::Error>> {
    let start = options.paths.first().map(PathBuf::as_path).unwrap_or_else(|| Path::new("."));
    let (config, _) = crate::config::Config::resolve(options.config, start)?;
    Ok(config.emit.file_prefix)
}
