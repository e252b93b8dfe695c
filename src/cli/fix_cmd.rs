//! Handler for the `resultgen fix` subcommand.

use std::path::{Path, PathBuf};

use crate::checker::Checker;
use crate::fixer::{CancellationToken, Fixer};
use crate::shape::ResultGrammar;

use super::{Exit, Workspace};

pub(crate) fn run_fix(
    paths: &[PathBuf],
    config: Option<&Path>,
    dry_run: bool,
    json: bool,
) -> Result<Exit, Box<dyn std::error::Error>> {
    let workspace = Workspace::load(paths, config)?;
    let (units, parse_errors) = workspace.parse();
    // Files with syntax errors are skipped; their diagnostics still show
    workspace.report(&parse_errors, json);

    let grammar = ResultGrammar::new(&workspace.config.grammar);
    let checker = Checker::new(&workspace.config.marker, &grammar);
    let fixer = Fixer::new(&grammar);
    let token = CancellationToken::new();

    let mut total_fixes = 0;
    let mut files_fixed = 0;
    let mut changes = Vec::new();

    for unit in &units {
        let violations = checker.check_unit(unit);
        if violations.is_empty() {
            continue;
        }

        let path = &unit.path;
        let source = workspace.source_of(path);
        let offsets: Vec<usize> = violations.diagnostics().iter().map(|d| d.span.start).collect();
        let fixed = fixer.fix_all(source, unit, &offsets, &token)?;

        for diagnostic in violations.diagnostics() {
            let Some(edit) = diagnostic.suggestions.first().and_then(|s| s.edits.first()) else {
                continue;
            };
            let original = source.get(edit.span.start..edit.span.end).unwrap_or_default();
            if json {
                changes.push(serde_json::json!({
                    "file": path.display().to_string(),
                    "line": edit.span.start_line,
                    "from": original,
                    "to": edit.replacement,
                }));
            } else {
                println!(
                    "{}:{}: `{}` -> `{}`",
                    path.display(),
                    edit.span.start_line,
                    original,
                    edit.replacement
                );
            }
        }

        total_fixes += offsets.len();
        files_fixed += 1;
        if !dry_run {
            std::fs::write(path, fixed).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        }
    }

    if json {
        println!(
            "{}",
            serde_json::json!({ "dry_run": dry_run, "fixes": changes })
        );
    } else if total_fixes == 0 {
        println!("No fixable return types found");
    } else if dry_run {
        println!(
            "\nWould fix {} return type(s) in {} file(s)",
            total_fixes, files_fixed
        );
    } else {
        println!("\nFixed {} return type(s) in {} file(s)", total_fixes, files_fixed);
    }

    Ok(if parse_errors.has_errors() {
        Exit::Failure
    } else {
        Exit::Success
    })
}
