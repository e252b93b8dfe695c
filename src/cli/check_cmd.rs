//! Handler for the `resultgen check` subcommand.

use std::path::{Path, PathBuf};

use crate::checker::Checker;
use crate::shape::ResultGrammar;

use super::{Exit, Workspace};

pub(crate) fn run_check(
    paths: &[PathBuf],
    config: Option<&Path>,
    json: bool,
) -> Result<Exit, Box<dyn std::error::Error>> {
    let workspace = Workspace::load(paths, config)?;
    let (units, mut diagnostics) = workspace.parse();

    let grammar = ResultGrammar::new(&workspace.config.grammar);
    let checker = Checker::new(&workspace.config.marker, &grammar);
    diagnostics.merge(checker.check_units(&units));
    diagnostics.sort();

    workspace.report(&diagnostics, json);

    let files_checked = workspace.sources.len();
    let errors = diagnostics.error_count();
    let warnings = diagnostics.warning_count();

    if errors > 0 {
        let mut parts = vec![format!("{} error(s)", errors)];
        if warnings > 0 {
            parts.push(format!("{} warning(s)", warnings));
        }
        eprintln!("\nChecked {} file(s), found {}", files_checked, parts.join(", "));
        return Ok(Exit::Failure);
    }

    if !json {
        if warnings > 0 {
            println!(
                "Checked {} file(s), no errors ({} warning(s))",
                files_checked, warnings
            );
        } else {
            println!("Checked {} file(s), no errors found", files_checked);
        }
    }
    Ok(Exit::Success)
}
