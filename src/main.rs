//! resultgen CLI

use clap::Parser;
use std::process::ExitCode;

use resultgen::cli::{render_error, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    resultgen::init_tracing(cli.verbose);

    match cli.execute() {
        Ok(exit) => exit.into(),
        Err(e) => {
            eprintln!("{}", render_error(e));
            ExitCode::FAILURE
        }
    }
}
