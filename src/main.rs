//! Styleform - command-line tool for compiling style transform lists

use std::process::ExitCode;

use styleform::cli;

fn main() -> ExitCode {
    cli::run()
}
