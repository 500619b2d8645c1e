//! Entrypoint for `rewrite-raw-ptr-fields`.
//!
//! The binary delegates to [`ptrwrap_cli::run`], which prints the edit stream
//! on stdout and diagnostics on stderr.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    ptrwrap_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
