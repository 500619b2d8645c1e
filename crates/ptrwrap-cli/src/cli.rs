//! Command-line argument definitions for `rewrite-raw-ptr-fields`.
//!
//! Configuration flags (`--wrapper`, `--log-filter`, ...) are split off
//! before this parser runs and handed to `ortho_config`; see
//! [`crate::config`].

use camino::Utf8PathBuf;
use clap::Parser;

/// Rewrites raw-pointer member fields into wrapper types and prints the
/// resulting edit stream.
#[derive(Parser, Debug)]
#[command(name = "rewrite-raw-ptr-fields", version)]
pub(crate) struct Cli {
    /// Build directory containing `compile_commands.json`.
    #[arg(short = 'p', value_name = "BUILD_DIR")]
    pub(crate) build_dir: Option<Utf8PathBuf>,
    /// File listing fully-qualified field names to leave alone.
    #[arg(long, value_name = "FILE")]
    pub(crate) field_filter_file: Option<Utf8PathBuf>,
    /// Source files to rewrite.
    #[arg(value_name = "SOURCE", required = true, num_args = 1..)]
    pub(crate) sources: Vec<Utf8PathBuf>,
}
