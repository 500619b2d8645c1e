//! Command-line runtime for `rewrite-raw-ptr-fields`.
//!
//! The runtime splits configuration flags from the rest of the command line,
//! loads [`ptrwrap_config::Config`], installs telemetry, rewrites every
//! requested source and prints the edit stream to stdout. The interface can
//! be exercised from the binary entrypoint and from tests where configuration
//! loading and IO streams are substituted.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ptrwrap_config::Config;
use ptrwrap_edits::write_edit_stream;
use ptrwrap_syntax::FieldFilter;

mod cli;
mod compile_db;
mod config;
mod errors;
mod runner;
mod telemetry;

use cli::Cli;
use compile_db::{CompilationDatabase, normalize};
use config::{ConfigArgumentSplit, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
use errors::AppError;
use runner::Runner;

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    const fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli_arguments = prepare_cli_arguments(&args, &split);

        let result = Cli::try_parse_from(cli_arguments)
            .map_err(AppError::CliUsage)
            .and_then(|cli| {
                self.loader
                    .load(&split.config_arguments)
                    .map(|config| (cli, config))
            })
            .and_then(|(cli, config)| self.execute(&cli, &config));

        match result {
            Ok(exit_code) => exit_code,
            Err(AppError::CliUsage(error)) if !error.use_stderr() => {
                // `--help` and `--version` land here.
                let _ = write!(self.io.stdout, "{}", error.render());
                ExitCode::SUCCESS
            }
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{error}");
                ExitCode::from(error.exit_status())
            }
        }
    }

    fn execute(&mut self, cli: &Cli, config: &Config) -> Result<ExitCode, AppError> {
        telemetry::initialise(config)?;

        let field_filter = cli
            .field_filter_file
            .as_deref()
            .map(load_field_filter)
            .transpose()?
            .unwrap_or_default();
        let database = cli
            .build_dir
            .as_deref()
            .map(CompilationDatabase::load)
            .transpose()?;
        let sources = absolute_sources(&cli.sources)?;

        let outcome = Runner::new(config, field_filter, database).run(&sources)?;
        if !outcome.succeeded() {
            let _ = writeln!(
                self.io.stderr,
                "{} translation unit(s) failed; no edits were emitted",
                outcome.failures
            );
            return Ok(ExitCode::FAILURE);
        }

        write_edit_stream(&outcome.batch, &mut *self.io.stdout)?;
        Ok(ExitCode::SUCCESS)
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

fn prepare_cli_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    args.first()
        .into_iter()
        .chain(args.iter().skip(split.command_start))
        .cloned()
        .collect()
}

fn load_field_filter(path: &Utf8Path) -> Result<FieldFilter, AppError> {
    let text = fs::read_to_string(path).map_err(|source| AppError::FieldFilter {
        path: path.to_owned(),
        source,
    })?;
    let filter = FieldFilter::parse(&text);
    tracing::debug!(path = %path, fields = filter.len(), "loaded field filter");
    Ok(filter)
}

fn absolute_sources(sources: &[Utf8PathBuf]) -> Result<Vec<Utf8PathBuf>, AppError> {
    let current = env::current_dir().map_err(AppError::WorkingDirectory)?;
    let cwd = Utf8PathBuf::from_path_buf(current).map_err(|path| {
        AppError::WorkingDirectory(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} is not valid UTF-8", path.display()),
        ))
    })?;
    Ok(sources
        .iter()
        .map(|source| normalize(&cwd.join(source)))
        .collect())
}
