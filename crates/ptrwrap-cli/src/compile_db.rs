//! Reading `compile_commands.json`.
//!
//! Only the `-D` flags of an entry matter here: they name the macros that
//! count as defined when a unit is parsed.

use std::fs;
use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

/// File name looked up inside the build directory.
pub(crate) const DATABASE_FILE_NAME: &str = "compile_commands.json";

/// Errors raised while loading a compilation database.
#[derive(Debug, Error)]
pub(crate) enum CompileDbError {
    #[error("failed to read compilation database {path}: {source}")]
    Read { path: Utf8PathBuf, source: io::Error },
    #[error("failed to parse compilation database {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },
}

/// One entry of the database.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CompileCommand {
    directory: Utf8PathBuf,
    file: Utf8PathBuf,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    arguments: Option<Vec<String>>,
}

impl CompileCommand {
    /// Absolute, lexically normalised path of the compiled file.
    pub(crate) fn source_path(&self) -> Utf8PathBuf {
        normalize(&self.directory.join(&self.file))
    }

    /// Compiler arguments, from `arguments` or by splitting `command`.
    pub(crate) fn argv(&self) -> Vec<String> {
        self.arguments.clone().unwrap_or_else(|| {
            self.command
                .as_deref()
                .map(split_command_line)
                .unwrap_or_default()
        })
    }

    /// Macro names defined with `-DNAME`, `-DNAME=value` or `-D NAME`.
    pub(crate) fn defined_macros(&self) -> Vec<String> {
        let argv = self.argv();
        let mut macros = Vec::new();
        let mut args = argv.iter();
        while let Some(arg) = args.next() {
            let definition = if arg == "-D" {
                args.next().map(String::as_str)
            } else {
                arg.strip_prefix("-D")
            };
            if let Some(name) = definition
                .and_then(|text| text.split('=').next())
                .filter(|name| !name.is_empty())
            {
                macros.push(name.to_owned());
            }
        }
        macros
    }
}

/// The parsed contents of `compile_commands.json`.
#[derive(Debug, Clone, Default)]
pub(crate) struct CompilationDatabase {
    entries: Vec<CompileCommand>,
}

impl CompilationDatabase {
    /// Loads `build_dir/compile_commands.json`.
    pub(crate) fn load(build_dir: &Utf8Path) -> Result<Self, CompileDbError> {
        let path = build_dir.join(DATABASE_FILE_NAME);
        let text = fs::read_to_string(&path).map_err(|source| CompileDbError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| CompileDbError::Parse { path, source })
    }

    /// Parses database JSON text.
    pub(crate) fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<CompileCommand> = serde_json::from_str(text)?;
        tracing::debug!(entries = entries.len(), "loaded compilation database");
        Ok(Self { entries })
    }

    /// Entry for `source`, which must already be absolute.
    pub(crate) fn lookup(&self, source: &Utf8Path) -> Option<&CompileCommand> {
        let wanted = normalize(source);
        self.entries
            .iter()
            .find(|entry| entry.source_path() == wanted)
    }
}

/// Removes `.` components and folds `..` into the preceding component.
pub(crate) fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            Utf8Component::Prefix(_) | Utf8Component::RootDir | Utf8Component::Normal(_) => {
                out.push(component);
            }
        }
    }
    out
}

/// Splits a shell command line on whitespace, honouring quotes and
/// backslash escapes.
fn split_command_line(command: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = command.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(open), _) if ch == open => quote = None,
            (Some('"') | None, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_word = true;
            }
            (Some(_), _) => current.push(ch),
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_word = true;
            }
            (None, _) if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, _) => {
                current.push(ch);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}
