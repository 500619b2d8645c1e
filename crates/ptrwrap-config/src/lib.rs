//! Layered configuration for the raw-pointer field rewriter.
//!
//! [`Config`] is resolved by `ortho_config` from, in increasing precedence:
//! built-in defaults, a TOML file (`--config-path` or `PTRWRAP_CONFIG_PATH`),
//! `PTRWRAP_*` environment variables, and command-line flags.

mod defaults;
mod logging;
mod policy;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_WRAPPER, default_log_filter, default_log_filter_string,
    default_log_format, default_multi_declarator, default_parse_errors, default_wrapper,
    default_wrapper_string,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use policy::{MultiDeclarator, ParseErrors};

/// Settings shared by every translation unit in a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "PTRWRAP")]
pub struct Config {
    /// Wrapper template written around the pointee type.
    #[ortho_config(default = default_wrapper_string())]
    pub wrapper: String,
    /// Handling of declarations with several declarators.
    #[ortho_config(default = default_multi_declarator())]
    pub multi_declarator: MultiDeclarator,
    /// Handling of sources that do not parse cleanly.
    #[ortho_config(default = default_parse_errors())]
    pub parse_errors: ParseErrors,
    /// `tracing` filter expression.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wrapper: default_wrapper_string(),
            multi_declarator: default_multi_declarator(),
            parse_errors: default_parse_errors(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Wrapper template name.
    #[must_use]
    pub fn wrapper(&self) -> &str {
        &self.wrapper
    }

    /// Multi-declarator policy.
    #[must_use]
    pub const fn multi_declarator(&self) -> MultiDeclarator {
        self.multi_declarator
    }

    /// Parse error policy.
    #[must_use]
    pub const fn parse_errors(&self) -> ParseErrors {
        self.parse_errors
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
