use crate::logging::LogFormat;
use crate::policy::{MultiDeclarator, ParseErrors};

pub use ptrwrap_syntax::DEFAULT_WRAPPER;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default wrapper template name.
#[must_use]
pub const fn default_wrapper() -> &'static str {
    DEFAULT_WRAPPER
}

/// Owned wrapper name used where allocation is required (e.g. serde).
#[must_use]
pub fn default_wrapper_string() -> String {
    DEFAULT_WRAPPER.to_owned()
}

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format. Stdout carries the edit stream, so logs stay
/// readable on stderr.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default multi-declarator handling.
#[must_use]
pub const fn default_multi_declarator() -> MultiDeclarator {
    MultiDeclarator::Skip
}

/// Default parse error handling.
#[must_use]
pub const fn default_parse_errors() -> ParseErrors {
    ParseErrors::Abort
}
