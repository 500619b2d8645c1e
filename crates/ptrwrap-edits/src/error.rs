//! Error types for edit collection, serialisation, and in-memory application.

use std::io;

use thiserror::Error;

/// Errors raised while writing, reading, or applying an edit stream.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EditsError {
    /// A record field contains the field delimiter, so the line could not be
    /// split back into its fields.
    #[error("{field} of edit for {path} contains the ':::' delimiter")]
    DelimiterInField {
        /// File path of the offending record.
        path: String,
        /// Name of the field holding the delimiter.
        field: &'static str,
    },

    /// The stream has no `==== BEGIN EDITS ====` line.
    #[error("edit stream is missing the begin marker")]
    MissingBeginMarker,

    /// The stream ended before `==== END EDITS ====`.
    #[error("edit stream is missing the end marker")]
    MissingEndMarker,

    /// A line between the markers could not be parsed into a record.
    #[error("malformed edit on line {line}: {message}")]
    MalformedRecord {
        /// One-based line number within the stream.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A record line carries an edit type other than `r`.
    #[error("unknown edit type '{edit_type}' on line {line}")]
    UnknownEditType {
        /// One-based line number within the stream.
        line: usize,
        /// The edit type that was found.
        edit_type: String,
    },

    /// Two records for the same file cover overlapping byte ranges.
    #[error("overlapping edits in {path}: [{first_start}, {first_end}) and [{second_start}, {second_end})")]
    Overlap {
        /// File the edits target.
        path: String,
        /// Start of the earlier record.
        first_start: usize,
        /// End of the earlier record.
        first_end: usize,
        /// Start of the later record.
        second_start: usize,
        /// End of the later record.
        second_end: usize,
    },

    /// A record points outside the source text or splits a UTF-8 character.
    #[error("edit [{start}, {end}) does not fit source of {len} bytes")]
    OutOfBounds {
        /// Start offset of the record.
        start: usize,
        /// End offset of the record.
        end: usize,
        /// Length of the source text.
        len: usize,
    },

    /// Writing the stream failed.
    #[error("failed to write edit stream: {0}")]
    Io(#[from] io::Error),
}

impl EditsError {
    /// Creates a malformed record error.
    #[must_use]
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            message: message.into(),
        }
    }
}
