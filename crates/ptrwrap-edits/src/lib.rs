//! Replacement records, per-run edit batches, and the line-oriented edit
//! stream handed to the out-of-process batch-apply step.
//!
//! A run creates one [`EditBatch`], appends a [`ReplacementRecord`] for every
//! rewrite it decides on, and serialises the batch once with
//! [`write_edit_stream`]. [`parse_edit_stream`] and [`apply_edits`] are the
//! inverse operations, used to verify that emitted edits round-trip.
//!
//! # Example
//!
//! ```
//! use ptrwrap_edits::{EditBatch, ReplacementRecord, parse_edit_stream, write_edit_stream};
//!
//! let mut batch = EditBatch::new();
//! batch.push(ReplacementRecord::new("/src/foo.h", 42, 6, "CheckedPtr<Foo>"));
//!
//! let mut out = Vec::new();
//! write_edit_stream(&batch, &mut out)?;
//! let text = String::from_utf8_lossy(&out);
//! assert_eq!(parse_edit_stream(&text)?, batch);
//! # Ok::<(), ptrwrap_edits::EditsError>(())
//! ```

mod apply;
mod error;
mod record;
mod stream;

pub use apply::apply_edits;
pub use error::EditsError;
pub use record::{EditBatch, ReplacementRecord};
pub use stream::{
    BEGIN_MARKER, END_MARKER, FIELD_DELIMITER, REPLACE_EDIT_TYPE, format_record,
    parse_edit_stream, write_edit_stream,
};
