//! Tree-sitter powered detection and rewriting of raw-pointer member fields.
//!
//! The crate turns `Pointee* field_` declarations in C++ sources into
//! `Wrapper<Pointee> field_` replacement records. The pipeline is:
//!
//! - **Parsing** via [`TranslationUnit::parse`], which wraps [`Parser`] and
//!   builds a [`SemanticModel`] of the `typedef`/`using` aliases and macros
//!   the unit declares;
//! - **Matching** via [`Matcher`] and a [`FieldPattern`], whose
//!   [`ShapeFilter`]s skip shapes that cannot be wrapped (function pointers,
//!   multi-level pointers, member pointers, macro-spelled declarations);
//! - **Range resolution** via [`resolve_range`], covering the declaration up
//!   to the field name;
//! - **Synthesis** via [`Synthesizer`], printing the pointee type with tag
//!   keywords suppressed.
//!
//! [`FieldRewriter`] runs all of it for one unit and appends the results to a
//! [`ptrwrap_edits::EditBatch`].
//!
//! # Example
//!
//! ```
//! use ptrwrap_edits::EditBatch;
//! use ptrwrap_syntax::{FieldRewriter, TranslationUnit, UnitOptions};
//!
//! let unit = TranslationUnit::parse(
//!     "/src/foo.h",
//!     "struct S { void* void_ptr; };",
//!     &UnitOptions::default(),
//! )?;
//! let mut batch = EditBatch::new();
//! let summary = FieldRewriter::default().rewrite(&unit, &mut batch)?;
//!
//! assert_eq!(summary.edits(), 1);
//! assert_eq!(batch.iter().next().map(|r| r.text()), Some("CheckedPtr<void>"));
//! # Ok::<(), ptrwrap_syntax::SyntaxError>(())
//! ```

mod error;
mod language;
mod matcher;
mod member_ptr;
mod parser;
mod pattern;
mod position;
mod range;
mod report;
mod rewriter;
mod semantics;
mod synth;
mod types;
mod unit;

pub use error::SyntaxError;
pub use language::SupportedLanguage;
pub use matcher::{MatchedDeclaration, Matcher};
pub use parser::{ParseResult, Parser, SyntaxErrorInfo};
pub use pattern::{
    Classification, FieldFilter, FieldPattern, MultiDeclaratorPolicy, ShapeFilter, SkipReason,
};
pub use position::{FileId, SourceLocation, SourceRange};
pub use range::resolve as resolve_range;
pub use report::SkipReport;
pub use rewriter::{FieldRewriter, RewriteSummary};
pub use semantics::SemanticModel;
pub use synth::{DEFAULT_WRAPPER, Synthesizer};
pub use types::{PrintingPolicy, Qualifiers, TagKind, Type};
pub use unit::{ParseErrorPolicy, TranslationUnit, UnitOptions};
