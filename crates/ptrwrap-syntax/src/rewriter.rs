//! Per-translation-unit rewrite driver.
//!
//! Wires the matcher, range resolver and synthesizer together and appends one
//! [`ReplacementRecord`] per rewritten field to the caller's [`EditBatch`].

use ptrwrap_edits::{EditBatch, ReplacementRecord};

use crate::error::SyntaxError;
use crate::matcher::Matcher;
use crate::pattern::{FieldPattern, SkipReason};
use crate::range;
use crate::report::SkipReport;
use crate::synth::Synthesizer;
use crate::unit::TranslationUnit;

/// Rewrites raw-pointer fields into wrapper types.
#[derive(Debug, Clone, Default)]
pub struct FieldRewriter {
    pattern: FieldPattern,
    synthesizer: Synthesizer,
}

impl FieldRewriter {
    /// Creates a rewriter from a pattern and a synthesizer.
    #[must_use]
    pub const fn new(pattern: FieldPattern, synthesizer: Synthesizer) -> Self {
        Self {
            pattern,
            synthesizer,
        }
    }

    /// The pattern deciding which fields are rewritten.
    #[must_use]
    pub const fn pattern(&self) -> &FieldPattern {
        &self.pattern
    }

    /// The synthesizer producing replacement text.
    #[must_use]
    pub const fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    /// Appends a record for every matching field of `unit` to `batch`, in
    /// source order.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::Precondition`] if a match carries a type the
    /// synthesizer cannot render. Records appended before the failure stay in
    /// `batch`; callers abort the run on such errors.
    pub fn rewrite(
        &self,
        unit: &TranslationUnit,
        batch: &mut EditBatch,
    ) -> Result<RewriteSummary, SyntaxError> {
        let mut skips = SkipReport::new();
        let mut edits = 0_usize;
        let mut missing = 0_usize;

        let matcher = Matcher::new(&self.pattern);
        matcher.for_each_match(unit, &mut skips, |matched| -> Result<(), SyntaxError> {
            let Some(span) = range::resolve(&matched) else {
                tracing::debug!(field = matched.qualified_name(), "no replaceable span");
                missing += 1;
                return Ok(());
            };
            let dropped = range::dropped_specifiers(&matched);
            if !dropped.is_empty() {
                tracing::debug!(
                    field = matched.qualified_name(),
                    ?dropped,
                    "replacement drops leading specifiers"
                );
            }
            let mut text = self.synthesizer.synthesize(matched.declared_type())?;
            if range::touches_name(&matched, &span) {
                text.push(' ');
            }
            batch.push(ReplacementRecord::from_range(unit.path(), span.byte_range(), text));
            edits += 1;
            Ok(())
        })?;

        skips.record_many(SkipReason::MissingLocation, missing);
        tracing::debug!(
            path = %unit.path(),
            edits,
            skipped = skips.total(),
            "rewrote translation unit"
        );
        Ok(RewriteSummary { edits, skips })
    }
}

/// Outcome of rewriting one translation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    edits: usize,
    skips: SkipReport,
}

impl RewriteSummary {
    /// Number of records appended.
    #[must_use]
    pub const fn edits(&self) -> usize {
        self.edits
    }

    /// Fields that were pointer-shaped but left alone.
    #[must_use]
    pub const fn skips(&self) -> &SkipReport {
        &self.skips
    }

    /// Returns whether any record was appended.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.edits > 0
    }

    /// Folds another unit's summary into this one.
    pub fn merge(&mut self, other: &Self) {
        self.edits = self.edits.saturating_add(other.edits);
        self.skips.merge(&other.skips);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::ShapeFilter;
    use crate::unit::UnitOptions;

    fn unit(source: &str) -> TranslationUnit {
        TranslationUnit::parse("/src/rw.h", source, &UnitOptions::default()).expect("unit")
    }

    #[test]
    fn appends_records_for_the_unit_path() {
        let unit = unit("class Foo;\nstruct S {\n  Foo* foo_;\n  const char* name_;\n};\n");
        let mut batch = EditBatch::new();

        let summary = FieldRewriter::default()
            .rewrite(&unit, &mut batch)
            .expect("rewrite");

        assert_eq!(summary.edits(), 2);
        assert!(summary.skips().is_empty());
        let texts: Vec<_> = batch.iter().map(ReplacementRecord::text).collect();
        assert_eq!(texts, ["CheckedPtr<Foo>", "CheckedPtr<const char>"]);
        assert!(batch.iter().all(|record| record.path().as_str() == "/src/rw.h"));
    }

    #[test]
    fn glued_name_gets_a_separator() {
        let source = "struct S { Foo*foo_; };";
        let unit = unit(source);
        let mut batch = EditBatch::new();

        FieldRewriter::default()
            .rewrite(&unit, &mut batch)
            .expect("rewrite");

        let record = batch.iter().next().expect("record");
        assert_eq!(source.get(record.byte_range()), Some("Foo*"));
        assert_eq!(record.text(), "CheckedPtr<Foo> ");
    }

    #[test]
    fn parenthesised_declarator_is_counted_as_missing_location() {
        let mut batch = EditBatch::new();

        let summary = FieldRewriter::default()
            .rewrite(&unit("struct S { int (*p); void* q; };"), &mut batch)
            .expect("rewrite");

        assert_eq!(summary.edits(), 1);
        assert_eq!(summary.skips().count(SkipReason::MissingLocation), 1);
    }

    #[test]
    fn summaries_merge() {
        let mut batch = EditBatch::new();
        let rewriter = FieldRewriter::default();
        let mut total = rewriter
            .rewrite(&unit("struct A { int* a; int** b; };"), &mut batch)
            .expect("first");
        let second = rewriter
            .rewrite(&unit("struct B { void* c; };"), &mut batch)
            .expect("second");

        total.merge(&second);

        assert_eq!(total.edits(), 2);
        assert_eq!(total.skips().count(SkipReason::MultiLevelPointer), 1);
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn pattern_without_alias_filter_breaches_the_synthesizer_contract() {
        let pattern = FieldPattern::with_filters(vec![ShapeFilter::FunctionPointers]);
        let rewriter = FieldRewriter::new(pattern, Synthesizer::default());
        let mut batch = EditBatch::new();

        let err = rewriter
            .rewrite(
                &unit("typedef int* IntPtr;\nstruct S { IntPtr p; };"),
                &mut batch,
            )
            .expect_err("alias reaches synthesizer");

        assert!(err.is_fatal());
        assert!(batch.is_empty());
    }
}
