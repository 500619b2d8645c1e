//! Replacement records and the per-run batch that collects them.

use std::ops::Range;

use camino::{Utf8Path, Utf8PathBuf};

/// One textual substitution: replace `length` bytes at `offset` in `path`
/// with `text`.
///
/// Records are immutable once built. Offsets and lengths are byte counts in
/// the original file contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplacementRecord {
    path: Utf8PathBuf,
    offset: usize,
    length: usize,
    text: String,
}

impl ReplacementRecord {
    /// Creates a record replacing `length` bytes starting at `offset`.
    #[must_use]
    pub fn new(
        path: impl Into<Utf8PathBuf>,
        offset: usize,
        length: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            offset,
            length,
            text: text.into(),
        }
    }

    /// Creates a record from a half-open byte range.
    #[must_use]
    pub fn from_range(
        path: impl Into<Utf8PathBuf>,
        range: Range<usize>,
        text: impl Into<String>,
    ) -> Self {
        let length = range.end.saturating_sub(range.start);
        Self::new(path, range.start, length, text)
    }

    /// File the record applies to.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Byte offset of the replaced span.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Byte length of the replaced span in the original text.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Replacement text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The replaced span as a byte range.
    #[must_use]
    pub const fn byte_range(&self) -> Range<usize> {
        self.offset..self.offset.saturating_add(self.length)
    }
}

/// Ordered, append-only collection of records produced during one run.
///
/// The batch is handed to each translation unit by `&mut` reference, so
/// appends always go through a single writer. Batches built separately can be
/// combined with [`EditBatch::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBatch {
    records: Vec<ReplacementRecord>,
}

impl EditBatch {
    /// Creates an empty batch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends a record. Records are neither merged nor de-duplicated.
    pub fn push(&mut self, record: ReplacementRecord) {
        self.records.push(record);
    }

    /// Appends every record of `other`, preserving its order.
    pub fn merge(&mut self, other: Self) {
        self.records.extend(other.records);
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether no record has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ReplacementRecord> {
        self.records.iter()
    }

    /// Records targeting `path`, in insertion order.
    #[must_use]
    pub fn records_for(&self, path: &Utf8Path) -> Vec<&ReplacementRecord> {
        self.records.iter().filter(|r| r.path() == path).collect()
    }

    /// Distinct file paths, in order of first appearance.
    #[must_use]
    pub fn paths(&self) -> Vec<&Utf8Path> {
        let mut seen: Vec<&Utf8Path> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.path()) {
                seen.push(record.path());
            }
        }
        seen
    }

    /// Consumes the batch, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<ReplacementRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a EditBatch {
    type Item = &'a ReplacementRecord;
    type IntoIter = std::slice::Iter<'a, ReplacementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<ReplacementRecord> for EditBatch {
    fn from_iter<I: IntoIterator<Item = ReplacementRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
