//! Source locations and ranges within a single file.
//!
//! Locations carry the file they belong to. Two locations from different
//! files are unordered, and a range can never span files.

use std::cmp::Ordering;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::ops::Range;

use camino::Utf8Path;

/// Opaque identity of a source file within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(u64);

impl FileId {
    /// Derives the identity of the file at `path`.
    #[must_use]
    pub fn for_path(path: &Utf8Path) -> Self {
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// A byte position in one file's original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    file: FileId,
    offset: usize,
}

impl SourceLocation {
    /// Creates a location at byte `offset` of `file`.
    #[must_use]
    pub const fn new(file: FileId, offset: usize) -> Self {
        Self { file, offset }
    }

    /// File the location belongs to.
    #[must_use]
    pub const fn file(&self) -> FileId {
        self.file
    }

    /// Byte offset from the start of the file.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Moves the location by `delta` bytes within the same file.
    ///
    /// Returns `None` if the result would precede the start of the file.
    #[must_use]
    pub const fn with_offset(self, delta: isize) -> Option<Self> {
        match self.offset.checked_add_signed(delta) {
            Some(offset) => Some(Self {
                file: self.file,
                offset,
            }),
            None => None,
        }
    }
}

impl PartialOrd for SourceLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.file == other.file).then(|| self.offset.cmp(&other.offset))
    }
}

/// A half-open `[begin, end)` span inside one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRange {
    begin: SourceLocation,
    end: SourceLocation,
}

impl SourceRange {
    /// Creates a range, or `None` when the ends lie in different files or
    /// `begin` comes after `end`.
    #[must_use]
    pub fn new(begin: SourceLocation, end: SourceLocation) -> Option<Self> {
        match begin.partial_cmp(&end) {
            Some(Ordering::Less | Ordering::Equal) => Some(Self { begin, end }),
            _ => None,
        }
    }

    /// First byte of the range.
    #[must_use]
    pub const fn begin(&self) -> SourceLocation {
        self.begin
    }

    /// One past the last byte of the range.
    #[must_use]
    pub const fn end(&self) -> SourceLocation {
        self.end
    }

    /// File the range belongs to.
    #[must_use]
    pub const fn file(&self) -> FileId {
        self.begin.file
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.begin.offset)
    }

    /// Returns whether the range covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The range as byte offsets.
    #[must_use]
    pub const fn byte_range(&self) -> Range<usize> {
        self.begin.offset..self.end.offset
    }
}

/// Converts a Tree-sitter position (0-based) to one-based display coordinates.
#[must_use]
pub(crate) fn point_to_one_based(pos: tree_sitter::Point) -> (u32, u32) {
    // Line/column numbers will realistically never exceed u32::MAX.
    let line = u32::try_from(pos.row.saturating_add(1)).unwrap_or(u32::MAX);
    let column = u32::try_from(pos.column.saturating_add(1)).unwrap_or(u32::MAX);
    (line, column)
}
