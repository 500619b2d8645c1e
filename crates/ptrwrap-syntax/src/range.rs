//! Replacement span for a matched field.
//!
//! The span runs from the first token of the declaration up to the field
//! name. When the name is preceded by whitespace the span stops one byte
//! short of it, so `void* void_ptr;` yields `void*` and the space before
//! `void_ptr` survives the edit. The name, any default member initialiser,
//! and the trailing `;` stay outside it.

use crate::matcher::MatchedDeclaration;
use crate::position::SourceRange;

/// Declaration children that the replacement text does not reproduce.
const DROPPED_KINDS: &[&str] = &[
    "attribute_declaration",
    "attribute_specifier",
    "storage_class_specifier",
    "virtual",
    "ms_declspec_modifier",
    "alignas_qualifier",
];

/// Computes the span to replace for `matched`.
///
/// Returns `None` when the span would be empty or when its brackets do not
/// balance, as in `int (*p);`, where replacing the span would strand the
/// closing parenthesis. Callers count such declarations as skipped.
#[must_use]
pub fn resolve(matched: &MatchedDeclaration<'_>) -> Option<SourceRange> {
    let unit = matched.unit();
    let name = matched.name_location();
    let before_name = name.offset().checked_sub(1)?;
    let end = if unit
        .source()
        .as_bytes()
        .get(before_name)
        .is_some_and(u8::is_ascii_whitespace)
    {
        name.with_offset(-1)?
    } else {
        name
    };
    let range = SourceRange::new(matched.begin_location(), end).filter(|span| !span.is_empty())?;
    let text = unit.source().get(range.byte_range())?;
    brackets_balance(text).then_some(range)
}

/// Returns whether `range` runs right up to the name of `matched`, in which
/// case the replacement needs its own separator.
#[must_use]
pub(crate) fn touches_name(matched: &MatchedDeclaration<'_>, range: &SourceRange) -> bool {
    range.end().offset() == matched.name_node().start_byte()
}

/// Specifiers and attributes inside the span that the replacement drops,
/// such as `mutable` or `[[maybe_unused]]`.
pub(crate) fn dropped_specifiers<'u>(matched: &MatchedDeclaration<'u>) -> Vec<&'u str> {
    let declaration = matched.declaration();
    let name_start = matched.name_node().start_byte();
    let mut cursor = declaration.walk();
    let dropped = declaration
        .children(&mut cursor)
        .filter(|child| child.start_byte() < name_start)
        .filter(|child| DROPPED_KINDS.contains(&child.kind()))
        .map(|child| matched.unit().text(child))
        .collect();
    dropped
}

fn brackets_balance(text: &str) -> bool {
    let mut parens = 0_isize;
    let mut squares = 0_isize;
    for byte in text.bytes() {
        match byte {
            b'(' => parens += 1,
            b')' => parens -= 1,
            b'[' => squares += 1,
            b']' => squares -= 1,
            _ => {}
        }
        if parens < 0 || squares < 0 {
            return false;
        }
    }
    parens == 0 && squares == 0
}
