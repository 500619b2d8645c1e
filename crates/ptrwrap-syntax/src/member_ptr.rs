//! Pointer-to-member declarators the C++ grammar cannot parse.
//!
//! The tree-sitter grammar rejects `int S::* p;` and `int (S::*f)(char);`.
//! Before parsing, the class qualifier in front of every `::*` is blanked
//! with spaces, which leaves a plain pointer declarator the grammar accepts.
//! Byte offsets and line breaks are unchanged, so the tree can be read
//! against the original text, where `::*` is still visible to the matcher.

use std::borrow::Cow;

/// Returns `source` with every `Qualifier::*` rewritten to `           *`.
///
/// Borrows `source` unchanged when it contains no `::*`.
pub(crate) fn parse_view(source: &str) -> Cow<'_, str> {
    let bytes = source.as_bytes();
    let spans: Vec<_> = member_pointer_qualifiers(bytes).collect();
    if spans.is_empty() {
        return Cow::Borrowed(source);
    }

    let mut view = bytes.to_vec();
    for (start, end) in spans {
        for byte in view.iter_mut().take(end).skip(start) {
            if *byte != b'\n' {
                *byte = b' ';
            }
        }
    }
    // Only ASCII bytes were replaced, by ASCII spaces.
    String::from_utf8(view).map_or(Cow::Borrowed(source), Cow::Owned)
}

/// Byte spans `[start, end)` of `Qualifier::` in front of each `::*`, the
/// trailing `::` included.
fn member_pointer_qualifiers(bytes: &[u8]) -> impl Iterator<Item = (usize, usize)> + '_ {
    (0..bytes.len())
        .filter(move |&at| is_scope_operator(bytes, at))
        .filter(move |&at| next_non_space(bytes, at.saturating_add(2)) == Some(b'*'))
        .filter_map(move |at| {
            let start = qualifier_start(bytes, at)?;
            let end = at.saturating_add(2);
            bytes
                .get(start..end)
                .filter(|span| span.is_ascii())
                .map(|_| (start, end))
        })
}

fn next_non_space(bytes: &[u8], from: usize) -> Option<u8> {
    bytes
        .iter()
        .skip(from)
        .copied()
        .find(|byte| !byte.is_ascii_whitespace())
}

fn is_scope_operator(bytes: &[u8], at: usize) -> bool {
    bytes
        .get(at..at.saturating_add(2))
        .is_some_and(|pair| pair == b"::")
}

const fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Walks back from the `::` at `colons` over `a::b<c, d>::` and returns where
/// the qualifier starts, or `None` when nothing names a class.
fn qualifier_start(bytes: &[u8], colons: usize) -> Option<usize> {
    let mut start = colons;
    loop {
        if start > 0 && bytes.get(start - 1) == Some(&b'>') {
            start = matching_open_angle(bytes, start - 1)?;
        }
        let ident_end = start;
        while start > 0 && bytes.get(start - 1).copied().is_some_and(is_ident_byte) {
            start -= 1;
        }
        if start == ident_end {
            break;
        }
        if start >= 2 && is_scope_operator(bytes, start - 2) {
            start -= 2;
        } else {
            break;
        }
    }
    (start < colons).then_some(start)
}

/// Position of the `<` matching the `>` at `close`.
fn matching_open_angle(bytes: &[u8], close: usize) -> Option<usize> {
    let mut depth = 0_usize;
    let mut at = close;
    loop {
        match bytes.get(at)? {
            b'>' => depth += 1,
            b'<' => {
                depth -= 1;
                if depth == 0 {
                    return Some(at);
                }
            }
            b';' | b'{' | b'}' => return None,
            _ => {}
        }
        at = at.checked_sub(1)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("int S::* mp;", "int    * mp;")]
    #[case("int (MyStruct::*f)(char);", "int (          *f)(char);")]
    #[case("int ns::Outer<int, char>::*p;", "int                       *p;")]
    #[case("int ::ns::S::*p;", "int          *p;")]
    fn qualifiers_are_blanked(#[case] source: &str, #[case] expected: &str) {
        let view = parse_view(source);
        assert_eq!(view, expected);
        assert_eq!(view.len(), source.len());
    }

    #[rstest]
    #[case("struct S { int* p; };")]
    #[case("std::string s; int x = ::y * 2;")]
    fn other_sources_are_borrowed(#[case] source: &str) {
        assert!(matches!(parse_view(source), Cow::Borrowed(_)));
    }
}
