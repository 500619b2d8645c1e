//! In-memory application of replacement records to one file's text.
//!
//! This never touches disk. It is the reference for what the external
//! batch-apply step does with a single file's records, and is what the test
//! suites use to check round-trip and idempotence properties.

use crate::error::EditsError;
use crate::record::ReplacementRecord;

/// Applies `records` to `source`, which must be the original contents of the
/// file they target.
///
/// Records are applied from the highest offset down so earlier offsets stay
/// valid.
///
/// # Errors
///
/// Returns [`EditsError::Overlap`] when two records cover overlapping spans
/// and [`EditsError::OutOfBounds`] when a span leaves the source or splits a
/// UTF-8 character.
pub fn apply_edits<'r, I>(source: &str, records: I) -> Result<String, EditsError>
where
    I: IntoIterator<Item = &'r ReplacementRecord>,
{
    let mut sorted: Vec<&ReplacementRecord> = records.into_iter().collect();
    sorted.sort_by_key(|r| (r.offset(), r.length()));

    for pair in sorted.windows(2) {
        if let [first, second] = pair {
            let (a, b) = (first.byte_range(), second.byte_range());
            if b.start < a.end {
                return Err(EditsError::Overlap {
                    path: second.path().to_string(),
                    first_start: a.start,
                    first_end: a.end,
                    second_start: b.start,
                    second_end: b.end,
                });
            }
        }
    }

    let mut output = source.to_owned();
    for record in sorted.iter().rev() {
        let range = record.byte_range();
        if range.end > output.len()
            || !output.is_char_boundary(range.start)
            || !output.is_char_boundary(range.end)
        {
            return Err(EditsError::OutOfBounds {
                start: range.start,
                end: range.end,
                len: source.len(),
            });
        }
        output.replace_range(range, record.text());
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_highest_offset_first() {
        let source = "int* a; char* b;";
        let records = [
            ReplacementRecord::new("/f.h", 0, 5, "P<int>"),
            ReplacementRecord::new("/f.h", 8, 6, "P<char>"),
        ];
        let output = apply_edits(source, &records).expect("apply");
        assert_eq!(output, "P<int>a; P<char>b;");
    }

    #[test]
    fn input_order_does_not_matter() {
        let source = "abcdef";
        let records = [
            ReplacementRecord::new("/f", 4, 1, "E"),
            ReplacementRecord::new("/f", 0, 1, "A"),
        ];
        assert_eq!(apply_edits(source, &records).expect("apply"), "AbcdEf");
    }

    #[test]
    fn overlapping_records_are_rejected() {
        let records = [
            ReplacementRecord::new("/f", 0, 5, "x"),
            ReplacementRecord::new("/f", 0, 9, "y"),
        ];
        assert!(matches!(
            apply_edits("0123456789", &records),
            Err(EditsError::Overlap { .. })
        ));
    }

    #[test]
    fn out_of_bounds_records_are_rejected() {
        let records = [ReplacementRecord::new("/f", 3, 10, "x")];
        assert!(matches!(
            apply_edits("short", &records),
            Err(EditsError::OutOfBounds { len: 5, .. })
        ));
    }

    #[test]
    fn adjacent_records_do_not_overlap() {
        let records = [
            ReplacementRecord::new("/f", 0, 2, "A"),
            ReplacementRecord::new("/f", 2, 2, "B"),
        ];
        assert_eq!(apply_edits("aabb", &records).expect("apply"), "AB");
    }
}
