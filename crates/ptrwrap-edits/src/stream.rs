//! Line-oriented edit stream consumed by the batch-apply step.
//!
//! The format is a block bounded by marker lines, with one record per line:
//!
//! ```text
//! ==== BEGIN EDITS ====
//! r:::/abs/path.h:::120:::6:::CheckedPtr<Foo>
//! ==== END EDITS ====
//! ```
//!
//! Newlines inside replacement text are written as NUL so every record stays
//! on a single line. The `:::` delimiter is not escaped; a field containing it
//! is rejected instead.

use std::io::Write;

use crate::error::EditsError;
use crate::record::{EditBatch, ReplacementRecord};

/// First line of an edit block.
pub const BEGIN_MARKER: &str = "==== BEGIN EDITS ====";
/// Last line of an edit block.
pub const END_MARKER: &str = "==== END EDITS ====";
/// Separator between record fields.
pub const FIELD_DELIMITER: &str = ":::";
/// Edit type tag for replacements.
pub const REPLACE_EDIT_TYPE: &str = "r";

const NEWLINE_SENTINEL: char = '\0';

/// Writes `batch` as a complete edit block.
///
/// Every record is validated before the first byte is written, so a rejected
/// batch never leaves a truncated block behind.
///
/// # Errors
///
/// Returns [`EditsError::DelimiterInField`] when a path or replacement text
/// contains `:::`, or [`EditsError::Io`] when writing fails.
pub fn write_edit_stream<W: Write>(batch: &EditBatch, out: &mut W) -> Result<(), EditsError> {
    for record in batch {
        check_delimiters(record)?;
    }

    writeln!(out, "{BEGIN_MARKER}")?;
    for record in batch {
        writeln!(out, "{}", format_record(record))?;
    }
    writeln!(out, "{END_MARKER}")?;
    out.flush()?;
    Ok(())
}

/// Renders one record line, without the trailing newline.
#[must_use]
pub fn format_record(record: &ReplacementRecord) -> String {
    let text: String = record
        .text()
        .chars()
        .map(|c| if c == '\n' { NEWLINE_SENTINEL } else { c })
        .collect();
    format!(
        "{REPLACE_EDIT_TYPE}{d}{}{d}{}{d}{}{d}{text}",
        record.path(),
        record.offset(),
        record.length(),
        d = FIELD_DELIMITER,
    )
}

fn check_delimiters(record: &ReplacementRecord) -> Result<(), EditsError> {
    let offending = if record.path().as_str().contains(FIELD_DELIMITER) {
        Some("path")
    } else if record.text().contains(FIELD_DELIMITER) {
        Some("replacement text")
    } else {
        None
    };

    match offending {
        Some(field) => Err(EditsError::DelimiterInField {
            path: record.path().to_string(),
            field,
        }),
        None => Ok(()),
    }
}

/// Parses the first edit block found in `input`.
///
/// Lines before the begin marker are ignored, so tool output mixed with other
/// text can be read directly.
///
/// # Errors
///
/// Returns an error when a marker is missing, a record has the wrong number
/// of fields or a non-numeric offset/length, or the edit type is not `r`.
pub fn parse_edit_stream(input: &str) -> Result<EditBatch, EditsError> {
    let mut lines = input.lines().enumerate();

    lines
        .by_ref()
        .find(|(_, line)| strip_cr(line) == BEGIN_MARKER)
        .ok_or(EditsError::MissingBeginMarker)?;

    let mut batch = EditBatch::new();
    for (index, raw_line) in lines {
        let line = strip_cr(raw_line);
        if line == END_MARKER {
            return Ok(batch);
        }
        batch.push(parse_record(line, index.saturating_add(1))?);
    }

    Err(EditsError::MissingEndMarker)
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn parse_record(line: &str, line_number: usize) -> Result<ReplacementRecord, EditsError> {
    let mut fields = line.splitn(5, FIELD_DELIMITER);
    let (Some(edit_type), Some(path), Some(offset), Some(length), Some(text)) = (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) else {
        return Err(EditsError::malformed(line_number, "expected 5 fields"));
    };

    if edit_type != REPLACE_EDIT_TYPE {
        return Err(EditsError::UnknownEditType {
            line: line_number,
            edit_type: edit_type.to_owned(),
        });
    }

    let offset = parse_number(offset, "offset", line_number)?;
    let length = parse_number(length, "length", line_number)?;
    let text: String = text
        .chars()
        .map(|c| if c == NEWLINE_SENTINEL { '\n' } else { c })
        .collect();

    Ok(ReplacementRecord::new(path, offset, length, text))
}

fn parse_number(value: &str, field: &str, line_number: usize) -> Result<usize, EditsError> {
    value
        .parse::<usize>()
        .map_err(|e| EditsError::malformed(line_number, format!("invalid {field} '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn render(batch: &EditBatch) -> String {
        let mut out = Vec::new();
        write_edit_stream(batch, &mut out).expect("write");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn empty_batch_writes_only_markers() {
        assert_eq!(
            render(&EditBatch::new()),
            "==== BEGIN EDITS ====\n==== END EDITS ====\n"
        );
    }

    #[test]
    fn newlines_become_nul_and_back() {
        let record = ReplacementRecord::new("/src/a.h", 3, 2, "x\ny");
        let line = format_record(&record);
        assert_eq!(line, "r:::/src/a.h:::3:::2:::x\0y");

        let batch: EditBatch = std::iter::once(record.clone()).collect();
        let parsed = parse_edit_stream(&render(&batch)).expect("parse");
        assert_eq!(parsed.iter().next(), Some(&record));
    }

    #[test]
    fn delimiter_in_text_is_rejected_before_writing() {
        let batch: EditBatch =
            std::iter::once(ReplacementRecord::new("/a.h", 0, 1, "a:::b")).collect();
        let mut out = Vec::new();
        let err = write_edit_stream(&batch, &mut out).expect_err("must reject");
        assert!(matches!(err, EditsError::DelimiterInField { field: "replacement text", .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn leading_noise_is_ignored() {
        let input = "some log line\n==== BEGIN EDITS ====\nr:::/a.h:::1:::2:::T\n==== END EDITS ====\n";
        let batch = parse_edit_stream(input).expect("parse");
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn crlf_lines_are_accepted() {
        let input = "==== BEGIN EDITS ====\r\nr:::/a.h:::1:::2:::T\r\n==== END EDITS ====\r\n";
        let batch = parse_edit_stream(input).expect("parse");
        assert_eq!(batch.iter().next().map(ReplacementRecord::text), Some("T"));
    }

    #[test]
    fn text_may_be_empty() {
        let input = "==== BEGIN EDITS ====\nr:::/a.h:::1:::2:::\n==== END EDITS ====\n";
        let batch = parse_edit_stream(input).expect("parse");
        assert_eq!(batch.iter().next().map(ReplacementRecord::text), Some(""));
    }

    #[rstest]
    #[case("r:::/a.h:::1:::2:::T\n==== END EDITS ====\n")]
    #[case("")]
    fn missing_begin_marker_is_reported(#[case] input: &str) {
        assert!(matches!(
            parse_edit_stream(input),
            Err(EditsError::MissingBeginMarker)
        ));
    }

    #[test]
    fn missing_end_marker_is_reported() {
        let input = "==== BEGIN EDITS ====\nr:::/a.h:::1:::2:::T\n";
        assert!(matches!(
            parse_edit_stream(input),
            Err(EditsError::MissingEndMarker)
        ));
    }

    #[rstest]
    #[case("r:::/a.h:::1:::2")]
    #[case("r:::/a.h:::one:::2:::T")]
    #[case("r:::/a.h:::1:::-2:::T")]
    fn malformed_records_are_reported(#[case] record: &str) {
        let input = format!("{BEGIN_MARKER}\n{record}\n{END_MARKER}\n");
        assert!(matches!(
            parse_edit_stream(&input),
            Err(EditsError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn unknown_edit_type_is_reported() {
        let input = format!("{BEGIN_MARKER}\ninclude-user-header:::/a.h:::-1:::-1:::x.h\n{END_MARKER}\n");
        assert!(matches!(
            parse_edit_stream(&input),
            Err(EditsError::UnknownEditType { .. })
        ));
    }
}
