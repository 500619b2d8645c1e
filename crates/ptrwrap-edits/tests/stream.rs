//! End-to-end tests for the edit stream format.

use insta::assert_snapshot;
use rstest::{fixture, rstest};

use ptrwrap_edits::{
    BEGIN_MARKER, END_MARKER, EditBatch, ReplacementRecord, parse_edit_stream, write_edit_stream,
};

#[fixture]
fn multi_file_batch() -> EditBatch {
    [
        ReplacementRecord::new("/src/base/a.h", 17, 6, "CheckedPtr<Foo>"),
        ReplacementRecord::new("/src/base/a.h", 60, 12, "CheckedPtr<const char>"),
        ReplacementRecord::new("/src/ui/b.h", 8, 6, "CheckedPtr<void>"),
        ReplacementRecord::new("/src/ui/c.h", 0, 3, "line one\nline two"),
    ]
    .into_iter()
    .collect()
}

fn render(batch: &EditBatch) -> String {
    let mut out = Vec::new();
    write_edit_stream(batch, &mut out).unwrap_or_else(|err| panic!("write: {err}"));
    String::from_utf8(out).unwrap_or_else(|err| panic!("utf8: {err}"))
}

#[rstest]
fn stream_layout_is_stable(multi_file_batch: EditBatch) {
    let rendered = render(&multi_file_batch).trim_end().replace('\0', "<NUL>");
    assert_snapshot!(rendered, @r"
    ==== BEGIN EDITS ====
    r:::/src/base/a.h:::17:::6:::CheckedPtr<Foo>
    r:::/src/base/a.h:::60:::12:::CheckedPtr<const char>
    r:::/src/ui/b.h:::8:::6:::CheckedPtr<void>
    r:::/src/ui/c.h:::0:::3:::line one<NUL>line two
    ==== END EDITS ====
    ");
}

#[rstest]
fn stream_has_one_line_per_record_between_markers(multi_file_batch: EditBatch) {
    let rendered = render(&multi_file_batch);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.first().copied(), Some(BEGIN_MARKER));
    assert_eq!(lines.last().copied(), Some(END_MARKER));
    assert_eq!(lines.len(), multi_file_batch.len() + 2);
    assert_eq!(multi_file_batch.paths().len(), 3);
}

#[rstest]
fn every_record_parses_back_to_its_tuple(multi_file_batch: EditBatch) {
    let parsed = parse_edit_stream(&render(&multi_file_batch))
        .unwrap_or_else(|err| panic!("parse: {err}"));
    assert_eq!(parsed, multi_file_batch);
}
