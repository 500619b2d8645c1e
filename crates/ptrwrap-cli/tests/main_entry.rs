//! Integration tests for the `rewrite-raw-ptr-fields` binary entry point.
//!
//! Verifies the edit stream on stdout, configuration layering through the
//! environment, and user-facing error handling.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const FOO_HEADER: &str = "class Foo;\nstruct Bar {\n  Foo* foo_;\n  int (*func_ptr)();\n  char** argv_;\n};\n";

#[test]
fn prints_edit_stream_for_sources() {
    let dir = TempDir::new().expect("temp dir");
    let header = dir.path().join("foo.h");
    fs::write(&header, FOO_HEADER).expect("write header");

    let expected = format!(
        "==== BEGIN EDITS ====\nr:::{}:::26:::4:::CheckedPtr<Foo>\n==== END EDITS ====\n",
        header.display()
    );

    let mut command = cargo_bin_cmd!("rewrite-raw-ptr-fields");
    command.arg(&header);
    command.assert().success().stdout(expected);
}

#[test]
fn member_function_pointers_do_not_fail_the_run() {
    let dir = TempDir::new().expect("temp dir");
    let source = dir.path().join("various-types.cc");
    fs::write(
        &source,
        "struct MyStruct {\n  void* void_ptr;\n  int (MyStruct::*member_func_ptr)(char);\n};\n",
    )
    .expect("write source");

    let mut command = cargo_bin_cmd!("rewrite-raw-ptr-fields");
    command.arg(&source);
    command
        .assert()
        .success()
        .stdout(contains(":::20:::5:::CheckedPtr<void>\n").and(contains("MyStruct").not()));
}

#[test]
fn relative_sources_are_recorded_as_absolute() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("foo.h"), FOO_HEADER).expect("write header");

    let mut command = cargo_bin_cmd!("rewrite-raw-ptr-fields");
    command.current_dir(dir.path()).arg("foo.h");
    command
        .assert()
        .success()
        .stdout(contains(format!("r:::{}", dir.path().join("foo.h").display())));
}

#[test]
fn config_flags_and_environment_select_the_wrapper() {
    let dir = TempDir::new().expect("temp dir");
    let header = dir.path().join("foo.h");
    fs::write(&header, FOO_HEADER).expect("write header");

    let mut from_env = cargo_bin_cmd!("rewrite-raw-ptr-fields");
    from_env.env("PTRWRAP_WRAPPER", "raw_ptr").arg(&header);
    from_env.assert().success().stdout(contains("raw_ptr<Foo>"));

    let mut from_flag = cargo_bin_cmd!("rewrite-raw-ptr-fields");
    from_flag
        .env("PTRWRAP_WRAPPER", "raw_ptr")
        .args(["--wrapper", "base::CheckedPtr"])
        .arg(&header);
    from_flag
        .assert()
        .success()
        .stdout(contains("base::CheckedPtr<Foo>").and(contains("raw_ptr").not()));
}

#[test]
fn logs_go_to_stderr() {
    let dir = TempDir::new().expect("temp dir");
    let header = dir.path().join("foo.h");
    fs::write(&header, FOO_HEADER).expect("write header");

    let mut command = cargo_bin_cmd!("rewrite-raw-ptr-fields");
    command.args(["--log-filter", "info"]).arg(&header);
    command
        .assert()
        .success()
        .stdout(contains("rewrite finished").not())
        .stderr(contains("rewrite finished"));
}

#[test]
fn missing_source_exits_with_failure() {
    let dir = TempDir::new().expect("temp dir");

    let mut command = cargo_bin_cmd!("rewrite-raw-ptr-fields");
    command.arg(dir.path().join("absent.cc"));
    command
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(contains("failed"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let mut command = cargo_bin_cmd!("rewrite-raw-ptr-fields");
    command.args(["--frobnicate", "a.cc"]);
    command.assert().code(2);
}
