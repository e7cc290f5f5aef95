//! Error values and rendered diagnostics.
//!
//! Rendered reports are checked by content, not layout, so ariadne upgrades
//! do not churn these tests.

use insta::assert_snapshot;
use ksexpr::diagnostics::{render_error_plain, ExprError};
use ksexpr::{compile_to_target, parse};
use std::path::PathBuf;

#[test]
fn syntax_error_display_lists_every_diagnostic() {
    let err = parse("f(@, 1 2)").unwrap_err();
    assert_snapshot!(err.to_string(), @"Syntax error: illegal character '@' at 1:3; expected ',' or ')', found number '2' at 1:8");
}

#[test]
fn each_syntax_error_gets_its_own_report() {
    let source = "f(@, 1 2)";
    let err = parse(source).unwrap_err();
    let rendered = render_error_plain(source, "<expr>", &err);
    assert!(rendered.contains("syntax error in <expr> at 1:3"), "{rendered}");
    assert!(rendered.contains("syntax error in <expr> at 1:8"), "{rendered}");
    assert!(rendered.contains("illegal character '@'"), "{rendered}");
    assert!(rendered.contains("found number '2'"), "{rendered}");
}

#[test]
fn deeply_nested_input_is_a_syntax_error() {
    let source = format!("{}x", "-".repeat(2000));
    let err = compile_to_target(&source).unwrap_err();
    assert_snapshot!(err.to_string(), @"Syntax error: expression nested too deeply at 1:257");
}

#[test]
fn lowering_error_report_names_the_construct() {
    let source = "size + alignof(u4)";
    let err = compile_to_target(source).unwrap_err();
    let rendered = render_error_plain(source, "schema.ksy", &err);
    assert!(rendered.contains("lowering error in schema.ksy at 1:8"), "{rendered}");
    assert!(rendered.contains("alignof has no target representation"), "{rendered}");
}

#[test]
fn rendering_survives_multibyte_source() {
    let source = "'日本語' + @";
    let err = parse(source).unwrap_err();
    let rendered = render_error_plain(source, "<expr>", &err);
    assert!(rendered.contains("illegal character '@'"), "{rendered}");
}

#[test]
fn rendering_end_of_input_error() {
    let source = "(a + b";
    let err = parse(source).unwrap_err();
    let rendered = render_error_plain(source, "<expr>", &err);
    assert!(rendered.contains("expected ')', found end of input"), "{rendered}");
}

#[test]
fn empty_source_is_an_error() {
    let err = parse("").unwrap_err();
    assert_snapshot!(err.to_string(), @"Syntax error: expected expression, found end of input at 1:1");
    let rendered = render_error_plain("", "<expr>", &err);
    assert!(rendered.contains("expected expression"), "{rendered}");
}

#[test]
fn config_error_report_names_the_file() {
    let err = ExprError::config("ksexpr.toml: invalid config: bad", PathBuf::from("conf/ksexpr.toml"));
    assert_snapshot!(render_error_plain("", "<expr>", &err), @r"
    error[config]: ksexpr.toml: invalid config: bad
      --> conf/ksexpr.toml
    ");
}
