use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// One syntactic diagnostic. The parser collects these rather than stopping at the first.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{msg} at {}", span.pos)]
pub struct ParseError {
    pub msg: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(msg: impl Into<String>, span: Span) -> Self {
        Self { msg: msg.into(), span }
    }
}

/// A node the transformer cannot express in target syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    #[error("unsupported cast target type '{ty}'")]
    UnsupportedCast { ty: String, span: Span },

    #[error("{what} has no target representation")]
    Unsupported { what: String, span: Span },
}

impl LowerError {
    pub fn unsupported(what: impl Into<String>, span: Span) -> Self {
        Self::Unsupported { what: what.into(), span }
    }

    pub fn span(&self) -> Span {
        match self {
            LowerError::UnsupportedCast { span, .. } | LowerError::Unsupported { span, .. } => *span,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExprError {
    #[error("Syntax error: {}", join_parse_errors(.0))]
    Syntax(Vec<ParseError>),

    #[error("Lowering error: {0}")]
    Lower(#[from] LowerError),

    #[error("Engine error: {msg}")]
    Engine { msg: String },

    #[error("Config error: {msg}")]
    Config { msg: String, path: PathBuf },
}

impl ExprError {
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine { msg: msg.into() }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Config { msg: msg.into(), path }
    }
}

fn join_parse_errors(errors: &[ParseError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Render an ExprError with ariadne for nice terminal output.
pub fn render_error(source: &str, filename: &str, err: &ExprError) {
    let mut out = Vec::new();
    write_error(source, filename, err, true, &mut out);
    eprint!("{}", String::from_utf8_lossy(&out));
}

/// Same as [`render_error`] but into a string without colors; used by tests and `--json` mode.
pub fn render_error_plain(source: &str, filename: &str, err: &ExprError) -> String {
    let mut out = Vec::new();
    write_error(source, filename, err, false, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}

fn write_error(source: &str, filename: &str, err: &ExprError, color: bool, out: &mut Vec<u8>) {
    use std::io::Write;

    match err {
        ExprError::Syntax(errors) => {
            for e in errors {
                write_report(source, filename, "syntax error", &e.msg, e.span, color, out);
            }
        }
        ExprError::Lower(e) => {
            write_report(source, filename, "lowering error", &e.to_string(), e.span(), color, out);
        }
        ExprError::Engine { msg } => {
            let _ = writeln!(out, "error[engine]: {msg}");
        }
        ExprError::Config { msg, path } => {
            let _ = writeln!(out, "error[config]: {msg}");
            let _ = writeln!(out, "  --> {}", path.display());
        }
    }
}

fn write_report(
    source: &str,
    filename: &str,
    kind: &str,
    msg: &str,
    span: Span,
    color: bool,
    out: &mut Vec<u8>,
) {
    use ariadne::{Config, Label, Report, ReportKind, Source};
    use std::io::Write;

    // ariadne counts chars, spans count bytes; empty spans get one char of width.
    let total = source.chars().count();
    if total == 0 {
        let _ = writeln!(out, "error: {kind} in {filename} at {}: {msg}", span.pos);
        return;
    }
    let char_offset = |byte: usize| {
        let byte = byte.min(source.len());
        source.get(..byte).map_or(total, |prefix| prefix.chars().count())
    };
    let mut start = char_offset(span.start);
    let mut end = char_offset(span.end).max(start);
    if start == end {
        if end < total {
            end += 1;
        } else if start > 0 {
            start -= 1;
        }
    }
    let written = Report::build(ReportKind::Error, (), start)
        .with_config(Config::default().with_color(color))
        .with_message(format!("{kind} in {filename} at {}", span.pos))
        .with_label(Label::new(start..end).with_message(msg))
        .finish()
        .write(Source::from(source), &mut *out);
    if written.is_err() {
        let _ = writeln!(out, "error: {msg} at {}", span.pos);
    }
}
