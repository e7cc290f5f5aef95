// Lexer invariants over arbitrary input.

use proptest::prelude::*;
use ksexpr::lexer::{tokenize, TokenKind};
use ksexpr::span::Position;

use crate::generators::expression;

/// Line/column of byte offset `offset`, counted the same way the lexer documents it.
fn position_of(source: &str, offset: usize) -> Position {
    let mut pos = Position::new(1, 1);
    for c in source[..offset].chars() {
        if c == '\n' {
            pos.line += 1;
            pos.column = 1;
        } else {
            pos.column += 1;
        }
    }
    pos
}

/// Property: the lexer never panics and always ends with exactly one Eof.
#[test]
fn prop_lexer_terminates_with_single_eof() {
    proptest!(|(source in "\\PC{0,300}")| {
        let tokens = tokenize(&source);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        prop_assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
    });
}

#[test]
fn prop_lexing_is_deterministic() {
    proptest!(|(source in "\\PC{0,300}")| {
        prop_assert_eq!(tokenize(&source), tokenize(&source));
    });
}

/// Property: spans are in bounds, char-aligned, ordered and non-overlapping.
#[test]
fn prop_spans_are_well_formed() {
    proptest!(|(source in "\\PC{0,300}")| {
        let tokens = tokenize(&source);
        let mut prev_end = 0;
        for tok in &tokens {
            prop_assert!(tok.span.start <= tok.span.end);
            prop_assert!(tok.span.end <= source.len());
            prop_assert!(source.is_char_boundary(tok.span.start));
            prop_assert!(source.is_char_boundary(tok.span.end));
            prop_assert!(prev_end <= tok.span.start, "overlap at {}", tok.span.start);
            prev_end = tok.span.end;
        }
    });
}

/// Property: every token's position is the line/column of its first byte.
#[test]
fn prop_positions_match_offsets() {
    proptest!(|(source in "[a-z0-9_ \\n\\t+*()<>=!.&|-]{0,200}")| {
        for tok in tokenize(&source) {
            prop_assert_eq!(tok.pos(), position_of(&source, tok.span.start));
        }
    });
}

/// Property: whitespace between tokens does not change the token stream.
#[test]
fn prop_extra_whitespace_is_ignored() {
    proptest!(|(source in expression())| {
        let spaced = source.replace('(', " ( ").replace(')', " ) ");
        let plain: Vec<_> = tokenize(&source).into_iter().map(|t| (t.kind, t.literal)).collect();
        let padded: Vec<_> = tokenize(&spaced).into_iter().map(|t| (t.kind, t.literal)).collect();
        prop_assert_eq!(plain, padded);
    });
}

/// Property: generated expressions never produce illegal tokens.
#[test]
fn prop_valid_expressions_lex_cleanly() {
    proptest!(|(source in expression())| {
        prop_assert!(tokenize(&source).iter().all(|t| t.kind != TokenKind::Illegal));
    });
}
