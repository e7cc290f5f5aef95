//! Lexer behavior as seen from outside the crate: token kinds, literal text and positions.

use insta::assert_snapshot;
use ksexpr::lexer::{tokenize, Lexer, TokenKind};
use ksexpr::span::Position;

fn dump(source: &str) -> String {
    tokenize(source)
        .iter()
        .map(|t| format!("{:?} {:?} @{}", t.kind, t.literal, t.pos()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn stream_attribute_expression() {
    assert_snapshot!(dump("_io.pos + 0x10"), @r#"
    Stream "_io" @1:1
    Dot "." @1:4
    Ident "pos" @1:5
    Plus "+" @1:9
    Number "0x10" @1:11
    Eof "" @1:15
    "#);
}

#[test]
fn cast_expression() {
    assert_snapshot!(dump("v.as<u4le>()"), @r#"
    Ident "v" @1:1
    Dot "." @1:2
    As "as" @1:3
    Lt "<" @1:5
    Ident "u4le" @1:6
    Gt ">" @1:10
    LParen "(" @1:11
    RParen ")" @1:12
    Eof "" @1:13
    "#);
}

#[test]
fn columns_count_characters_not_bytes() {
    let toks = tokenize("'日本' + x");
    assert_eq!(toks[0].kind, TokenKind::Str);
    assert_eq!(toks[0].literal, "日本");
    assert_eq!(toks[1].kind, TokenKind::Plus);
    assert_eq!(toks[1].pos(), Position::new(1, 6));
    assert_eq!(toks[1].span.start, 9);
    assert_eq!(toks[2].pos(), Position::new(1, 8));
}

#[test]
fn newline_resets_column() {
    let toks = tokenize("a\n  && b");
    assert_eq!(toks[1].kind, TokenKind::AmpAmp);
    assert_eq!(toks[1].pos(), Position::new(2, 3));
    assert_eq!(toks[2].pos(), Position::new(2, 6));
}

#[test]
fn greedy_operators_without_spaces() {
    let kinds: Vec<TokenKind> = Lexer::new("a<=b>>c!=!d").map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::LtEq,
            TokenKind::Ident,
            TokenKind::Shr,
            TokenKind::Ident,
            TokenKind::BangEq,
            TokenKind::Bang,
            TokenKind::Ident,
        ]
    );
}

#[test]
fn unicode_escape_in_string() {
    let toks = tokenize(r#""\u00e9t\u00e9""#);
    assert_eq!(toks[0].literal, "été");
}

#[test]
fn illegal_characters_do_not_stop_lexing() {
    let kinds: Vec<TokenKind> = Lexer::new("a # $ b").map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Ident, TokenKind::Illegal, TokenKind::Illegal, TokenKind::Ident]
    );
}

#[test]
fn self_keyword_spellings() {
    let toks = tokenize("_ self");
    assert_eq!(toks[0].kind, TokenKind::SelfKw);
    assert_eq!(toks[1].kind, TokenKind::SelfKw);
}
