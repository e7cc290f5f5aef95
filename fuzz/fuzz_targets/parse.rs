#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

/// Fuzzing-friendly token alphabet, rendered back to source text so the
/// parser sees mostly well-formed lexemes in arbitrary orders.
#[derive(Arbitrary, Debug)]
enum FuzzToken {
    Ident,
    Int(u64),
    Float,
    Str,
    Stream,
    Parent,
    Sizeof,
    Alignof,
    As,
    Plus,
    Minus,
    Star,
    Amp,
    AmpAmp,
    Shl,
    Lt,
    Gt,
    Bang,
    Tilde,
    Question,
    Colon,
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
}

impl FuzzToken {
    fn text(&self) -> String {
        match self {
            FuzzToken::Ident => "x".to_string(),
            FuzzToken::Int(n) => n.to_string(),
            FuzzToken::Float => "1.5e3".to_string(),
            FuzzToken::Str => "\"s\"".to_string(),
            FuzzToken::Stream => "_io".to_string(),
            FuzzToken::Parent => "_parent".to_string(),
            FuzzToken::Sizeof => "sizeof".to_string(),
            FuzzToken::Alignof => "alignof".to_string(),
            FuzzToken::As => "as".to_string(),
            FuzzToken::Plus => "+".to_string(),
            FuzzToken::Minus => "-".to_string(),
            FuzzToken::Star => "*".to_string(),
            FuzzToken::Amp => "&".to_string(),
            FuzzToken::AmpAmp => "&&".to_string(),
            FuzzToken::Shl => "<<".to_string(),
            FuzzToken::Lt => "<".to_string(),
            FuzzToken::Gt => ">".to_string(),
            FuzzToken::Bang => "!".to_string(),
            FuzzToken::Tilde => "~".to_string(),
            FuzzToken::Question => "?".to_string(),
            FuzzToken::Colon => ":".to_string(),
            FuzzToken::Dot => ".".to_string(),
            FuzzToken::Comma => ",".to_string(),
            FuzzToken::LParen => "(".to_string(),
            FuzzToken::RParen => ")".to_string(),
            FuzzToken::LBracket => "[".to_string(),
            FuzzToken::RBracket => "]".to_string(),
        }
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzTokens {
    tokens: Vec<FuzzToken>,
}

fuzz_target!(|input: FuzzTokens| {
    let source = input.tokens.iter().map(FuzzToken::text).collect::<Vec<_>>().join(" ");

    // Should never panic; a missing tree must come with a diagnostic.
    let out = ksexpr::parser::parse(&source);
    assert!(out.expr.is_some() || !out.errors.is_empty());
});
