use logos::Logos;
use serde::{Deserialize, Serialize};

use crate::span::{Position, Span};

/// Token categories produced by the lexer.
///
/// `Eof` and `Illegal` carry no pattern: the lexer synthesizes them at end of
/// input and for bytes no pattern accepts.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TokenKind {
    Eof,
    Illegal,

    // Literals
    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[oO][0-7_]+")]
    #[regex(r"0[bB][01_]+")]
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Number,
    // Unterminated forms run to end of input; the decoder drops the missing quote.
    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    #[regex(r#""([^"\\]|\\(.|\n))*\\?"#)]
    #[regex(r"'([^'\\]|\\(.|\n))*'")]
    #[regex(r"'([^'\\]|\\(.|\n))*\\?")]
    Str,
    #[token("true")]
    #[token("false")]
    Boolean,
    #[token("null")]
    Null,

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // Special variables
    #[token("_", priority = 3)]
    #[token("self")]
    SelfKw,
    #[token("_io")]
    Stream,
    #[token("_parent")]
    Parent,
    #[token("_root")]
    Root,
    #[token("_bytes_remaining")]
    BytesRemaining,

    // Built-in keywords
    #[token("sizeof")]
    Sizeof,
    #[token("alignof")]
    Alignof,
    #[token("as")]
    As,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
}

impl TokenKind {
    /// True for the five reserved special-variable keywords.
    pub fn is_special_variable(self) -> bool {
        matches!(
            self,
            TokenKind::SelfKw
                | TokenKind::Stream
                | TokenKind::Parent
                | TokenKind::Root
                | TokenKind::BytesRemaining
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Illegal => write!(f, "illegal character"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::Str => write!(f, "string"),
            TokenKind::Boolean => write!(f, "boolean"),
            TokenKind::Null => write!(f, "null"),
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::SelfKw => write!(f, "_"),
            TokenKind::Stream => write!(f, "_io"),
            TokenKind::Parent => write!(f, "_parent"),
            TokenKind::Root => write!(f, "_root"),
            TokenKind::BytesRemaining => write!(f, "_bytes_remaining"),
            TokenKind::Sizeof => write!(f, "sizeof"),
            TokenKind::Alignof => write!(f, "alignof"),
            TokenKind::As => write!(f, "as"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Amp => write!(f, "&"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::Tilde => write!(f, "~"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::BangEq => write!(f, "!="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::Shl => write!(f, "<<"),
            TokenKind::Shr => write!(f, ">>"),
            TokenKind::AmpAmp => write!(f, "&&"),
            TokenKind::PipePipe => write!(f, "||"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Question => write!(f, "?"),
            TokenKind::Colon => write!(f, ":"),
        }
    }
}

/// A lexed token. `literal` is the source text, except for strings where it
/// holds the decoded contents without quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Self { kind, literal: literal.into(), span }
    }

    pub fn pos(&self) -> Position {
        self.span.pos
    }

    /// Human-readable description used in parser diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Illegal => format!("illegal character '{}'", self.literal),
            TokenKind::Number | TokenKind::Boolean | TokenKind::Ident => {
                format!("{} '{}'", self.kind, self.literal)
            }
            TokenKind::Str => format!("string {:?}", self.literal),
            _ => format!("'{}'", self.kind),
        }
    }
}
