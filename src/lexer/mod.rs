pub mod token;
pub use token::{Token, TokenKind};

use logos::Logos;

use crate::span::{Position, Span};

/// Pull-based lexer over a single expression string.
///
/// Never fails: bytes no pattern accepts come back as `Illegal` tokens and the
/// parser reports them. After the input is exhausted every call returns `Eof`.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    /// Byte offset up to which `line`/`column` are current.
    cursor: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            cursor: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn next_token(&mut self) -> Token {
        let Some(result) = self.inner.next() else {
            self.advance_to(self.source.len());
            let end = self.source.len();
            return Token::new(TokenKind::Eof, "", Span::new(end, end, self.cursor_position()));
        };

        let range = self.inner.span();
        self.advance_to(range.start);
        let span = Span::new(range.start, range.end, self.cursor_position());
        let slice = self.inner.slice();
        self.advance_to(range.end);

        match result {
            Ok(TokenKind::Str) => Token::new(TokenKind::Str, decode_string(slice), span),
            Ok(kind) => Token::new(kind, slice, span),
            Err(()) => Token::new(TokenKind::Illegal, slice, span),
        }
    }

    fn cursor_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Move the line/column counters forward over `source[cursor..offset]`.
    fn advance_to(&mut self, offset: usize) {
        if offset <= self.cursor {
            return;
        }
        for c in self.source[self.cursor..offset].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.cursor = offset;
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields tokens up to, but not including, `Eof`.
    fn next(&mut self) -> Option<Token> {
        let tok = self.next_token();
        (tok.kind != TokenKind::Eof).then_some(tok)
    }
}

/// Lex a whole expression. The returned vector always ends with `Eof`.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token();
        let done = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if done {
            return tokens;
        }
    }
}

/// Decode a quoted string slice (including its opening quote) into its contents.
/// A missing closing quote is tolerated.
fn decode_string(slice: &str) -> String {
    let mut chars = slice.chars();
    let Some(quote) = chars.next() else {
        return String::new();
    };
    let mut result = String::with_capacity(slice.len());
    while let Some(c) = chars.next() {
        if c == quote {
            break;
        }
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match decode_unicode_escape(&hex) {
                    Some(ch) => {
                        result.push(ch);
                        for _ in 0..4 {
                            chars.next();
                        }
                    }
                    None => result.push_str("\\u"),
                }
            }
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

fn decode_unicode_escape(hex: &str) -> Option<char> {
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}
