use serde::{Deserialize, Serialize};

/// 1-based line/column of a character in the source expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Position of the first character of any source.
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte-offset span in source code, tagged with the position of its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub pos: Position,
}

impl Span {
    pub fn new(start: usize, end: usize, pos: Position) -> Self {
        Self { start, end, pos }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0, pos: Position::start() }
    }

    /// Span covering `self` through `other`, keeping the start position of `self`.
    pub fn to(self, other: Span) -> Self {
        Self { start: self.start, end: other.end.max(self.end), pos: self.pos }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A value annotated with its source span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    pub fn pos(&self) -> Position {
        self.span.pos
    }
}
