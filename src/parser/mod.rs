pub mod ast;

use tracing::trace;

use crate::diagnostics::ParseError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::span::{Span, Spanned};
use ast::*;

/// Binding power of the ternary `?`. Both branches parse at this strength, so a
/// ternary in the else branch nests to the right.
const TERNARY_BP: u8 = 1;
/// Operand strength of prefix `!`, `-` and `~`: tighter than every binary operator.
const PREFIX_BP: u8 = 23;
/// Tallest tree the parser builds, and deepest it recurses. Every later pass
/// walks the tree recursively, so this bounds their stack use too.
const MAX_DEPTH: usize = 256;

/// Result of a parse: the best-effort tree plus every diagnostic found.
/// Callers must treat a non-empty `errors` as failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub expr: Option<Spanned<Expr>>,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn into_result(self) -> Result<Spanned<Expr>, Vec<ParseError>> {
        match (self.expr, self.errors) {
            (Some(expr), errors) if errors.is_empty() => Ok(expr),
            (None, errors) if errors.is_empty() => {
                Err(vec![ParseError::new("empty expression", Span::dummy())])
            }
            (_, errors) => Err(errors),
        }
    }
}

/// Precedence-climbing parser over a [`Lexer`], holding a current and a lookahead token.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    cur: Token,
    peek: Token,
    errors: Vec<ParseError>,
    /// Active `parse_expr` frames.
    depth: usize,
    /// Height of the node most recently returned by `parse_expr` or `parse_prefix`.
    height: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Self { lexer, cur, peek, errors: Vec::new(), depth: 0, height: 0 }
    }

    /// Parse one complete expression.
    pub fn parse(mut self) -> ParseOutput {
        let expr = self.parse_expr(0);
        if expr.is_some() && self.cur.kind != TokenKind::Eof {
            let msg = match self.cur.kind {
                TokenKind::Illegal => self.cur.describe(),
                _ => format!("unexpected {} after expression", self.cur.describe()),
            };
            self.error(msg, self.cur.span);
        }
        trace!(errors = self.errors.len(), "parsed expression");
        ParseOutput { expr, errors: self.errors }
    }

    fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        let peek = std::mem::replace(&mut self.peek, next);
        std::mem::replace(&mut self.cur, peek)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    fn error(&mut self, msg: impl Into<String>, span: Span) {
        self.errors.push(ParseError::new(msg, span));
    }

    fn expect(&mut self, expected: TokenKind) -> Option<Token> {
        if self.at(expected) {
            return Some(self.advance());
        }
        let msg = format!("expected '{expected}', found {}", self.cur.describe());
        self.error(msg, self.cur.span);
        None
    }

    /// Skip to the next `,` or `closer` at nesting depth zero, without consuming it.
    fn synchronize(&mut self, closer: TokenKind) {
        let mut depth = 0usize;
        loop {
            match self.cur.kind {
                TokenKind::Eof => return,
                TokenKind::Comma if depth == 0 => return,
                k if k == closer && depth == 0 => return,
                TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    fn parse_expr(&mut self, min_bp: u8) -> Option<Spanned<Expr>> {
        if self.depth >= MAX_DEPTH {
            self.error("expression nested too deeply", self.cur.span);
            return None;
        }
        self.depth += 1;
        let expr = self.parse_expr_bp(min_bp);
        self.depth -= 1;
        expr
    }

    /// Left-associative chains grow the tree without recursing, so the height
    /// of `lhs` is checked on every turn of the loop.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Option<Spanned<Expr>> {
        let mut lhs = self.parse_prefix()?;
        let mut height = self.height;

        loop {
            if height > MAX_DEPTH {
                self.error("expression nested too deeply", lhs.span);
                return None;
            }

            // Postfix forms bind tighter than anything else.
            match self.cur.kind {
                TokenKind::Dot => {
                    lhs = self.parse_member(lhs)?;
                    height += 1;
                    continue;
                }
                TokenKind::LParen => {
                    lhs = self.parse_call(lhs)?;
                    height = height.max(self.height) + 1;
                    continue;
                }
                TokenKind::LBracket => {
                    lhs = self.parse_index(lhs)?;
                    height = height.max(self.height) + 1;
                    continue;
                }
                TokenKind::Question => {
                    if TERNARY_BP < min_bp {
                        break;
                    }
                    lhs = self.parse_ternary(lhs)?;
                    height = height.max(self.height) + 1;
                    continue;
                }
                _ => {}
            }

            let Some(op) = binary_op(self.cur.kind) else { break };
            let (lbp, rbp) = infix_binding_power(op);
            if lbp < min_bp {
                break;
            }
            self.advance(); // consume operator

            let rhs = self.parse_expr(rbp)?;
            height = height.max(self.height) + 1;
            let span = lhs.span.to(rhs.span);
            lhs = Spanned::new(
                Expr::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                span,
            );
        }

        self.height = height;
        Some(lhs)
    }

    fn parse_prefix(&mut self) -> Option<Spanned<Expr>> {
        self.height = 1;
        match self.cur.kind {
            TokenKind::Number => {
                let tok = self.advance();
                match parse_number(&tok.literal) {
                    Ok(node) => Some(Spanned::new(node, tok.span)),
                    Err(msg) => {
                        self.error(msg, tok.span);
                        None
                    }
                }
            }
            TokenKind::Str => {
                let tok = self.advance();
                Some(Spanned::new(Expr::StringLit(tok.literal), tok.span))
            }
            TokenKind::Boolean => {
                let tok = self.advance();
                Some(Spanned::new(Expr::BoolLit(tok.literal == "true"), tok.span))
            }
            TokenKind::Null => {
                let tok = self.advance();
                Some(Spanned::new(Expr::NullLit, tok.span))
            }
            TokenKind::Ident => {
                let tok = self.advance();
                Some(Spanned::new(Expr::Ident(tok.literal), tok.span))
            }
            kind if kind.is_special_variable() => {
                let tok = self.advance();
                let var = special_variable(kind)?;
                Some(Spanned::new(Expr::Special(var), tok.span))
            }
            TokenKind::Minus | TokenKind::Bang | TokenKind::Tilde => {
                let tok = self.advance();
                let op = match tok.kind {
                    TokenKind::Minus => UnaryOp::Neg,
                    TokenKind::Bang => UnaryOp::Not,
                    _ => UnaryOp::BitNot,
                };
                let operand = self.parse_expr(PREFIX_BP)?;
                self.height += 1;
                let span = tok.span.to(operand.span);
                Some(Spanned::new(Expr::UnaryOp { op, operand: Box::new(operand) }, span))
            }
            TokenKind::LParen => {
                let open = self.advance();
                let inner = self.parse_expr(0)?;
                // A missing ')' is reported; the inner expression still stands.
                match self.expect(TokenKind::RParen) {
                    Some(close) => Some(Spanned::new(inner.node, open.span.to(close.span))),
                    None => Some(inner),
                }
            }
            TokenKind::LBracket => {
                let open = self.advance();
                let (elements, close) = self.parse_list(TokenKind::RBracket);
                self.height += 1;
                let span = open.span.to(close.unwrap_or(open.span));
                Some(Spanned::new(Expr::ArrayLit { elements }, span))
            }
            TokenKind::Sizeof | TokenKind::Alignof => {
                let tok = self.advance();
                self.expect(TokenKind::LParen)?;
                let operand = Box::new(self.parse_expr(0)?);
                self.height += 1;
                let close = self.expect(TokenKind::RParen)?;
                let span = tok.span.to(close.span);
                let node = if tok.kind == TokenKind::Sizeof {
                    Expr::SizeOf { operand }
                } else {
                    Expr::AlignOf { operand }
                };
                Some(Spanned::new(node, span))
            }
            TokenKind::Illegal => {
                let msg = self.cur.describe();
                self.error(msg, self.cur.span);
                None
            }
            TokenKind::Eof => {
                self.error("expected expression, found end of input", self.cur.span);
                None
            }
            _ => {
                let msg = format!("unexpected {} in expression", self.cur.describe());
                self.error(msg, self.cur.span);
                None
            }
        }
    }

    /// Comma-separated expressions up to `closer`. The opening token is already consumed.
    /// A bad element is reported and skipped so later elements still get checked.
    fn parse_list(&mut self, closer: TokenKind) -> (Vec<Spanned<Expr>>, Option<Span>) {
        let mut items = Vec::new();
        let mut height = 0;
        while !self.at(closer) && !self.at(TokenKind::Eof) {
            match self.parse_expr(0) {
                Some(item) => {
                    height = height.max(self.height);
                    items.push(item);
                }
                None => self.synchronize(closer),
            }
            if !self.at(TokenKind::Comma) && !self.at(closer) {
                let msg = format!("expected ',' or '{closer}', found {}", self.cur.describe());
                self.error(msg, self.cur.span);
                self.synchronize(closer);
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            }
        }
        self.height = height;
        let close = self.expect(closer).map(|t| t.span);
        (items, close)
    }

    /// `.name`, or the cast form `.as<T>()`.
    fn parse_member(&mut self, object: Spanned<Expr>) -> Option<Spanned<Expr>> {
        self.advance(); // consume '.'

        if self.at(TokenKind::As) {
            if self.peek.kind != TokenKind::Lt {
                let msg = format!("expected '<' after 'as', found {}", self.peek.describe());
                self.error(msg, self.peek.span);
                return None;
            }
            return self.parse_cast(object);
        }

        if self.at(TokenKind::Ident) || self.cur.kind.is_special_variable() {
            let tok = self.advance();
            let span = object.span.to(tok.span);
            let name = Spanned::new(tok.literal, tok.span);
            return Some(Spanned::new(Expr::Attr { object: Box::new(object), name }, span));
        }

        let msg = format!("expected identifier after '.', found {}", self.cur.describe());
        self.error(msg, self.cur.span);
        None
    }

    /// `as` '<' identifier '>' '(' ')' with `as` at the current token and `<` in lookahead.
    fn parse_cast(&mut self, operand: Spanned<Expr>) -> Option<Spanned<Expr>> {
        self.advance(); // consume 'as'
        self.advance(); // consume '<'
        if self.at(TokenKind::Gt) {
            self.error("empty type name in cast", self.cur.span);
            return None;
        }
        if !self.at(TokenKind::Ident) {
            let msg = format!("expected type name in cast, found {}", self.cur.describe());
            self.error(msg, self.cur.span);
            return None;
        }
        let ty_tok = self.advance();
        self.expect(TokenKind::Gt)?;
        self.expect(TokenKind::LParen)?;
        let close = self.expect(TokenKind::RParen)?;
        let span = operand.span.to(close.span);
        let ty = Spanned::new(ty_tok.literal, ty_tok.span);
        Some(Spanned::new(Expr::Cast { operand: Box::new(operand), ty }, span))
    }

    fn parse_call(&mut self, callee: Spanned<Expr>) -> Option<Spanned<Expr>> {
        let open = self.advance(); // consume '('
        if !matches!(callee.node, Expr::Ident(_) | Expr::Attr { .. }) {
            self.error("expression is not callable", callee.span.to(open.span));
        }
        let (args, close) = self.parse_list(TokenKind::RParen);
        let span = callee.span.to(close.unwrap_or(open.span));
        Some(Spanned::new(Expr::Call { callee: Box::new(callee), args }, span))
    }

    fn parse_index(&mut self, object: Spanned<Expr>) -> Option<Spanned<Expr>> {
        self.advance(); // consume '['
        let index = self.parse_expr(0)?;
        let close = self.expect(TokenKind::RBracket)?;
        let span = object.span.to(close.span);
        Some(Spanned::new(
            Expr::Index { object: Box::new(object), index: Box::new(index) },
            span,
        ))
    }

    fn parse_ternary(&mut self, condition: Spanned<Expr>) -> Option<Spanned<Expr>> {
        self.advance(); // consume '?'
        let then_expr = self.parse_expr(TERNARY_BP)?;
        let then_height = self.height;
        self.expect(TokenKind::Colon)?;
        let else_expr = self.parse_expr(TERNARY_BP)?;
        self.height = self.height.max(then_height);
        let span = condition.span.to(else_expr.span);
        Some(Spanned::new(
            Expr::Ternary {
                condition: Box::new(condition),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            span,
        ))
    }
}

/// Parse `source` as a single expression.
pub fn parse(source: &str) -> ParseOutput {
    Parser::new(source).parse()
}

fn special_variable(kind: TokenKind) -> Option<SpecialVar> {
    match kind {
        TokenKind::SelfKw => Some(SpecialVar::SelfValue),
        TokenKind::Stream => Some(SpecialVar::Stream),
        TokenKind::Parent => Some(SpecialVar::Parent),
        TokenKind::Root => Some(SpecialVar::Root),
        TokenKind::BytesRemaining => Some(SpecialVar::BytesRemaining),
        _ => None,
    }
}

fn binary_op(kind: TokenKind) -> Option<BinOp> {
    let op = match kind {
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::Percent => BinOp::Mod,
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::BangEq => BinOp::Neq,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::LtEq => BinOp::LtEq,
        TokenKind::GtEq => BinOp::GtEq,
        TokenKind::AmpAmp => BinOp::And,
        TokenKind::PipePipe => BinOp::Or,
        TokenKind::Amp => BinOp::BitAnd,
        TokenKind::Pipe => BinOp::BitOr,
        TokenKind::Caret => BinOp::BitXor,
        TokenKind::Shl => BinOp::Shl,
        TokenKind::Shr => BinOp::Shr,
        _ => return None,
    };
    Some(op)
}

fn infix_binding_power(op: BinOp) -> (u8, u8) {
    match op {
        BinOp::Or => (3, 4),
        BinOp::And => (5, 6),
        BinOp::BitOr => (7, 8),
        BinOp::BitXor => (9, 10),
        BinOp::BitAnd => (11, 12),
        BinOp::Eq | BinOp::Neq => (13, 14),
        BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => (15, 16),
        BinOp::Shl | BinOp::Shr => (17, 18),
        BinOp::Add | BinOp::Sub => (19, 20),
        BinOp::Mul | BinOp::Div | BinOp::Mod => (21, 22),
    }
}

/// Convert a number token's text into a literal node.
fn parse_number(text: &str) -> Result<Expr, String> {
    let cleaned = text.replace('_', "");
    let radix = match cleaned.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &cleaned[2..];
        if digits.is_empty() {
            return Err(format!("invalid number literal '{text}'"));
        }
        return u64::from_str_radix(digits, radix)
            .map(Expr::IntLit)
            .map_err(|_| format!("integer literal '{text}' is out of range"));
    }
    if cleaned.contains(['.', 'e', 'E']) {
        return match cleaned.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Expr::FloatLit(value)),
            Ok(_) => Err(format!("float literal '{text}' is out of range")),
            Err(_) => Err(format!("invalid float literal '{text}'")),
        };
    }
    cleaned
        .parse::<u64>()
        .map(Expr::IntLit)
        .map_err(|_| format!("integer literal '{text}' is out of range"))
}
