use serde::{Deserialize, Serialize};

use crate::span::Spanned;

/// One node of an expression tree. Children are owned, so a parsed tree is
/// finite and acyclic; positions live on the enclosing `Spanned`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    BoolLit(bool),
    IntLit(u64),
    FloatLit(f64),
    StringLit(String),
    NullLit,
    Ident(String),
    Special(SpecialVar),
    UnaryOp {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    BinOp {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Ternary {
        condition: Box<Spanned<Expr>>,
        then_expr: Box<Spanned<Expr>>,
        else_expr: Box<Spanned<Expr>>,
    },
    Attr {
        object: Box<Spanned<Expr>>,
        name: Spanned<String>,
    },
    /// `callee` is always an `Ident` or an `Attr`; the parser rejects other shapes.
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    Index {
        object: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    ArrayLit {
        elements: Vec<Spanned<Expr>>,
    },
    /// `value.as<T>()`
    Cast {
        operand: Box<Spanned<Expr>>,
        ty: Spanned<String>,
    },
    /// `sizeof(x)`; a bare identifier operand names a type.
    SizeOf {
        operand: Box<Spanned<Expr>>,
    },
    AlignOf {
        operand: Box<Spanned<Expr>>,
    },
}

/// The reserved variables every evaluation context provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialVar {
    /// The value currently being parsed (`_`).
    SelfValue,
    /// The active binary stream (`_io`).
    Stream,
    Parent,
    Root,
    BytesRemaining,
}

impl SpecialVar {
    /// Variable name bound in the target evaluation context.
    pub fn target_name(self) -> &'static str {
        match self {
            SpecialVar::SelfValue => "_",
            SpecialVar::Stream => "_io",
            SpecialVar::Parent => "_parent",
            SpecialVar::Root => "_root",
            SpecialVar::BytesRemaining => "_bytes_remaining",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Neg,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::BitNot => write!(f, "~"),
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
        };
        write!(f, "{s}")
    }
}
