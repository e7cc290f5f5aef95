//! Read-only AST traversal.
//!
//! Implement [`Visitor`] for an analysis pass and override only the hooks you
//! need. Call [`walk_expr`] inside a `visit_expr` override to keep the default
//! recursion; omit it to prune traversal at that node.
//!
//! Use a visitor for passes where most arms would be pure recursion (variable
//! collection, debug printing). Lowering to target syntax is a manual `match`
//! in `codegen`.

use std::collections::BTreeSet;

use crate::parser::ast::*;
use crate::span::{Span, Spanned};

pub trait Visitor: Sized {
    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(self, expr);
    }

    /// Identifier in value position.
    fn visit_ident(&mut self, _name: &str, _span: Span) {}

    fn visit_special(&mut self, _var: SpecialVar, _span: Span) {}
}

impl Spanned<Expr> {
    /// Hand this node to `visitor` through its `visit_expr` hook.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        visitor.visit_expr(self);
    }
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Spanned<Expr>) {
    match &expr.node {
        // Leaves
        Expr::BoolLit(_) | Expr::IntLit(_) | Expr::FloatLit(_) | Expr::StringLit(_) | Expr::NullLit => {}
        Expr::Ident(name) => v.visit_ident(name, expr.span),
        Expr::Special(var) => v.visit_special(*var, expr.span),

        Expr::UnaryOp { operand, .. } => v.visit_expr(operand),
        Expr::BinOp { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        Expr::Ternary { condition, then_expr, else_expr } => {
            v.visit_expr(condition);
            v.visit_expr(then_expr);
            v.visit_expr(else_expr);
        }
        Expr::Attr { object, .. } => v.visit_expr(object),
        Expr::Call { callee, args } => {
            // A bare identifier callee names a function, not a variable.
            match &callee.node {
                Expr::Ident(_) => {}
                Expr::Attr { object, .. } => v.visit_expr(object),
                _ => v.visit_expr(callee),
            }
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::Index { object, index } => {
            v.visit_expr(object);
            v.visit_expr(index);
        }
        Expr::ArrayLit { elements } => {
            for el in elements {
                v.visit_expr(el);
            }
        }
        Expr::Cast { operand, .. } => v.visit_expr(operand),
        Expr::SizeOf { operand } | Expr::AlignOf { operand } => {
            // A bare identifier operand is a type name.
            if !matches!(operand.node, Expr::Ident(_)) {
                v.visit_expr(operand);
            }
        }
    }
}

/// Collects the variable names an expression reads, under their target-side names.
#[derive(Debug, Default)]
pub struct FreeVariables {
    pub names: BTreeSet<String>,
}

impl Visitor for FreeVariables {
    fn visit_ident(&mut self, name: &str, _span: Span) {
        self.names.insert(name.to_string());
    }

    fn visit_special(&mut self, var: SpecialVar, _span: Span) {
        self.names.insert(var.target_name().to_string());
    }
}

/// Variable names `expr` references, sorted.
pub fn free_variables(expr: &Spanned<Expr>) -> BTreeSet<String> {
    let mut collector = FreeVariables::default();
    expr.accept(&mut collector);
    collector.names
}
