use crate::parser::ast::*;
use crate::span::Spanned;
use crate::visit::Visitor;

/// Render an expression tree as a fully parenthesized S-expression, e.g.
/// `1 + 2 * 3` becomes `(+ 1 (* 2 3))`.
pub fn to_sexpr(expr: &Spanned<Expr>) -> String {
    let mut pp = SexprPrinter { buf: String::new() };
    expr.accept(&mut pp);
    pp.buf
}

struct SexprPrinter {
    buf: String,
}

impl SexprPrinter {
    fn write(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn form<'a>(&mut self, head: &str, children: impl IntoIterator<Item = &'a Spanned<Expr>>) {
        self.write("(");
        self.write(head);
        for child in children {
            self.write(" ");
            self.visit_expr(child);
        }
        self.write(")");
    }
}

impl Visitor for SexprPrinter {
    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        match &expr.node {
            Expr::BoolLit(b) => self.write(if *b { "true" } else { "false" }),
            Expr::IntLit(n) => self.write(&n.to_string()),
            Expr::FloatLit(f) => self.write(&format!("{f:?}")),
            Expr::StringLit(s) => self.write(&format!("{s:?}")),
            Expr::NullLit => self.write("null"),
            Expr::Ident(name) => self.write(name),
            Expr::Special(var) => self.write(var.target_name()),
            Expr::UnaryOp { op, operand } => self.form(&op.to_string(), [&**operand]),
            Expr::BinOp { op, lhs, rhs } => self.form(&op.to_string(), [&**lhs, &**rhs]),
            Expr::Ternary { condition, then_expr, else_expr } => {
                self.form("?", [&**condition, &**then_expr, &**else_expr])
            }
            Expr::Attr { object, name } => {
                self.write("(. ");
                self.visit_expr(object);
                self.write(" ");
                self.write(&name.node);
                self.write(")");
            }
            Expr::Call { callee, args } => {
                self.form("call", std::iter::once(&**callee).chain(args.iter()))
            }
            Expr::Index { object, index } => self.form("index", [&**object, &**index]),
            Expr::ArrayLit { elements } => self.form("array", elements.iter()),
            Expr::Cast { operand, ty } => {
                self.write("(as ");
                self.visit_expr(operand);
                self.write(" ");
                self.write(&ty.node);
                self.write(")");
            }
            Expr::SizeOf { operand } => self.form("sizeof", [&**operand]),
            Expr::AlignOf { operand } => self.form("alignof", [&**operand]),
        }
    }
}
