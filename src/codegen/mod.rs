pub mod tables;

use std::fmt::Write;

use tracing::debug;

use crate::diagnostics::LowerError;
use crate::parser::ast::*;
use crate::span::Spanned;
use tables::OpLowering;

/// Lowers an expression tree to target-engine source text.
///
/// Emission is a single pre-order pass into `out`; the first node with no
/// target representation aborts the pass. The buffer is reset on every call,
/// so one `Transformer` can be reused across expressions.
#[derive(Debug, Default)]
pub struct Transformer {
    out: String,
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&mut self, expr: &Spanned<Expr>) -> Result<String, LowerError> {
        self.out.clear();
        if let Err(err) = self.emit(expr) {
            debug!(error = %err, "lowering failed");
            return Err(err);
        }
        Ok(std::mem::take(&mut self.out))
    }

    fn write(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn emit(&mut self, expr: &Spanned<Expr>) -> Result<(), LowerError> {
        match &expr.node {
            Expr::BoolLit(b) => self.write(if *b { "true" } else { "false" }),
            Expr::IntLit(n) => self.emit_int(*n),
            Expr::FloatLit(f) => {
                let _ = write!(self.out, "{f:?}");
            }
            Expr::StringLit(s) => write_quoted(&mut self.out, s),
            Expr::NullLit => self.write("null"),
            Expr::Ident(name) => self.write(name),
            Expr::Special(var) => self.write(var.target_name()),

            Expr::UnaryOp { op: UnaryOp::Neg, operand } => match operand.node {
                // i64::MIN only exists as a negated literal.
                Expr::IntLit(n) if n == i64::MIN.unsigned_abs() => {
                    let _ = write!(self.out, "{}", i64::MIN);
                }
                Expr::IntLit(n) if n > i64::MAX as u64 => {
                    return Err(LowerError::unsupported(
                        format!("negative literal -{n}"),
                        expr.span,
                    ));
                }
                _ => {
                    self.write("-");
                    self.emit(operand)?;
                }
            },
            Expr::UnaryOp { op, operand } => match tables::unary_op(*op) {
                OpLowering::Native(sym) => {
                    self.write(sym);
                    self.emit(operand)?;
                }
                OpLowering::Function(name) => self.emit_call(name, [&**operand])?,
            },

            Expr::BinOp { op, lhs, rhs } => match tables::binary_op(*op) {
                OpLowering::Native(sym) => {
                    self.write("(");
                    self.emit(lhs)?;
                    let _ = write!(self.out, " {sym} ");
                    self.emit(rhs)?;
                    self.write(")");
                }
                OpLowering::Function(name) => self.emit_call(name, [&**lhs, &**rhs])?,
            },

            Expr::Ternary { condition, then_expr, else_expr } => self.emit_call(
                tables::TERNARY_FUNCTION,
                [&**condition, &**then_expr, &**else_expr],
            )?,

            Expr::Attr { object, name } => {
                let mapped = match object.node {
                    Expr::Special(SpecialVar::Stream) => tables::stream_attribute(&name.node)
                        .or_else(|| tables::value_attribute(&name.node)),
                    _ => tables::value_attribute(&name.node),
                };
                match mapped {
                    Some(func) => self.emit_call(func, [&**object])?,
                    None => {
                        self.emit(object)?;
                        self.write(".");
                        self.write(&name.node);
                    }
                }
            }

            Expr::Call { callee, args } => match &callee.node {
                Expr::Attr { object, name } => {
                    let method = &name.node;
                    let func = match object.node {
                        Expr::Special(SpecialVar::Stream) => {
                            tables::stream_method(method).or_else(|| tables::function(method))
                        }
                        _ => tables::function(method),
                    };
                    let func = func.unwrap_or(method.as_str());
                    self.emit_call(func, std::iter::once(&**object).chain(args.iter()))?;
                }
                Expr::Ident(name) => {
                    let func = tables::function(name).unwrap_or(name.as_str());
                    self.emit_call(func, args.iter())?;
                }
                _ => return Err(LowerError::unsupported("call of a non-callable expression", callee.span)),
            },

            Expr::Index { object, index } => {
                self.emit_call(tables::INDEX_FUNCTION, [&**object, &**index])?
            }

            Expr::ArrayLit { elements } => {
                self.write("[");
                self.emit_list(elements.iter())?;
                self.write("]");
            }

            Expr::Cast { operand, ty } => match tables::cast_function(&ty.node) {
                Some(func) => self.emit_call(func, [&**operand])?,
                None => {
                    return Err(LowerError::UnsupportedCast { ty: ty.node.clone(), span: ty.span });
                }
            },

            Expr::SizeOf { operand } => {
                let type_name = match &operand.node {
                    Expr::Ident(name) | Expr::StringLit(name) => name.clone(),
                    // Best effort: the lowered operand text stands in for a type name.
                    _ => {
                        let mark = self.out.len();
                        self.emit(operand)?;
                        self.out.split_off(mark)
                    }
                };
                self.write(tables::SIZEOF_TYPE_FUNCTION);
                self.write("(");
                write_quoted(&mut self.out, &type_name);
                self.write(")");
            }

            Expr::AlignOf { .. } => return Err(LowerError::unsupported("alignof", expr.span)),
        }
        Ok(())
    }

    fn emit_int(&mut self, n: u64) {
        // Literals past i64::MAX only fit the target's unsigned type.
        if n > i64::MAX as u64 {
            let _ = write!(self.out, "{n}u");
        } else {
            let _ = write!(self.out, "{n}");
        }
    }

    fn emit_call<'a>(
        &mut self,
        name: &str,
        args: impl IntoIterator<Item = &'a Spanned<Expr>>,
    ) -> Result<(), LowerError> {
        self.write(name);
        self.write("(");
        self.emit_list(args)?;
        self.write(")");
        Ok(())
    }

    fn emit_list<'a>(
        &mut self,
        items: impl IntoIterator<Item = &'a Spanned<Expr>>,
    ) -> Result<(), LowerError> {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit(item)?;
        }
        Ok(())
    }
}

/// Lower `expr` to target source.
pub fn transform(expr: &Spanned<Expr>) -> Result<String, LowerError> {
    Transformer::new().transform(expr)
}

/// Double-quoted target string literal. Control characters use `\uXXXX`.
fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
