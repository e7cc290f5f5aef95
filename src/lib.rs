pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod visit;
pub mod pretty;
pub mod codegen;
pub mod engine;
pub mod cache;
pub mod config;

use diagnostics::ExprError;
use parser::ast::Expr;
use span::Spanned;

pub use cache::{CacheStats, Compiled, ExpressionCache};
pub use config::Config;
pub use engine::{Engine, VarType, VariableDecl};
pub use visit::free_variables;

/// Parse a source expression (lex → parse). Any syntax error fails the whole parse.
pub fn parse(source: &str) -> Result<Spanned<Expr>, ExprError> {
    let output = parser::parse(source);
    if !output.errors.is_empty() {
        tracing::debug!(errors = output.errors.len(), "parse failed");
    }
    output.into_result().map_err(ExprError::Syntax)
}

/// Compile a source expression to target-engine source (lex → parse → transform).
pub fn compile_to_target(source: &str) -> Result<String, ExprError> {
    let expr = parse(source)?;
    Ok(codegen::transform(&expr)?)
}
