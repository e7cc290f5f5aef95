//! Seam to the host expression engine that compiles and runs lowered source.
//!
//! This crate never implements an engine. Embedders wrap theirs in [`Engine`]
//! and hand it to [`ExpressionCache`](crate::cache::ExpressionCache).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a free variable, as the host engine's checker sees it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    #[default]
    Dyn,
    Int,
    Uint,
    Double,
    Bool,
    String,
    Bytes,
    List,
    Map,
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VarType::Dyn => "dyn",
            VarType::Int => "int",
            VarType::Uint => "uint",
            VarType::Double => "double",
            VarType::Bool => "bool",
            VarType::String => "string",
            VarType::Bytes => "bytes",
            VarType::List => "list",
            VarType::Map => "map",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: VarType,
}

impl VariableDecl {
    pub fn new(name: impl Into<String>, ty: VarType) -> Self {
        Self { name: name.into(), ty }
    }
}

impl fmt::Display for VariableDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// A host engine able to compile lowered source and evaluate the result.
///
/// Implementations must be shareable across threads: the cache calls
/// `compile` from whichever thread misses.
pub trait Engine: Send + Sync {
    type Program: Send + Sync;
    type Value;
    type Error: fmt::Display;

    fn compile(&self, source: &str, decls: &[VariableDecl]) -> Result<Self::Program, Self::Error>;

    fn evaluate(
        &self,
        program: &Self::Program,
        bindings: &HashMap<String, Self::Value>,
    ) -> Result<Self::Value, Self::Error>;
}
