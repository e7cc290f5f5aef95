//! Memoizing front end to the host engine.
//!
//! Maps an exact source string (its fingerprint) to the compiled program.
//! Hits only take a shard read lock. Misses run the pipeline and the engine
//! compile with no lock held, so misses on different keys proceed in
//! parallel. Two threads missing on the same key may both compile; the
//! pipeline is pure, so the last insert wins and both results are valid.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, trace};

use crate::codegen::Transformer;
use crate::config::VariablesConfig;
use crate::diagnostics::ExprError;
use crate::engine::{Engine, VariableDecl};
use crate::visit::free_variables;

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Successful engine compilations.
    pub compiles: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    compiles: AtomicU64,
}

/// A compiled target program together with what went into it.
#[derive(Debug)]
pub struct Compiled<P> {
    pub program: P,
    pub target_source: String,
    pub decls: Vec<VariableDecl>,
}

pub struct ExpressionCache<E: Engine> {
    engine: E,
    variables: VariablesConfig,
    programs: DashMap<String, Arc<Compiled<E::Program>>>,
    counters: Counters,
}

impl<E: Engine> ExpressionCache<E> {
    pub fn new(engine: E, variables: VariablesConfig) -> Self {
        Self {
            engine,
            variables,
            programs: DashMap::new(),
            counters: Counters::default(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Return the compiled program for `source`, compiling it on first use.
    /// Failures are returned to the caller and never cached.
    pub fn get_or_compile(&self, source: &str) -> Result<Arc<Compiled<E::Program>>, ExprError> {
        // The read guard must be released before the insert below.
        if let Some(hit) = self.programs.get(source).map(|entry| Arc::clone(entry.value())) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            trace!(source, "expression cache hit");
            return Ok(hit);
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        debug!(source, "expression cache miss");

        let compiled = Arc::new(self.compile(source)?);
        self.counters.compiles.fetch_add(1, Ordering::Relaxed);
        self.programs.insert(source.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Compile `source` (through the cache) and evaluate it against `bindings`.
    pub fn evaluate(
        &self,
        source: &str,
        bindings: &HashMap<String, E::Value>,
    ) -> Result<E::Value, ExprError> {
        let compiled = self.get_or_compile(source)?;
        self.engine
            .evaluate(&compiled.program, bindings)
            .map_err(|e| ExprError::engine(e.to_string()))
    }

    fn compile(&self, source: &str) -> Result<Compiled<E::Program>, ExprError> {
        let expr = crate::parse(source)?;
        let target_source = Transformer::new().transform(&expr)?;
        let decls = self.variables.declare(free_variables(&expr));
        debug!(lowered = %target_source, vars = decls.len(), "compiling lowered expression");
        let program = self
            .engine
            .compile(&target_source, &decls)
            .map_err(|e| ExprError::engine(e.to_string()))?;
        Ok(Compiled { program, target_source, decls })
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn clear(&self) {
        self.programs.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            compiles: self.counters.compiles.load(Ordering::Relaxed),
        }
    }
}
