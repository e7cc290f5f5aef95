use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostics::ExprError;
use crate::engine::{VarType, VariableDecl};

pub const CONFIG_FILE: &str = "ksexpr.toml";

/// Contents of `ksexpr.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub variables: VariablesConfig,
    pub output: OutputConfig,
}

/// Types declared to the host engine for free variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariablesConfig {
    pub default_type: VarType,
    pub types: BTreeMap<String, VarType>,
}

impl VariablesConfig {
    pub fn type_of(&self, name: &str) -> VarType {
        self.types.get(name).copied().unwrap_or(self.default_type)
    }

    pub fn declare<I, S>(&self, names: I) -> Vec<VariableDecl>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| VariableDecl::new(name.as_ref(), self.type_of(name.as_ref())))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    /// Parse config text; `path` is only used for error reporting.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ExprError> {
        toml::from_str(content).map_err(|e| {
            ExprError::config(format!("{CONFIG_FILE}: invalid config: {e}"), path.to_path_buf())
        })
    }

    pub fn load(path: &Path) -> Result<Self, ExprError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExprError::config(format!("{CONFIG_FILE}: could not read file: {e}"), path.to_path_buf())
        })?;
        Self::parse(&content, path)
    }

    /// Load the nearest `ksexpr.toml` at or above `start_dir`, or defaults if none exists.
    pub fn discover(start_dir: &Path) -> Result<Self, ExprError> {
        match find_config(start_dir) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Walk up from `start_dir`; the search stops at a repository root (`.git`).
fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").exists() {
            return None;
        }
        if !dir.pop() {
            return None;
        }
    }
}
