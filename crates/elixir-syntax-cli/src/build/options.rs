//! Compiler options shared by the `elixirc` and `mix` command lines.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::BuildError;

/// Options forwarded to the Elixir compiler.
///
/// Missing fields in a JSON file take their default, so `{}` is a valid options file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    pub attach_docs: bool,
    pub attach_debug_info: bool,
    pub warnings_as_errors: bool,
    pub ignore_module_conflict: bool,
    /// Delegate to `mix` instead of invoking `elixirc` on individual files.
    pub use_mix: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            attach_docs: true,
            attach_debug_info: true,
            warnings_as_errors: false,
            ignore_module_conflict: false,
            use_mix: false,
        }
    }
}

impl CompilerOptions {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let text = std::fs::read_to_string(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| BuildError::Options {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Compiler flags in the order the compiler expects them.
    pub fn flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if !self.attach_docs {
            flags.push("--no-docs");
        }
        if !self.attach_debug_info {
            flags.push("--no-debug-info");
        }
        if self.warnings_as_errors {
            flags.push("--warnings-as-errors");
        }
        if self.ignore_module_conflict {
            flags.push("--ignore-module-conflict");
        }
        flags
    }
}
