//! Bindgen configuration

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for one bindgen run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindgenConfig {
    /// Lean module (namespace) for the generated declarations, e.g. `SimpleMath`
    pub module_name: String,
    /// Seed of every extern symbol, e.g. `simple_math` gives `lean_simple_math_add`
    pub module_prefix: String,
    /// Header the declarations came from; only used in comments and the `#include`
    pub header_name: String,
}

impl BindgenConfig {
    /// Create and validate a configuration
    pub fn new(
        module_name: impl Into<String>,
        module_prefix: impl Into<String>,
        header_name: impl Into<String>,
    ) -> Result<Self> {
        let config = Self {
            module_name: module_name.into(),
            module_prefix: module_prefix.into(),
            header_name: header_name.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from JSON and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("malformed configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field. Runs before any IR is built.
    pub fn validate(&self) -> Result<()> {
        if !is_lean_module_path(&self.module_name) {
            return Err(Error::config(format!(
                "module_name '{}' is not a Lean identifier path",
                self.module_name
            )));
        }
        if self.module_prefix.is_empty()
            || !self
                .module_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(Error::config(format!(
                "module_prefix '{}' must be a non-empty C identifier fragment",
                self.module_prefix
            )));
        }
        if self.header_name.trim().is_empty()
            || self
                .header_name
                .chars()
                .any(|c| c == '"' || c == '\n' || c == '\r')
            || self.header_name.contains("*/")
        {
            return Err(Error::config(format!(
                "header_name '{}' cannot be used in an #include",
                self.header_name.escape_debug()
            )));
        }
        Ok(())
    }
}

fn is_lean_module_path(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '\'')
                }
                _ => false,
            }
        })
}
