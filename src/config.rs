//! Generator configuration surface.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WsdlError;
use crate::symbol::{is_rust_keyword, validate_identifier};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// On-disk layout used when packaging generated units.
pub enum Layout {
    /// Every unit in one flat directory.
    Custom,
    /// Message classes under `types/`, services at the top level.
    Conventional,
    /// All units concatenated into a single file.
    #[default]
    Single,
}

impl FromStr for Layout {
    type Err = WsdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custom" => Ok(Self::Custom),
            "conventional" => Ok(Self::Conventional),
            "single" => Ok(Self::Single),
            other => Err(WsdlError::ConfigError(format!(
                "unknown layout '{other}'; expected custom, conventional or single"
            ))),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Custom => "custom",
            Self::Conventional => "conventional",
            Self::Single => "single",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Options consumed by the emitters and packaging strategies.
pub struct GeneratorConfig {
    /// Output module name. `None` disables namespacing.
    pub namespace: Option<String>,
    /// Indentation unit for generated source.
    pub indent: String,
    /// Emit explicit typed parameters instead of a single `args` vector.
    pub expand_arguments: bool,
    /// Omit the argument-shape check from generated service methods.
    pub skip_argument_check: bool,
    pub layout: Layout,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            indent: "    ".to_string(),
            expand_arguments: false,
            skip_argument_check: false,
            layout: Layout::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parses a JSON configuration document. Missing keys take their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, WsdlError> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| WsdlError::ConfigError(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WsdlError> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|e| {
            WsdlError::ConfigError(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&input)
    }

    /// Rejects settings the emitters cannot honor.
    pub fn validate(&self) -> Result<(), WsdlError> {
        if self.indent.is_empty() || !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(WsdlError::ConfigError(
                "indent must be a non-empty run of spaces or tabs".to_string(),
            ));
        }

        if let Some(namespace) = &self.namespace {
            let validated = validate_identifier(namespace, "namespace")?;
            if validated != *namespace || is_rust_keyword(namespace) {
                return Err(WsdlError::ConfigError(format!(
                    "namespace '{namespace}' is not a valid module identifier"
                )));
            }
        }

        Ok(())
    }
}
