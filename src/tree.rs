//! Flattened service-description tree consumed by the generator.
//!
//! The tree is produced upstream from WSDL/XSD documents with all imports
//! inlined. It is read-only input: validated names live in the descriptors
//! built by [`crate::class_resolver`] and [`crate::operations`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WsdlError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Root of the flattened node tree.
pub struct SchemaTree {
    /// Message classes in document order.
    #[serde(default)]
    pub classes: Vec<ClassNode>,
    /// Services in document order.
    #[serde(default)]
    pub services: Vec<ServiceNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// One schema complex type.
pub struct ClassNode {
    /// Raw schema identifier.
    pub name: String,
    /// Raw name of the base type, if the type extends another one.
    #[serde(default, alias = "extends")]
    pub base: Option<String>,
    /// Ordered property entries.
    #[serde(default)]
    pub properties: Vec<PropertyNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// One `(name, raw-type)` property entry.
pub struct PropertyNode {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// One service (port type) with its operations.
pub struct ServiceNode {
    /// Raw service name.
    pub name: String,
    /// Endpoint or document location advertised by the service, if known.
    #[serde(default)]
    pub location: Option<String>,
    /// Operations in document order. Names may repeat (overloads).
    #[serde(default)]
    pub operations: Vec<OperationEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// One remote operation variant.
pub struct OperationEntry {
    /// Raw wire-level operation name.
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterNode>,
    /// Raw return type, at most one per operation.
    #[serde(default)]
    pub returns: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterNode {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl SchemaTree {
    /// Deserializes a node tree from JSON text.
    pub fn from_json_str(input: &str) -> Result<Self, WsdlError> {
        serde_json::from_str(input)
            .map_err(|e| WsdlError::InputError(format!("invalid node tree: {e}")))
    }

    /// Reads and deserializes a node tree from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WsdlError> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|e| {
            WsdlError::InputError(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&input)
    }
}
