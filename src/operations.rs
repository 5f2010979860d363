//! Grouping of remote operations into overload sets.

use std::collections::HashMap;

use tracing::debug;

use crate::error::WsdlError;
use crate::symbol::{normalize, validate_identifier, SymbolTable};
use crate::tree::{OperationEntry, ServiceNode};
use crate::types::{map_type, SemanticType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub raw_name: String,
    /// Normalized name; may be empty for malformed input.
    pub validated_name: String,
    pub semantic_type: SemanticType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One normalized operation variant.
pub struct OperationNode {
    pub raw_name: String,
    pub validated_name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<SemanticType>,
}

impl OperationNode {
    fn from_entry(entry: &OperationEntry) -> Self {
        Self {
            raw_name: entry.name.clone(),
            validated_name: normalize(&entry.name),
            parameters: entry
                .parameters
                .iter()
                .map(|param| Parameter {
                    raw_name: param.name.clone(),
                    validated_name: normalize(&param.name),
                    semantic_type: map_type(&param.type_name),
                })
                .collect(),
            return_type: entry.returns.as_deref().map(map_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// All variants sharing one validated operation name, in first-seen order.
pub struct OverloadSet {
    name: String,
    variants: Vec<OperationNode>,
    return_types: Vec<SemanticType>,
}

impl OverloadSet {
    fn new(first: OperationNode) -> Self {
        let mut set = Self {
            name: first.validated_name.clone(),
            variants: Vec::new(),
            return_types: Vec::new(),
        };
        set.push(first);
        set
    }

    fn push(&mut self, variant: OperationNode) {
        if let Some(returns) = &variant.return_type {
            if !self.return_types.contains(returns) {
                self.return_types.push(returns.clone());
            }
        }
        self.variants.push(variant);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wire name used when delegating the call: the first variant's raw name.
    pub fn wire_name(&self) -> &str {
        self.variants
            .first()
            .map_or(self.name.as_str(), |v| v.raw_name.as_str())
    }

    pub fn variants(&self) -> &[OperationNode] {
        &self.variants
    }

    /// Union of observed return types, in first-seen order.
    pub fn return_types(&self) -> &[SemanticType] {
        &self.return_types
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Mapping from validated operation name to its overload set, keeping the
/// order in which names were first seen.
pub struct OverloadGroups {
    sets: Vec<OverloadSet>,
    index: HashMap<String, usize>,
}

impl OverloadGroups {
    pub fn get(&self, name: &str) -> Option<&OverloadSet> {
        self.index.get(name).map(|&i| &self.sets[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverloadSet> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Normalizes every operation and appends it to the overload set of its name.
pub fn group(operations: &[OperationEntry]) -> OverloadGroups {
    let mut groups = OverloadGroups::default();
    for entry in operations {
        let node = OperationNode::from_entry(entry);
        let existing = groups.index.get(&node.validated_name).copied();
        match existing {
            Some(i) => groups.sets[i].push(node),
            None => {
                groups
                    .index
                    .insert(node.validated_name.clone(), groups.sets.len());
                groups.sets.push(OverloadSet::new(node));
            }
        }
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One validated service ready for emission.
pub struct ServiceDescriptor {
    pub raw_name: String,
    pub validated_name: String,
    pub location: Option<String>,
    pub groups: OverloadGroups,
}

/// Validates a service and groups its operations.
///
/// The service name is registered in `symbols` alongside the class names, and
/// operation names must normalize to a non-empty identifier.
pub fn describe_service(
    node: &ServiceNode,
    symbols: &mut SymbolTable,
) -> Result<ServiceDescriptor, WsdlError> {
    let validated_name = validate_identifier(&node.name, "service")?;
    symbols.define(&validated_name, format!("service '{}'", node.name))?;

    for operation in &node.operations {
        validate_identifier(&operation.name, "operation")?;
    }

    let groups = group(&node.operations);
    debug!(
        service = %validated_name,
        operations = node.operations.len(),
        groups = groups.len(),
        "grouped service operations"
    );

    Ok(ServiceDescriptor {
        raw_name: node.name.clone(),
        validated_name,
        location: node.location.clone(),
        groups,
    })
}
