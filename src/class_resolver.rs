//! Dependency ordering of message classes.
//!
//! Classes are validated eagerly, stored in an arena and then released in
//! inheritance order by a bounded worklist: every base class precedes the
//! classes that extend it.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::error::WsdlError;
use crate::symbol::{validate_identifier, SymbolTable};
use crate::tree::ClassNode;
use crate::types::{map_type, SemanticType};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One validated property of a message class.
pub struct PropertyDescriptor {
    pub raw_name: String,
    pub validated_name: String,
    pub semantic_type: SemanticType,
}

impl PropertyDescriptor {
    /// Whether the wire name differs from the field name and needs an alias entry.
    pub fn is_aliased(&self) -> bool {
        self.raw_name != self.validated_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One validated message class.
pub struct ClassDescriptor {
    pub raw_name: String,
    /// Sanitized name, unique within the run.
    pub validated_name: String,
    /// Validated name of the base class, if any.
    pub base_name: Option<String>,
    pub properties: Vec<PropertyDescriptor>,
}

impl ClassDescriptor {
    pub fn has_aliases(&self) -> bool {
        self.properties.iter().any(PropertyDescriptor::is_aliased)
    }

    /// `(wire name, field name)` pairs for every aliased property.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .filter(|p| p.is_aliased())
            .map(|p| (p.raw_name.as_str(), p.validated_name.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Run-scoped table from raw schema type names to validated class names.
///
/// Populated once by [`resolve`]; read-only afterwards.
pub struct ClassMap {
    entries: BTreeMap<String, String>,
    validated: HashSet<String>,
}

impl ClassMap {
    fn insert(&mut self, raw: &str, validated: &str) {
        self.entries.insert(raw.to_string(), validated.to_string());
        self.validated.insert(validated.to_string());
    }

    /// Validated class name for a raw schema type name.
    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries.get(raw).map(String::as_str)
    }

    /// Whether a validated name belongs to a generated class.
    pub fn contains_class(&self, validated: &str) -> bool {
        self.validated.contains(validated)
    }

    /// `(raw, validated)` pairs ordered by raw name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Output of [`resolve`].
pub struct ResolvedClasses {
    /// Descriptors in dependency order.
    pub classes: Vec<ClassDescriptor>,
    pub class_map: ClassMap,
}

/// Validates every class and orders them so that bases come first.
///
/// Class names are registered in `symbols`; a collision there is
/// [`WsdlError::DuplicateSymbol`]. A pass over the pending classes that makes
/// no progress fails with [`WsdlError::UnresolvedDependency`] naming every
/// class still pending.
pub fn resolve(
    nodes: &[ClassNode],
    symbols: &mut SymbolTable,
) -> Result<ResolvedClasses, WsdlError> {
    let mut arena = Vec::with_capacity(nodes.len());
    let mut class_map = ClassMap::default();

    for node in nodes {
        let descriptor = describe_class(node)?;
        symbols.define(
            &descriptor.validated_name,
            format!("class '{}'", descriptor.raw_name),
        )?;
        class_map.insert(&descriptor.raw_name, &descriptor.validated_name);
        arena.push(descriptor);
    }

    let order = order_by_inheritance(&arena)?;

    let mut slots: Vec<Option<ClassDescriptor>> = arena.into_iter().map(Some).collect();
    let classes = order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect();

    Ok(ResolvedClasses { classes, class_map })
}

fn describe_class(node: &ClassNode) -> Result<ClassDescriptor, WsdlError> {
    let validated_name = validate_identifier(&node.name, "class")?;
    let base_name = node
        .base
        .as_deref()
        .map(|base| validate_identifier(base, "base class"))
        .transpose()?;

    let mut used_fields = HashMap::new();
    let mut properties = Vec::with_capacity(node.properties.len());
    for property in &node.properties {
        let validated = validate_identifier(&property.name, "property")?;
        if let Some(previous) = used_fields.insert(validated.clone(), property.name.clone()) {
            return Err(WsdlError::DuplicateSymbol(format!(
                "properties '{previous}' and '{}' of class '{}' both normalize to '{validated}'",
                property.name, node.name
            )));
        }
        properties.push(PropertyDescriptor {
            raw_name: property.name.clone(),
            validated_name: validated,
            semantic_type: map_type(&property.type_name),
        });
    }

    Ok(ClassDescriptor {
        raw_name: node.name.clone(),
        validated_name,
        base_name,
        properties,
    })
}

/// Returns arena indices in inheritance order.
fn order_by_inheritance(arena: &[ClassDescriptor]) -> Result<Vec<usize>, WsdlError> {
    let index_by_name: HashMap<&str, usize> = arena
        .iter()
        .enumerate()
        .map(|(index, class)| (class.validated_name.as_str(), index))
        .collect();
    let base_index: Vec<Option<Option<usize>>> = arena
        .iter()
        .map(|class| match &class.base_name {
            None => Some(None),
            Some(base) => index_by_name.get(base.as_str()).map(|i| Some(*i)),
        })
        .collect();

    let mut resolved = vec![false; arena.len()];
    let mut pending: Vec<usize> = (0..arena.len()).collect();
    let mut order = Vec::with_capacity(arena.len());

    // Each productive pass resolves at least one class, so N classes need at
    // most N passes.
    let max_passes = arena.len();
    for pass in 1..=max_passes {
        if pending.is_empty() {
            break;
        }

        let before = pending.len();
        pending.retain(|&index| {
            let ready = match base_index[index] {
                Some(None) => true,
                Some(Some(base)) => resolved[base],
                None => false,
            };
            if ready {
                resolved[index] = true;
                order.push(index);
            }
            !ready
        });

        debug!(
            pass,
            resolved = before - pending.len(),
            remaining = pending.len(),
            "class resolution pass"
        );

        if pending.len() == before {
            return Err(unresolved_error(arena, &pending));
        }
    }

    if !pending.is_empty() {
        return Err(unresolved_error(arena, &pending));
    }

    Ok(order)
}

fn unresolved_error(arena: &[ClassDescriptor], pending: &[usize]) -> WsdlError {
    WsdlError::UnresolvedDependency {
        classes: pending
            .iter()
            .map(|&index| arena[index].validated_name.clone())
            .collect(),
    }
}
