pub mod class_emitter;
pub mod class_resolver;
pub mod config;
pub mod error;
pub mod operations;
pub mod package;
mod render;
pub mod runtime;
pub mod service_emitter;
pub mod signature;
pub mod symbol;
pub mod tree;
pub mod types;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use class_resolver::{resolve, ClassMap, ResolvedClasses};
pub use class_emitter::emit_class;
pub use config::{GeneratorConfig, Layout};
pub use error::WsdlError;
use operations::{describe_service, ServiceDescriptor};
pub use package::{
    strategy_for, write_package, GeneratedOutput, GeneratedUnit, PackagedFile,
    PackagingStrategy, UnitKind,
};
pub use service_emitter::emit_service;
use symbol::SymbolTable;
pub use tree::SchemaTree;
use types::SemanticType;

/// Validated view of a schema tree, before any code is rendered.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Classes in inheritance order, with the raw-to-validated class map.
    pub classes: ResolvedClasses,
    pub services: Vec<ServiceDescriptor>,
}

/// Runs every validation stage over `tree`.
///
/// Class and service names share one symbol table seeded with the Rust
/// keywords and the names generated code imports.
pub fn analyze(tree: &SchemaTree) -> Result<Analysis, WsdlError> {
    let mut symbols = SymbolTable::with_reserved();
    let classes = resolve(&tree.classes, &mut symbols)?;
    debug!(classes = classes.classes.len(), "resolved class hierarchy");

    if tree.services.is_empty() {
        return Err(WsdlError::EmptyOutput(
            "input defines no services".to_string(),
        ));
    }

    let services = tree
        .services
        .iter()
        .map(|service| describe_service(service, &mut symbols))
        .collect::<Result<Vec<_>, _>>()?;

    warn_unknown_class_refs(&classes, &services);

    Ok(Analysis { classes, services })
}

/// Validates `tree` and renders every class and service.
///
/// Nothing is rendered unless every validation stage succeeds.
pub fn generate(tree: &SchemaTree, config: &GeneratorConfig) -> Result<GeneratedOutput, WsdlError> {
    config.validate()?;
    let analysis = analyze(tree)?;
    let class_map = &analysis.classes.class_map;

    let classes = analysis
        .classes
        .classes
        .iter()
        .map(|class| GeneratedUnit {
            name: class.validated_name.clone(),
            kind: UnitKind::Class,
            source: emit_class(class, &analysis.classes.classes, class_map, &config.indent),
        })
        .collect::<Vec<_>>();

    let services = analysis
        .services
        .iter()
        .map(|service| GeneratedUnit {
            name: service.validated_name.clone(),
            kind: UnitKind::Service,
            source: emit_service(service, class_map, config),
        })
        .collect::<Vec<_>>();

    info!(
        classes = classes.len(),
        services = services.len(),
        "generated code"
    );
    Ok(GeneratedOutput { classes, services })
}

pub fn generate_from_str(
    input: &str,
    config: &GeneratorConfig,
) -> Result<GeneratedOutput, WsdlError> {
    let tree = SchemaTree::from_json_str(input)?;
    generate(&tree, config)
}

pub fn generate_from_path(
    path: impl AsRef<Path>,
    config: &GeneratorConfig,
) -> Result<GeneratedOutput, WsdlError> {
    let tree = SchemaTree::from_path(path)?;
    generate(&tree, config)
}

/// Generates code for `tree` and writes it under `out_dir` using the
/// configured layout. Returns the written paths.
pub fn generate_to_dir(
    tree: &SchemaTree,
    config: &GeneratorConfig,
    out_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, WsdlError> {
    let output = generate(tree, config)?;
    let files = strategy_for(config.layout).package(&output, config);
    write_package(&files, out_dir.as_ref())
}

fn innermost_class(semantic: &SemanticType) -> Option<&str> {
    match semantic {
        SemanticType::Primitive(_) => None,
        SemanticType::Class(name) => Some(name),
        SemanticType::Array(element) => innermost_class(element),
    }
}

fn warn_unknown_class_refs(classes: &ResolvedClasses, services: &[ServiceDescriptor]) {
    let class_map: &ClassMap = &classes.class_map;
    let check = |owner: &str, semantic: &SemanticType| {
        if let Some(name) = innermost_class(semantic) {
            if !class_map.contains_class(name) {
                warn!(
                    owner = %owner,
                    class = %name,
                    "reference to unknown class; falling back to Value"
                );
            }
        }
    };

    for class in &classes.classes {
        for property in &class.properties {
            check(class.validated_name.as_str(), &property.semantic_type);
        }
    }
    for service in services {
        for set in service.groups.iter() {
            for variant in set.variants() {
                for param in &variant.parameters {
                    check(service.validated_name.as_str(), &param.semantic_type);
                }
                if let Some(returns) = &variant.return_type {
                    check(service.validated_name.as_str(), returns);
                }
            }
        }
    }
}
