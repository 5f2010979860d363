//! Packaging of rendered units into on-disk layouts.
//!
//! A [`PackagingStrategy`] turns the ordered class and service blocks into
//! relative files; [`write_package`] puts them under an output directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{GeneratorConfig, Layout};
use crate::error::WsdlError;
use crate::symbol::{snake_case, unique_identifier};

const BANNER: &str = "// Generated by wsdl2rs. Do not edit manually.";
const INNER_ALLOWS: &str = "#![allow(unused_imports, non_snake_case, clippy::redundant_static_lifetimes)]";
const PRELUDE: &[&str] = &[
    "use serde::{Deserialize, Serialize};",
    "use wsdl2rs::runtime::{CallError, IntoArgument, Transport, Value};",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Class,
    Service,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One rendered source block keyed by its validated name.
pub struct GeneratedUnit {
    pub name: String,
    pub kind: UnitKind,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Everything one generation run renders.
pub struct GeneratedOutput {
    /// Class blocks in dependency order.
    pub classes: Vec<GeneratedUnit>,
    pub services: Vec<GeneratedUnit>,
}

impl GeneratedOutput {
    pub fn units(&self) -> impl Iterator<Item = &GeneratedUnit> {
        self.classes.iter().chain(self.services.iter())
    }

    pub fn class(&self, name: &str) -> Option<&GeneratedUnit> {
        self.classes.iter().find(|unit| unit.name == name)
    }

    pub fn service(&self, name: &str) -> Option<&GeneratedUnit> {
        self.services.iter().find(|unit| unit.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A file produced by a packaging strategy, relative to the output directory.
pub struct PackagedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Layout policy for generated units.
pub trait PackagingStrategy {
    fn package(&self, output: &GeneratedOutput, config: &GeneratorConfig) -> Vec<PackagedFile>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Every unit as its own file next to a `mod.rs`.
pub struct CustomLayout;

#[derive(Debug, Clone, Copy, Default)]
/// Classes under `types/`, services at the top level.
pub struct ConventionalLayout;

#[derive(Debug, Clone, Copy, Default)]
/// All units in one file.
pub struct SingleFileLayout;

/// Strategy implementing `layout`.
pub fn strategy_for(layout: Layout) -> &'static dyn PackagingStrategy {
    match layout {
        Layout::Custom => &CustomLayout,
        Layout::Conventional => &ConventionalLayout,
        Layout::Single => &SingleFileLayout,
    }
}

impl PackagingStrategy for CustomLayout {
    fn package(&self, output: &GeneratedOutput, config: &GeneratorConfig) -> Vec<PackagedFile> {
        let root = namespace_root(config);
        let units: Vec<&GeneratedUnit> = output.units().collect();
        package_directory(&root, &units, "use super::*;", config)
    }
}

impl PackagingStrategy for ConventionalLayout {
    fn package(&self, output: &GeneratedOutput, config: &GeneratorConfig) -> Vec<PackagedFile> {
        let root = namespace_root(config);
        let classes: Vec<&GeneratedUnit> = output.classes.iter().collect();
        let services: Vec<&GeneratedUnit> = output.services.iter().collect();

        let mut files = package_directory(&root.join("types"), &classes, "use super::*;", config);
        let service_files =
            package_directory(&root, &services, "use super::types::*;", config);

        // The top-level mod.rs also declares the types module.
        for mut file in service_files {
            if file.path == root.join("mod.rs") {
                file.contents = file
                    .contents
                    .replacen(BANNER, &format!("{BANNER}\n\npub mod types;"), 1);
            }
            files.push(file);
        }
        if services.is_empty() {
            files.push(PackagedFile {
                path: root.join("mod.rs"),
                contents: format!("{BANNER}\n\npub mod types;\n"),
            });
        }
        files
    }
}

impl PackagingStrategy for SingleFileLayout {
    fn package(&self, output: &GeneratedOutput, config: &GeneratorConfig) -> Vec<PackagedFile> {
        // The file itself is the namespace module, so units are not wrapped.
        let mut contents = unit_header(config);
        for unit in output.units() {
            contents.push('\n');
            contents.push_str(&unit.source);
        }

        let file_name = match &config.namespace {
            Some(namespace) => format!("{namespace}.rs"),
            None => "generated.rs".to_string(),
        };

        vec![PackagedFile {
            path: PathBuf::from(file_name),
            contents,
        }]
    }
}

fn namespace_root(config: &GeneratorConfig) -> PathBuf {
    config
        .namespace
        .as_deref()
        .map_or_else(PathBuf::new, PathBuf::from)
}

/// One file per unit plus a `mod.rs` re-exporting every unit.
fn package_directory(
    dir: &Path,
    units: &[&GeneratedUnit],
    sibling_import: &str,
    config: &GeneratorConfig,
) -> Vec<PackagedFile> {
    let mut used = HashSet::new();
    let mut files = Vec::with_capacity(units.len() + 1);
    let mut module_decls = String::new();

    for unit in units {
        let stem = unique_identifier(&snake_case(&unit.name), &mut used);
        module_decls.push_str(&format!("mod {stem};\npub use self::{stem}::*;\n"));

        let mut contents = unit_header(config);
        contents.push_str(sibling_import);
        contents.push_str("\n\n");
        contents.push_str(&unit.source);

        files.push(PackagedFile {
            path: dir.join(format!("{stem}.rs")),
            contents,
        });
    }

    if !units.is_empty() {
        files.push(PackagedFile {
            path: dir.join("mod.rs"),
            contents: format!("{BANNER}\n\n{module_decls}"),
        });
    }
    files
}

fn unit_header(config: &GeneratorConfig) -> String {
    let mut out = String::new();
    out.push_str(BANNER);
    out.push('\n');
    if let Some(namespace) = &config.namespace {
        out.push_str(&format!("// Module: {namespace}\n"));
    }
    out.push_str(INNER_ALLOWS);
    out.push_str("\n\n");
    for line in PRELUDE {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Writes packaged files under `out_dir`, returning the written paths.
///
/// Fails with [`WsdlError::EmptyOutput`] when there is nothing to write.
pub fn write_package(files: &[PackagedFile], out_dir: &Path) -> Result<Vec<PathBuf>, WsdlError> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let dest = out_dir.join(&file.path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, &file.contents)?;
        debug!(path = %dest.display(), bytes = file.contents.len(), "wrote generated file");
        written.push(dest);
    }

    if written.is_empty() {
        return Err(WsdlError::EmptyOutput(format!(
            "no files were written to '{}'",
            out_dir.display()
        )));
    }

    info!(files = written.len(), out_dir = %out_dir.display(), "packaged generated code");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{
        strategy_for, write_package, GeneratedOutput, GeneratedUnit, PackagedFile, UnitKind,
    };
    use crate::config::{GeneratorConfig, Layout};

    fn output() -> GeneratedOutput {
        GeneratedOutput {
            classes: vec![
                GeneratedUnit {
                    name: "QuoteRequest".to_string(),
                    kind: UnitKind::Class,
                    source: "pub struct QuoteRequest {}\n".to_string(),
                },
                GeneratedUnit {
                    name: "Quote_Request".to_string(),
                    kind: UnitKind::Class,
                    source: "pub struct Quote_Request {}\n".to_string(),
                },
            ],
            services: vec![GeneratedUnit {
                name: "StockQuote".to_string(),
                kind: UnitKind::Service,
                source: "pub struct StockQuote<T> {\n    transport: T,\n}\n".to_string(),
            }],
        }
    }

    fn paths(files: &[PackagedFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.path.display().to_string().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn custom_layout_is_flat_with_unique_stems() {
        let files = strategy_for(Layout::Custom).package(&output(), &GeneratorConfig::default());
        assert_eq!(
            paths(&files),
            ["quote_request.rs", "quote_request2.rs", "stock_quote.rs", "mod.rs"]
        );
        let module = &files[3].contents;
        assert!(module.contains("mod quote_request2;\npub use self::quote_request2::*;"));
        assert!(files[0].contents.contains("use super::*;"));
    }

    #[test]
    fn conventional_layout_nests_types_under_namespace() {
        let config = GeneratorConfig {
            namespace: Some("stock".to_string()),
            ..GeneratorConfig::default()
        };
        let files = strategy_for(Layout::Conventional).package(&output(), &config);
        assert_eq!(
            paths(&files),
            [
                "stock/types/quote_request.rs",
                "stock/types/quote_request2.rs",
                "stock/types/mod.rs",
                "stock/stock_quote.rs",
                "stock/mod.rs",
            ]
        );
        assert!(files[3].contents.contains("use super::types::*;"));
        assert!(files[3].contents.contains("// Module: stock"));
        assert!(files[4].contents.contains("pub mod types;\nmod stock_quote;"));
    }

    #[test]
    fn single_layout_file_is_the_namespace_module() {
        let config = GeneratorConfig {
            namespace: Some("stock".to_string()),
            indent: "  ".to_string(),
            ..GeneratorConfig::default()
        };
        let files = strategy_for(Layout::Single).package(&output(), &config);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("stock.rs"));
        let contents = &files[0].contents;
        assert!(contents.starts_with(
            "// Generated by wsdl2rs. Do not edit manually.\n// Module: stock\n#![allow("
        ));
        assert!(!contents.contains("pub mod stock"));
        assert!(contents.contains("\npub struct StockQuote<T> {\n    transport: T,\n}\n"));
    }

    #[test]
    fn single_layout_without_namespace_is_unwrapped() {
        let files =
            strategy_for(Layout::Single).package(&output(), &GeneratorConfig::default());
        assert_eq!(files[0].path, PathBuf::from("generated.rs"));
        assert!(!files[0].contents.contains("pub mod"));
        let class_pos = files[0].contents.find("pub struct QuoteRequest").unwrap();
        let service_pos = files[0].contents.find("pub struct StockQuote").unwrap();
        assert!(class_pos < service_pos);
    }

    #[test]
    fn writing_nothing_is_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_package(&[], dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("empty output"));
    }
}
