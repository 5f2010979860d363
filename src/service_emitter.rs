//! Rust rendering of services and their overload-aware call methods.

use std::collections::HashSet;

use tracing::debug;

use crate::class_resolver::ClassMap;
use crate::config::GeneratorConfig;
use crate::operations::{OverloadSet, ServiceDescriptor};
use crate::render::{escape_string, render_pair_table, rust_type, SourceWriter, RUNTIME_PATH};
use crate::signature::{synthesize, SignatureEntry};
use crate::symbol::{rust_ident, unique_identifier};

/// Inherent items every generated service defines besides its operations.
const SERVICE_ITEMS: &[&str] = &["new", "transport", "CLASSMAP", "LOCATION"];

/// Renders one service as a Rust source block.
pub fn emit_service(
    service: &ServiceDescriptor,
    class_map: &ClassMap,
    config: &GeneratorConfig,
) -> String {
    let mut w = SourceWriter::new(&config.indent);
    let name = &service.validated_name;

    w.doc(format!("Client for the `{}` service.", service.raw_name));
    w.open(format!("pub struct {name}<T> {{"));
    w.line("transport: T,");
    w.close("}");
    w.blank();

    w.line("#[allow(non_snake_case)]");
    w.open(format!("impl<T: Transport> {name}<T> {{"));
    w.doc("Wire-level class names mapped to their generated types.");
    render_pair_table(
        &mut w,
        "pub const CLASSMAP: &'static [(&'static str, &'static str)]",
        class_map.iter(),
    );
    if let Some(location) = &service.location {
        w.blank();
        w.doc("Location advertised by the service description.");
        w.line(format!(
            "pub const LOCATION: &'static str = \"{}\";",
            escape_string(location)
        ));
    }
    w.blank();
    w.open("pub fn new(transport: T) -> Self {");
    w.line("Self { transport }");
    w.close("}");
    w.blank();
    w.open("pub fn transport(&self) -> &T {");
    w.line("&self.transport");
    w.close("}");

    let mut used: HashSet<String> = SERVICE_ITEMS.iter().map(|item| item.to_string()).collect();
    for set in service.groups.iter() {
        let method = unique_identifier(&method_ident(set.name()), &mut used);
        w.blank();
        render_operation(&mut w, &method, set, class_map, config);
    }

    w.close("}");
    debug!(
        service = %name,
        operations = service.groups.len(),
        "emitted service"
    );
    w.finish()
}

fn method_ident(validated: &str) -> String {
    if SERVICE_ITEMS.contains(&validated) {
        format!("{validated}_")
    } else {
        rust_ident(validated)
    }
}

fn render_operation(
    w: &mut SourceWriter<'_>,
    method: &str,
    set: &OverloadSet,
    class_map: &ClassMap,
    config: &GeneratorConfig,
) {
    let (entries, check) = synthesize(set);

    w.doc(format!("Calls `{}`.", set.wire_name()));
    w.doc("");
    w.doc("Valid parameter combinations:");
    for entry in &entries {
        w.doc(format!("- {}", describe_entry(entry)));
    }
    if !set.return_types().is_empty() {
        w.doc("");
        let returns: Vec<String> = set
            .return_types()
            .iter()
            .map(|t| format!("`{t}`"))
            .collect();
        w.doc(format!("Returns {}.", returns.join(" or ")));
    }

    if config.expand_arguments {
        let params = expanded_parameters(set, class_map);
        let signature = params
            .iter()
            .map(|(ident, ty)| format!(", {ident}: {ty}"))
            .collect::<String>();
        w.open(format!(
            "pub fn {method}(&self{signature}) -> Result<Value, CallError> {{"
        ));
        if params.is_empty() {
            w.line("let args: Vec<Value> = Vec::new();");
        } else {
            let conversions: Vec<String> = params
                .iter()
                .map(|(ident, _)| format!("{ident}.into_argument()?"))
                .collect();
            w.line(format!("let args = vec![{}];", conversions.join(", ")));
        }
    } else {
        w.open(format!(
            "pub fn {method}(&self, args: Vec<Value>) -> Result<Value, CallError> {{"
        ));
    }

    if !config.skip_argument_check {
        let valid: Vec<String> = check
            .valid_signatures()
            .into_iter()
            .map(|s| format!("\"{}\"", escape_string(s)))
            .collect();
        w.line(format!(
            "{RUNTIME_PATH}::check_arguments(&args, &[{}])?;",
            valid.join(", ")
        ));
    }

    w.open(format!("self.transport.call({RUNTIME_PATH}::Call {{"));
    w.line(format!("operation: \"{}\",", escape_string(set.wire_name())));
    w.line("arguments: args,");
    w.line("classmap: Self::CLASSMAP,");
    w.close("})");
    w.close("}");
}

fn describe_entry(entry: &SignatureEntry) -> String {
    if entry.as_str().is_empty() {
        "no arguments".to_string()
    } else {
        format!("`{entry}`")
    }
}

/// Typed parameters of the first variant, with unique identifiers.
fn expanded_parameters(set: &OverloadSet, class_map: &ClassMap) -> Vec<(String, String)> {
    let Some(first) = set.variants().first() else {
        return Vec::new();
    };

    let mut used = HashSet::new();
    first
        .parameters
        .iter()
        .enumerate()
        .map(|(index, param)| {
            let base = if param.validated_name.is_empty() || param.validated_name == "_" {
                format!("arg{index}")
            } else {
                rust_ident(&param.validated_name)
            };
            let ident = unique_identifier(&base, &mut used);
            (ident, rust_type(&param.semantic_type, class_map))
        })
        .collect()
}
