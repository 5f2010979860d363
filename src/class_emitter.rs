//! Rust rendering of resolved message classes.

use std::collections::HashSet;

use tracing::debug;

use crate::class_resolver::{ClassDescriptor, ClassMap};
use crate::render::{
    escape_string, is_generated_class, render_pair_table, rust_type, SourceWriter, RUNTIME_PATH,
};
use crate::symbol::{rust_ident, unique_identifier};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Structural view of one generated struct field.
pub struct FieldLayout {
    /// Identifier written in the struct (keyword-escaped).
    pub ident: String,
    /// Wire name used when it differs from the identifier.
    pub rename: Option<String>,
    pub rust_type: String,
    /// Semantic type annotation for the doc line.
    pub annotation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Structural view of one generated message class.
pub struct ClassLayout {
    pub name: String,
    /// `(field ident, base type)` when the class extends another.
    pub base: Option<(String, String)>,
    pub fields: Vec<FieldLayout>,
    /// `(wire name, field name)` pairs for this class and its ancestors,
    /// empty when no property in the chain is renamed.
    pub aliases: Vec<(String, String)>,
}

impl ClassLayout {
    /// Builds the layout of `descriptor`. Only properties declared on the class
    /// itself become fields; inherited ones are reached through the base.
    ///
    /// `classes` holds every resolved class and supplies the base chain, whose
    /// aliases are folded into this class's alias table.
    pub fn from_descriptor(
        descriptor: &ClassDescriptor,
        classes: &[ClassDescriptor],
        class_map: &ClassMap,
    ) -> Self {
        let (fields, mut used) = field_layouts(descriptor, class_map);

        let base = descriptor
            .base_name
            .as_ref()
            .map(|base| (unique_identifier("base", &mut used), base.clone()));

        let mut aliases = field_aliases(&fields);
        aliases.extend(inherited_aliases(descriptor, classes, class_map));

        Self {
            name: descriptor.validated_name.clone(),
            base,
            fields,
            aliases,
        }
    }

    pub fn render(&self, indent: &str) -> String {
        let mut w = SourceWriter::new(indent);
        let name = &self.name;

        match &self.base {
            Some((_, base)) => w.doc(format!("Message type `{name}`, extends [`{base}`].")),
            None => w.doc(format!("Message type `{name}`.")),
        };
        w.line("#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]");
        w.line("#[allow(non_snake_case)]");
        w.open(format!("pub struct {name} {{"));
        if let Some((ident, base)) = &self.base {
            w.line("#[serde(flatten)]");
            w.line(format!("pub {ident}: {base},"));
        }
        for field in &self.fields {
            w.doc(&field.annotation);
            match &field.rename {
                Some(wire) => w.line(format!(
                    "#[serde(default, rename = \"{}\")]",
                    escape_string(wire)
                )),
                None => w.line("#[serde(default)]"),
            };
            w.line(format!("pub {}: {},", field.ident, field.rust_type));
        }
        w.close("}");

        if let Some((ident, base)) = &self.base {
            w.blank();
            w.open(format!("impl std::ops::Deref for {name} {{"));
            w.line(format!("type Target = {base};"));
            w.blank();
            w.open("fn deref(&self) -> &Self::Target {");
            w.line(format!("&self.{ident}"));
            w.close("}");
            w.close("}");
            w.blank();
            w.open(format!("impl std::ops::DerefMut for {name} {{"));
            w.open("fn deref_mut(&mut self) -> &mut Self::Target {");
            w.line(format!("&mut self.{ident}"));
            w.close("}");
            w.close("}");
        }

        if !self.aliases.is_empty() {
            w.blank();
            w.open(format!("impl {name} {{"));
            w.doc("Wire-level property names paired with their field names.");
            render_pair_table(
                &mut w,
                "pub const PROPERTY_ALIASES: &'static [(&'static str, &'static str)]",
                self.aliases.iter().map(|(a, b)| (a.as_str(), b.as_str())),
            );
            w.blank();
            w.doc("Reads a property by its wire name or its field name.");
            w.open("pub fn get_property(&self, name: &str) -> Option<serde_json::Value> {");
            w.line(format!(
                "{RUNTIME_PATH}::get_property(self, Self::PROPERTY_ALIASES, name)"
            ));
            w.close("}");
            w.blank();
            w.doc("Writes a property by its wire name or its field name.");
            w.open("pub fn set_property(&mut self, name: &str, value: serde_json::Value) -> Result<(), CallError> {");
            w.line(format!(
                "{RUNTIME_PATH}::set_property(self, Self::PROPERTY_ALIASES, name, value)"
            ));
            w.close("}");
            w.close("}");
        }

        w.blank();
        w.open(format!("impl IntoArgument for {name} {{"));
        w.open("fn into_argument(self) -> Result<Value, CallError> {");
        w.line("Value::message(&self)");
        w.close("}");
        w.close("}");

        w.finish()
    }
}

fn field_layouts(
    descriptor: &ClassDescriptor,
    class_map: &ClassMap,
) -> (Vec<FieldLayout>, HashSet<String>) {
    let mut fields = Vec::with_capacity(descriptor.properties.len());
    let mut used: HashSet<String> = HashSet::new();

    for property in &descriptor.properties {
        let ident = unique_identifier(&rust_ident(&property.validated_name), &mut used);

        let mut field_type = rust_type(&property.semantic_type, class_map);
        if is_generated_class(&property.semantic_type, class_map) {
            field_type = format!("Box<{field_type}>");
        }

        let unraw = ident.trim_start_matches("r#");
        let rename = (unraw != property.raw_name).then(|| property.raw_name.clone());

        fields.push(FieldLayout {
            ident,
            rename,
            rust_type: format!("Option<{field_type}>"),
            annotation: property.semantic_type.to_string(),
        });
    }

    (fields, used)
}

/// `(wire name, field name)` for every renamed field.
fn field_aliases(fields: &[FieldLayout]) -> Vec<(String, String)> {
    fields
        .iter()
        .filter_map(|field| {
            let wire = field.rename.as_ref()?;
            Some((wire.clone(), field.ident.trim_start_matches("r#").to_string()))
        })
        .collect()
}

/// Aliases of every ancestor, nearest first.
fn inherited_aliases(
    descriptor: &ClassDescriptor,
    classes: &[ClassDescriptor],
    class_map: &ClassMap,
) -> Vec<(String, String)> {
    let mut aliases = Vec::new();
    let mut next = descriptor.base_name.as_deref();
    // Resolved hierarchies are acyclic; the bound only caps the walk.
    for _ in 0..classes.len() {
        let Some(base) = next else { break };
        let Some(ancestor) = classes.iter().find(|c| c.validated_name == base) else {
            break;
        };
        let (fields, _) = field_layouts(ancestor, class_map);
        aliases.extend(field_aliases(&fields));
        next = ancestor.base_name.as_deref();
    }
    aliases
}

/// Renders one resolved class as a Rust source block.
pub fn emit_class(
    descriptor: &ClassDescriptor,
    classes: &[ClassDescriptor],
    class_map: &ClassMap,
    indent: &str,
) -> String {
    let layout = ClassLayout::from_descriptor(descriptor, classes, class_map);
    debug!(
        class = %layout.name,
        fields = layout.fields.len(),
        aliases = layout.aliases.len(),
        "emitting class"
    );
    layout.render(indent)
}
