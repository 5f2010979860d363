//! Structured source builder shared by the class and service emitters.

use crate::class_resolver::ClassMap;
use crate::types::SemanticType;

/// Path under which generated code reaches the runtime support module.
pub(crate) const RUNTIME_PATH: &str = "wsdl2rs::runtime";

/// Line-oriented source builder with a configurable indentation unit.
///
/// Rendering never fails: all validation happens before a writer is created.
#[derive(Debug)]
pub(crate) struct SourceWriter<'a> {
    indent_unit: &'a str,
    depth: usize,
    out: String,
}

impl<'a> SourceWriter<'a> {
    pub(crate) fn new(indent_unit: &'a str) -> Self {
        Self {
            indent_unit,
            depth: 0,
            out: String::new(),
        }
    }

    /// Writes one line at the current depth.
    pub(crate) fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(self.indent_unit);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
        self
    }

    pub(crate) fn blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    /// Writes `///` doc lines, one per line of `text`.
    pub(crate) fn doc(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if text.is_empty() {
            return self.line("///");
        }
        for line in text.lines() {
            if line.is_empty() {
                self.line("///");
            } else {
                self.line(format!("/// {line}"));
            }
        }
        self
    }

    /// Writes `header` and indents until the matching [`Self::close`].
    pub(crate) fn open(&mut self, header: impl AsRef<str>) -> &mut Self {
        self.line(header);
        self.depth += 1;
        self
    }

    pub(crate) fn close(&mut self, footer: impl AsRef<str>) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(footer)
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// Rust type for a semantic type. Class references that name no generated
/// class fall back to the runtime `Value`.
pub(crate) fn rust_type(semantic: &SemanticType, class_map: &ClassMap) -> String {
    match semantic {
        SemanticType::Primitive(primitive) => primitive.rust_type().to_string(),
        SemanticType::Class(name) if class_map.contains_class(name) => name.clone(),
        SemanticType::Class(_) => "Value".to_string(),
        SemanticType::Array(element) => format!("Vec<{}>", rust_type(element, class_map)),
    }
}

/// Whether `semantic` names a generated class directly (not through an array).
pub(crate) fn is_generated_class(semantic: &SemanticType, class_map: &ClassMap) -> bool {
    matches!(semantic, SemanticType::Class(name) if class_map.contains_class(name))
}

pub(crate) fn escape_string(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Renders `(raw, validated)` pairs as a static string-pair slice literal.
pub(crate) fn render_pair_table<'p>(
    writer: &mut SourceWriter<'_>,
    header: &str,
    pairs: impl IntoIterator<Item = (&'p str, &'p str)>,
) {
    let pairs: Vec<(&str, &str)> = pairs.into_iter().collect();
    if pairs.is_empty() {
        writer.line(format!("{header} = &[];"));
        return;
    }
    writer.open(format!("{header} = &["));
    for (raw, validated) in pairs {
        writer.line(format!(
            "(\"{}\", \"{}\"),",
            escape_string(raw),
            escape_string(validated)
        ));
    }
    writer.close("];");
}
