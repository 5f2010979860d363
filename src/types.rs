//! Mapping of schema primitive type names onto semantic categories.

use std::fmt;

use crate::symbol::normalize;

const ARRAY_MARKER: &str = "[]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Primitive categories understood by generated code.
pub enum Primitive {
    Integer,
    Float,
    String,
}

/// Lookup branches in match order. `long` appears in both the integer and the
/// floating-point branch; the integer branch is checked first and wins.
const PRIMITIVE_BRANCHES: &[(Primitive, &[&str])] = &[
    (
        Primitive::Integer,
        &[
            "int",
            "integer",
            "long",
            "byte",
            "short",
            "negativeinteger",
            "nonnegativeinteger",
            "positiveinteger",
            "nonpositiveinteger",
            "unsignedlong",
            "unsignedint",
            "unsignedshort",
            "unsignedbyte",
        ],
    ),
    (Primitive::Float, &["float", "double", "decimal", "long"]),
    (
        Primitive::String,
        &["string", "token", "normalizedstring", "hexbinary"],
    ),
];

impl Primitive {
    /// Category token shared by signature entries and runtime values.
    pub fn token(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
        }
    }

    pub fn rust_type(self) -> &'static str {
        match self {
            Self::Integer => "i64",
            Self::Float => "f64",
            Self::String => "String",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Resolved type of a property, parameter or return value.
pub enum SemanticType {
    Primitive(Primitive),
    /// Reference to a user-defined class, by normalized name.
    Class(String),
    Array(Box<SemanticType>),
}

impl SemanticType {
    /// Token used in signature entries. Arrays collapse to `array` whatever
    /// their element type.
    pub fn signature_token(&self) -> &str {
        match self {
            Self::Primitive(primitive) => primitive.token(),
            Self::Class(name) => name,
            Self::Array(_) => "array",
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => f.write_str(primitive.token()),
            Self::Class(name) => f.write_str(name),
            Self::Array(element) => write!(f, "{element}[]"),
        }
    }
}

/// Maps a raw schema type name to its semantic type.
///
/// A trailing `[]` marks an array of the remaining type. Primitive lookup is
/// case-insensitive; anything unrecognized is a class reference, normalized
/// like any other symbol.
pub fn map_type(raw: &str) -> SemanticType {
    let trimmed = raw.trim();
    if let Some(element) = trimmed.strip_suffix(ARRAY_MARKER) {
        return SemanticType::Array(Box::new(map_type(element)));
    }

    let lowered = trimmed.to_ascii_lowercase();
    for (primitive, aliases) in PRIMITIVE_BRANCHES {
        if aliases.contains(&lowered.as_str()) {
            return SemanticType::Primitive(*primitive);
        }
    }

    SemanticType::Class(normalize(trimmed))
}

#[cfg(test)]
mod tests {
    use super::{map_type, Primitive, SemanticType};

    fn array_of(inner: SemanticType) -> SemanticType {
        SemanticType::Array(Box::new(inner))
    }

    #[test]
    fn maps_primitive_branches() {
        for raw in ["int", "unsignedShort", "nonNegativeInteger", "byte"] {
            assert_eq!(map_type(raw), SemanticType::Primitive(Primitive::Integer));
        }
        for raw in ["float", "double", "decimal"] {
            assert_eq!(map_type(raw), SemanticType::Primitive(Primitive::Float));
        }
        for raw in ["string", "token", "normalizedString", "hexBinary"] {
            assert_eq!(map_type(raw), SemanticType::Primitive(Primitive::String));
        }
    }

    #[test]
    fn long_resolves_to_integer() {
        assert_eq!(map_type("long"), SemanticType::Primitive(Primitive::Integer));
        assert_eq!(map_type("LONG"), SemanticType::Primitive(Primitive::Integer));
    }

    #[test]
    fn array_marker_is_case_insensitive_and_stable() {
        let upper = map_type("INTEGER[]");
        let lower = map_type("integer[]");
        assert_eq!(upper, lower);
        assert_eq!(upper, array_of(SemanticType::Primitive(Primitive::Integer)));
        assert_eq!(upper.signature_token(), "array");
    }

    #[test]
    fn nested_arrays_keep_structure_but_collapse_token() {
        let nested = map_type("Quote-Item[][]");
        assert_eq!(
            nested,
            array_of(array_of(SemanticType::Class("QuoteItem".to_string())))
        );
        assert_eq!(nested.to_string(), "QuoteItem[][]");
        assert_eq!(nested.signature_token(), "array");
    }

    #[test]
    fn unknown_names_become_normalized_class_references() {
        assert_eq!(map_type("dateTime"), SemanticType::Class("dateTime".into()));
        assert_eq!(map_type("My-Type"), SemanticType::Class("MyType".into()));
        assert_eq!(map_type("My-Type").signature_token(), "MyType");
    }
}
