//! Symbol normalization and the run-scoped symbol table.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::WsdlError;

pub(crate) const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use", "where",
    "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Names brought into scope by the prelude of every generated unit.
const PRELUDE_NAMES: &[&str] = &[
    "Value",
    "Transport",
    "CallError",
    "IntoArgument",
    "Serialize",
    "Deserialize",
    "Option",
    "Some",
    "None",
    "Vec",
    "String",
    "Result",
    "Ok",
    "Err",
    "Box",
    // Generic transport parameter of generated services.
    "T",
    // Crate roots named by paths in generated code.
    "std",
    "core",
    "serde",
    "serde_json",
    "wsdl2rs",
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["self", "Self", "crate", "super"];

/// Converts a raw schema name into an identifier.
///
/// Leading characters that cannot start an identifier are dropped, then every
/// remaining character outside `[A-Za-z0-9_]` is removed. The result may be
/// empty; see [`validate_identifier`].
pub fn normalize(name: &str) -> String {
    let stripped = leading_invalid_regex().replace(name, "");
    invalid_char_regex().replace_all(&stripped, "").into_owned()
}

/// Normalizes `raw` and rejects names that normalize to nothing or to the
/// wildcard `_`.
pub fn validate_identifier(raw: &str, kind: &str) -> Result<String, WsdlError> {
    let validated = normalize(raw);
    if validated.is_empty() {
        return Err(WsdlError::InvalidIdentifier(format!(
            "{kind} name '{raw}' contains no identifier characters"
        )));
    }
    if validated == "_" {
        return Err(WsdlError::InvalidIdentifier(format!(
            "{kind} name '{raw}' normalizes to the wildcard '_'"
        )));
    }
    Ok(validated)
}

fn leading_invalid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^A-Za-z_]+").expect("valid regex"))
}

fn invalid_char_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid regex"))
}

#[derive(Debug, Clone, Default)]
/// Identifiers defined during one generation run.
///
/// Each run owns its table, so concurrent runs and tests never observe each
/// other's definitions.
pub struct SymbolTable {
    defined: HashMap<String, String>,
}

impl SymbolTable {
    /// Creates an empty table (intra-run uniqueness only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table pre-seeded with Rust keywords and prelude names visible
    /// to generated code.
    pub fn with_reserved() -> Self {
        let mut table = Self::new();
        for name in RUST_KEYWORDS {
            table
                .defined
                .insert((*name).to_string(), "a Rust keyword".to_string());
        }
        for name in PRELUDE_NAMES {
            table
                .defined
                .insert((*name).to_string(), "a name in the generated prelude".to_string());
        }
        table
    }

    /// Records `validated` as owned by `owner`, failing if it is already taken.
    pub fn define(&mut self, validated: &str, owner: impl Into<String>) -> Result<(), WsdlError> {
        let owner = owner.into();
        if let Some(existing) = self.defined.get(validated) {
            return Err(WsdlError::DuplicateSymbol(format!(
                "{owner} normalizes to '{validated}', already defined by {existing}"
            )));
        }
        self.defined.insert(validated.to_string(), owner);
        Ok(())
    }

    pub fn contains(&self, validated: &str) -> bool {
        self.defined.contains_key(validated)
    }
}

pub(crate) fn is_rust_keyword(text: &str) -> bool {
    RUST_KEYWORDS.iter().any(|kw| kw == &text)
}

/// Renders a validated name as a Rust identifier usable in field or method position.
pub(crate) fn rust_ident(name: &str) -> String {
    if NON_RAW_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else if is_rust_keyword(name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Converts a validated name into a snake_case module/file stem.
pub(crate) fn snake_case(raw: &str) -> String {
    let tokens = identifier_tokens(raw);
    let mut out = if tokens.is_empty() {
        "unit".to_string()
    } else {
        tokens.join("_")
    };

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out = format!("unit_{out}");
    }

    if is_rust_keyword(&out) {
        out.push('_');
    }

    out
}

fn identifier_tokens(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in raw.split(|c: char| !c.is_ascii_alphanumeric()) {
        if chunk.is_empty() {
            continue;
        }
        tokens.extend(split_camel_tokens(chunk));
    }
    tokens
}

fn split_camel_tokens(chunk: &str) -> Vec<String> {
    let chars: Vec<char> = chunk.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    let mut start = 0usize;

    for i in 1..chars.len() {
        let prev = chars[i - 1];
        let curr = chars[i];
        let next = chars.get(i + 1).copied();

        let boundary = (prev.is_ascii_lowercase() && curr.is_ascii_uppercase())
            || (prev.is_ascii_alphabetic() && curr.is_ascii_digit())
            || (prev.is_ascii_digit() && curr.is_ascii_alphabetic())
            || (prev.is_ascii_uppercase()
                && curr.is_ascii_uppercase()
                && next.is_some_and(|n| n.is_ascii_lowercase()));

        if boundary {
            let token: String = chars[start..i].iter().collect();
            tokens.push(token.to_ascii_lowercase());
            start = i;
        }
    }

    let token: String = chars[start..].iter().collect();
    tokens.push(token.to_ascii_lowercase());

    tokens
}

/// Returns `base`, or `base2`, `base3`, .. if already present in `used`.
pub(crate) fn unique_identifier(base: &str, used: &mut HashSet<String>) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }

    let mut idx = 2usize;
    loop {
        let candidate = format!("{base}{idx}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        idx += 1;
    }
}
