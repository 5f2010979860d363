//! Call-signature synthesis for overload sets.
//!
//! Each overload variant yields one [`SignatureEntry`]: its parameter type
//! categories, each wrapped in parentheses, in parameter order. Generated
//! methods accept a call only when the runtime signature of the arguments is
//! exactly one of these entries.

use std::fmt;

use tracing::warn;

use crate::operations::{OperationNode, OverloadSet};
use crate::runtime::{check_arguments, CallError, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Ordered tuple of argument categories for one variant, e.g. `(integer)(string)`.
pub struct SignatureEntry(String);

impl SignatureEntry {
    fn for_variant(variant: &OperationNode) -> Self {
        let rendered = variant
            .parameters
            .iter()
            .map(|param| format!("({})", param.semantic_type.signature_token()))
            .collect();
        Self(rendered)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable form, e.g. `integer, string`.
    pub fn describe(&self) -> String {
        if self.0.is_empty() {
            return "no arguments".to_string();
        }
        self.0
            .trim_start_matches('(')
            .trim_end_matches(')')
            .replace(")(", ", ")
    }
}

impl fmt::Display for SignatureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Dispatch-time argument-shape check for one overload set.
pub struct DispatchCheck {
    operation: String,
    signatures: Vec<SignatureEntry>,
}

impl DispatchCheck {
    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn signatures(&self) -> &[SignatureEntry] {
        &self.signatures
    }

    /// Signature strings in variant order, as embedded in generated code.
    pub fn valid_signatures(&self) -> Vec<&str> {
        self.signatures.iter().map(SignatureEntry::as_str).collect()
    }

    /// Exact-match check of runtime arguments; the first equal entry wins.
    pub fn check(&self, args: &[Value]) -> Result<(), CallError> {
        check_arguments(args, &self.valid_signatures())
    }

    pub fn matches(&self, args: &[Value]) -> bool {
        self.check(args).is_ok()
    }
}

/// Builds the signature entries of `set` and the dispatch check over them.
///
/// Class-typed parameters contribute their validated class name, which is
/// also the name generated message values report at runtime.
///
/// Variants with identical signatures are kept; only the first can ever be
/// told apart at dispatch time.
pub fn synthesize(set: &OverloadSet) -> (Vec<SignatureEntry>, DispatchCheck) {
    let mut entries: Vec<SignatureEntry> = Vec::with_capacity(set.variants().len());
    for variant in set.variants() {
        let entry = SignatureEntry::for_variant(variant);
        if entries.contains(&entry) {
            warn!(
                operation = %set.name(),
                signature = %entry,
                "duplicate overload signature; only the first variant is reachable"
            );
        }
        entries.push(entry);
    }

    let check = DispatchCheck {
        operation: set.name().to_string(),
        signatures: entries.clone(),
    };
    (entries, check)
}
