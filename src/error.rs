//! Error definitions for all `wsdl2rs` generation stages.

use thiserror::Error;

#[derive(Debug, Error)]
/// Top-level error type returned by public APIs.
///
/// Every variant is fatal for the current run: no partial output is produced.
pub enum WsdlError {
    /// A schema name normalized to an empty identifier.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    /// Two schema names normalize to the same identifier, or one collides with a reserved name.
    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
    /// Inheritance cycle or missing base class.
    #[error(
        "unresolved dependency: could not resolve base classes for: {}",
        classes.join(", ")
    )]
    UnresolvedDependency { classes: Vec<String> },
    /// No services in the input, or nothing was written by a packaging strategy.
    #[error("empty output: {0}")]
    EmptyOutput(String),
    /// Node tree could not be read or deserialized.
    #[error("input error: {0}")]
    InputError(String),
    /// Generator configuration rejected.
    #[error("config error: {0}")]
    ConfigError(String),
    /// Filesystem I/O error from packaging or callers that propagate I/O.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
