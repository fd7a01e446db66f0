//! Primary error enums for tag parsing and binding flows.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by every binding entry point.
pub type BindResult<T> = Result<T, BindError>;

/// Errors raised while parsing a field's `#[config("...")]` annotation.
///
/// These describe mistakes in a struct definition rather than in user input,
/// so the traversal treats them as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TagSyntaxError {
    /// The annotation names a directive that does not exist.
    #[error("unknown config directive {directive:?} on field `{field}`")]
    UnknownDirective {
        /// Field carrying the annotation.
        field: String,
        /// Directive keyword as written.
        directive: String,
    },

    /// The same directive keyword appears more than once.
    #[error("config directive {directive:?} specified multiple times on field `{field}`")]
    Repeated {
        /// Field carrying the annotation.
        field: String,
        /// Directive keyword as written.
        directive: String,
    },

    /// A directive received the wrong number of arguments.
    #[error("config directive {directive:?} on field `{field}` {expected}, got {actual}")]
    ArgumentCount {
        /// Field carrying the annotation.
        field: String,
        /// Directive keyword as written.
        directive: &'static str,
        /// Human-readable description of the accepted argument count.
        expected: &'static str,
        /// Number of arguments supplied.
        actual: usize,
    },

    /// The second `print` argument is not a display mode token.
    #[error("invalid print mode {token:?} on field `{field}`")]
    InvalidPrintMode {
        /// Field carrying the annotation.
        field: String,
        /// Offending token.
        token: String,
    },
}

/// A raw token that could not be converted into a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {target} from {raw:?}: {reason}")]
pub struct ParseValueError {
    /// Name of the destination type.
    pub target: &'static str,
    /// Raw token as supplied by the source.
    pub raw: String,
    /// Explanation reported by the parser.
    pub reason: String,
}

/// Errors that abort a binding or rendering pass.
///
/// Every variant raised by the traversal carries the display path of the
/// value that failed, so nested failures remain attributable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    /// The destination handed to an entry point cannot be written.
    #[error("{path}: destination is not assignable")]
    NotAssignable {
        /// Display path of the destination.
        path: String,
    },

    /// The source value has a different shape than the destination.
    #[error("{path}: cannot bind {expected} from {found}")]
    ShapeMismatch {
        /// Display path of the destination.
        path: String,
        /// Shape the destination expects.
        expected: &'static str,
        /// Shape found in the source.
        found: &'static str,
    },

    /// A fixed-size sequence received the wrong number of elements.
    #[error("{path}: expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// Display path of the destination.
        path: String,
        /// Length of the destination sequence.
        expected: usize,
        /// Length of the source sequence.
        actual: usize,
    },

    /// A raw token could not be converted into the destination type.
    #[error("{path}: {source}")]
    ValueParse {
        /// Display path of the destination.
        path: String,
        /// Parser failure naming the token and target type.
        #[source]
        source: ParseValueError,
    },

    /// A recognised feature is not implemented.
    #[error("{path}: {feature} is not supported")]
    Unsupported {
        /// Display path of the value that selected the feature.
        path: String,
        /// Name of the unsupported feature.
        feature: &'static str,
    },

    /// The JSON document could not be parsed.
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration file could not be read.
    #[error("configuration file error in '{path}': {source}")]
    File {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
