//! Path-aware constructors for `BindError`.

use crate::path::Path;

use super::{BindError, ParseValueError};

/// Renders `path` for an error message, naming the root explicitly.
fn location(path: &Path) -> String {
    if path.is_empty() {
        "<root>".to_owned()
    } else {
        path.to_string()
    }
}

impl BindError {
    pub(crate) fn not_assignable(path: &Path) -> Self {
        Self::NotAssignable {
            path: location(path),
        }
    }

    pub(crate) fn shape_mismatch(path: &Path, expected: &'static str, found: &'static str) -> Self {
        Self::ShapeMismatch {
            path: location(path),
            expected,
            found,
        }
    }

    pub(crate) fn length_mismatch(path: &Path, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            path: location(path),
            expected,
            actual,
        }
    }

    pub(crate) fn value_parse(path: &Path, source: ParseValueError) -> Self {
        Self::ValueParse {
            path: location(path),
            source,
        }
    }

    pub(crate) fn unsupported(path: &Path, feature: &'static str) -> Self {
        Self::Unsupported {
            path: location(path),
            feature,
        }
    }

    pub(crate) fn file(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::File {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ParseValueError {
    /// Builds a parse failure for `raw` converted into `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// use confbind::ParseValueError;
    ///
    /// let err = ParseValueError::new("bool", "maybe", "unrecognised boolean token");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "cannot parse bool from \"maybe\": unrecognised boolean token"
    /// );
    /// ```
    #[must_use]
    pub fn new(target: &'static str, raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target,
            raw: raw.into(),
            reason: reason.into(),
        }
    }
}
