//! Conversion of raw source tokens into typed leaf values.
//!
//! Environment values always arrive as text. JSON values arrive as text,
//! booleans or numbers. Text is parsed according to the destination type;
//! the native JSON kinds are accepted only by their matching destination.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{BindError, BindResult, ParseValueError};
use crate::path::Path;
use crate::value::{Integer, ScalarMut};

mod datetime;
mod duration;

pub use datetime::{format_datetime, parse_datetime};
pub use duration::{format_duration, parse_duration};

static BOOL_TOKENS: LazyLock<HashMap<&'static str, bool>> = LazyLock::new(|| {
    HashMap::from([
        ("true", true),
        ("yes", true),
        ("on", true),
        ("t", true),
        ("y", true),
        ("1", true),
        ("false", false),
        ("no", false),
        ("off", false),
        ("f", false),
        ("n", false),
        ("0", false),
    ])
});

/// Parses a boolean token, ignoring ASCII case.
///
/// # Examples
///
/// ```
/// use confbind::parse_bool;
///
/// assert_eq!(parse_bool("Yes").ok(), Some(true));
/// assert_eq!(parse_bool("off").ok(), Some(false));
/// assert!(parse_bool("maybe").is_err());
/// ```
///
/// # Errors
///
/// Returns a [`ParseValueError`] naming the token when it is not one of
/// `true`, `yes`, `on`, `t`, `y`, `1`, `false`, `no`, `off`, `f`, `n` or `0`.
pub fn parse_bool(raw: &str) -> Result<bool, ParseValueError> {
    BOOL_TOKENS
        .get(raw.to_ascii_lowercase().as_str())
        .copied()
        .ok_or_else(|| ParseValueError::new("bool", raw, "unrecognised boolean token"))
}

/// A leaf value as produced by a source.
#[derive(Debug, Clone)]
pub(crate) enum Raw<'a> {
    Text(Cow<'a, str>),
    Bool(bool),
    Number(&'a serde_json::Number),
    /// A nested value where a leaf was expected, named by its kind.
    Composite(&'static str),
}

impl Raw<'_> {
    pub(crate) const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Composite(kind) => kind,
        }
    }
}

const fn slot_kind(slot: &ScalarMut<'_>) -> &'static str {
    match slot {
        ScalarMut::Str(_) => "string",
        ScalarMut::Bool(_) => "boolean",
        ScalarMut::Int(_) => "integer",
        ScalarMut::DateTime(_) => "datetime",
        ScalarMut::Duration(_) => "duration",
    }
}

/// Stores `raw` into `slot`, leaving `slot` untouched on failure.
pub(crate) fn assign(path: &Path, slot: ScalarMut<'_>, raw: &Raw<'_>) -> BindResult<()> {
    let expected = slot_kind(&slot);
    let parse_failure = |err: ParseValueError| BindError::value_parse(path, err);
    match (slot, raw) {
        (ScalarMut::Str(out), Raw::Text(text)) => {
            out.clear();
            out.push_str(text);
        }
        (ScalarMut::Bool(out), Raw::Text(text)) => *out = parse_bool(text).map_err(parse_failure)?,
        (ScalarMut::Bool(out), Raw::Bool(flag)) => *out = *flag,
        (ScalarMut::Int(out), Raw::Text(text)) => {
            let target = out.type_name();
            out.parse_assign(text)
                .map_err(|err| parse_failure(ParseValueError::new(target, &**text, err.to_string())))?;
        }
        (ScalarMut::Int(out), Raw::Number(number)) => assign_number(out, number).map_err(parse_failure)?,
        (ScalarMut::DateTime(out), Raw::Text(text)) => *out = parse_datetime(text).map_err(parse_failure)?,
        (ScalarMut::Duration(out), Raw::Text(text)) => *out = parse_duration(text).map_err(parse_failure)?,
        (_, other) => return Err(BindError::shape_mismatch(path, expected, other.kind())),
    }
    Ok(())
}

/// Narrows a JSON number into an integer slot.
///
/// Integral floating-point values such as `42.0` are accepted.
fn assign_number(out: &mut dyn Integer, number: &serde_json::Number) -> Result<(), ParseValueError> {
    let target = out.type_name();
    let widened = number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
        .or_else(|| number.as_f64().and_then(integral));
    let Some(value) = widened else {
        return Err(ParseValueError::new(target, number.to_string(), "not an integer"));
    };
    if out.try_assign(value) {
        Ok(())
    } else {
        Err(ParseValueError::new(target, number.to_string(), "out of range"))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "integral floats saturate and out-of-range values fail narrowing"
)]
fn integral(value: f64) -> Option<i128> {
    (value.fract() == 0.0).then_some(value as i128)
}
