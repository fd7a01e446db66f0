//! Human-readable rendering of a populated configuration.
//!
//! Rendering walks the same shapes as binding but only reads. Each field's
//! display mode applies to everything beneath it until a nested field sets a
//! mode of its own. Absent optional values produce no output.

use std::io::{self, Write};

use serde::Serialize;

use crate::coerce::{format_datetime, format_duration};
use crate::error::{BindError, BindResult};
use crate::path::Path;
use crate::tag::{DisplayMode, field_tag};
use crate::value::{Bind, Node, Record, Scalar, Sequence};

const MASK: &str = "******";

/// One rendered configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedValue {
    /// Display path of the value, for example `App.Db.Host`.
    pub key: String,
    /// Rendered value.
    pub value: String,
}

/// Renders every visible value below `prefix`.
///
/// # Errors
///
/// Returns [`BindError::Unsupported`] when a field selects the `[sha256]`
/// display mode, or the `[len]` mode on a value without a length.
pub fn try_render_to_list(prefix: &str, source: &dyn Bind) -> BindResult<Vec<NamedValue>> {
    let mut entries = Vec::new();
    collect(&mut entries, &Path::root(prefix), source, DisplayMode::Show)?;
    Ok(entries)
}

/// Renders every visible value below `prefix`.
///
/// # Panics
///
/// Panics when [`try_render_to_list`] reports an unsupported display mode.
/// Display modes are fixed by the struct definition, so this is a
/// programming mistake.
#[must_use]
pub fn render_to_list(prefix: &str, source: &dyn Bind) -> Vec<NamedValue> {
    try_render_to_list(prefix, source)
        .unwrap_or_else(|err| panic!("cannot render configuration: {err}"))
}

/// Renders one `key: value` line per visible value with aligned values.
///
/// # Examples
///
/// ```
/// use confbind::{Bind, render_to_lines};
///
/// #[derive(Bind)]
/// struct Limits {
///     pub name: String,
///     pub connections: u32,
///     #[config("print:[mask]")]
///     pub token: String,
/// }
///
/// let limits = Limits { name: "edge".into(), connections: 8, token: "s3cret".into() };
/// assert_eq!(
///     render_to_lines("Limits", &limits),
///     [
///         "Limits.name:        edge",
///         "Limits.connections: 8",
///         "Limits.token:       ******",
///     ]
/// );
/// ```
///
/// # Panics
///
/// Panics under the same conditions as [`render_to_list`].
#[must_use]
pub fn render_to_lines(prefix: &str, source: &dyn Bind) -> Vec<String> {
    let entries = render_to_list(prefix, source);
    let width = entries
        .iter()
        .map(|entry| entry.key.chars().count())
        .max()
        .unwrap_or_default();
    entries
        .iter()
        .map(|entry| {
            let label = format!("{}:", entry.key);
            format!("{label:<pad$} {}", entry.value, pad = width + 1)
        })
        .collect()
}

/// Joins [`render_to_lines`] with newlines.
///
/// # Panics
///
/// Panics under the same conditions as [`render_to_list`].
#[must_use]
pub fn render_to_string(prefix: &str, source: &dyn Bind) -> String {
    render_to_lines(prefix, source).join("\n")
}

/// Writes [`render_to_string`] and a trailing newline to standard output.
///
/// # Errors
///
/// Returns any error raised while writing to standard output.
///
/// # Panics
///
/// Panics under the same conditions as [`render_to_list`].
pub fn print(prefix: &str, source: &dyn Bind) -> io::Result<()> {
    let rendered = render_to_string(prefix, source);
    let mut out = io::stdout().lock();
    writeln!(out, "{rendered}")
}

fn collect(
    entries: &mut Vec<NamedValue>,
    path: &Path,
    value: &dyn Bind,
    mode: DisplayMode,
) -> BindResult<()> {
    if mode == DisplayMode::Len {
        if let Some(count) = length(path, value)? {
            push(entries, path, count.to_string());
        }
        return Ok(());
    }
    match value.node() {
        Node::Optional(Some(inner)) => collect(entries, path, inner, mode),
        Node::Optional(None) | Node::Opaque => Ok(()),
        Node::Record(record) => collect_record(entries, path, record, mode),
        Node::List(sequence) | Node::Array(sequence) => {
            collect_sequence(entries, path, sequence, mode)
        }
        Node::Scalar(scalar) => collect_scalar(entries, path, scalar, mode),
    }
}

fn collect_record(
    entries: &mut Vec<NamedValue>,
    path: &Path,
    record: &dyn Record,
    inherited: DisplayMode,
) -> BindResult<()> {
    for field in record.fields() {
        let tag = field_tag(field.meta);
        let mode = match tag.display {
            DisplayMode::Suppress => continue,
            DisplayMode::Show => inherited,
            own => own,
        };
        collect(entries, &path.field(tag.display_name), field.value, mode)?;
    }
    Ok(())
}

fn collect_sequence(
    entries: &mut Vec<NamedValue>,
    path: &Path,
    sequence: &dyn Sequence,
    mode: DisplayMode,
) -> BindResult<()> {
    for index in 0..sequence.len() {
        if let Some(element) = sequence.element(index) {
            collect(entries, &path.index(index), element, mode)?;
        }
    }
    Ok(())
}

fn collect_scalar(
    entries: &mut Vec<NamedValue>,
    path: &Path,
    scalar: Scalar<'_>,
    mode: DisplayMode,
) -> BindResult<()> {
    match mode {
        DisplayMode::NonZero | DisplayMode::Mask if scalar.is_zero() => {}
        DisplayMode::Mask => push(entries, path, MASK.to_owned()),
        DisplayMode::Sha256 => return Err(BindError::unsupported(path, "sha256 display mode")),
        _ => push(entries, path, render_scalar(scalar)),
    }
    Ok(())
}

/// Element count for the `[len]` mode; text counts its UTF-8 bytes.
fn length(path: &Path, value: &dyn Bind) -> BindResult<Option<usize>> {
    match value.node() {
        Node::List(sequence) | Node::Array(sequence) => Ok(Some(sequence.len())),
        Node::Scalar(Scalar::Str(text)) => Ok(Some(text.len())),
        Node::Optional(Some(inner)) => length(path, inner),
        Node::Optional(None) => Ok(None),
        _ => Err(BindError::unsupported(path, "length display of a value without a length")),
    }
}

fn render_scalar(scalar: Scalar<'_>) -> String {
    match scalar {
        Scalar::Str(text) => text.to_owned(),
        Scalar::Bool(flag) => flag.to_string(),
        Scalar::Int(number) => number.to_string(),
        Scalar::DateTime(stamp) => format_datetime(stamp),
        Scalar::Duration(elapsed) => format_duration(elapsed),
    }
}

fn push(entries: &mut Vec<NamedValue>, path: &Path, value: String) {
    entries.push(NamedValue {
        key: path.to_string(),
        value,
    });
}
