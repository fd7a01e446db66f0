//! Binding from JSON documents.
//!
//! Record fields are read from the object key given by, in order of
//! precedence, `#[config(json = "...")]`, the `name:` directive, or the field
//! identifier. Missing keys leave their fields untouched, while `null` resets
//! the destination to its zero value. Sequences take their length from the
//! JSON array; fixed-size sequences require an exact match.

use std::borrow::Cow;

use serde_json::Value;

use crate::coerce::Raw;
use crate::error::{BindError, BindResult};
use crate::path::Path;
use crate::tag::Tag;
use crate::traverse::{Source, bind_root};
use crate::value::{Bind, FieldMeta, JsonKey};

/// Parses `data` as JSON and binds it into `dest`.
///
/// # Examples
///
/// ```
/// use confbind::{Bind, bind_from_json};
///
/// #[derive(Bind, Default)]
/// struct Server {
///     #[config("name:host")]
///     pub host: String,
///     pub ports: Vec<u16>,
/// }
///
/// let mut server = Server::default();
/// bind_from_json(br#"{"host": "example.org", "ports": [80, 443]}"#, &mut server)?;
/// assert_eq!(server.host, "example.org");
/// assert_eq!(server.ports, [80, 443]);
/// # Ok::<(), confbind::BindError>(())
/// ```
///
/// # Errors
///
/// Returns [`BindError::Json`] when `data` is not valid JSON, and any error
/// listed for [`bind_from_value`].
pub fn bind_from_json(data: &[u8], dest: &mut dyn Bind) -> BindResult<()> {
    let value: Value = serde_json::from_slice(data)?;
    bind_from_value(&value, dest)
}

/// Binds an already parsed JSON tree into `dest`.
///
/// # Errors
///
/// Returns [`BindError::NotAssignable`] when `dest` is a shared handle,
/// [`BindError::ShapeMismatch`] when the JSON kind does not fit the
/// destination, [`BindError::LengthMismatch`] when an array has the wrong
/// length for a fixed-size sequence, and [`BindError::ValueParse`] when a
/// value cannot be converted.
pub fn bind_from_value(value: &Value, dest: &mut dyn Bind) -> BindResult<()> {
    tracing::debug!(kind = json_kind(value), "binding configuration from JSON");
    bind_root(&Path::root(""), dest, &JsonCursor(value))
}

/// Reads the JSON file at `path` and binds it into `dest`.
///
/// # Errors
///
/// Returns [`BindError::File`] when the file cannot be read, and any error
/// listed for [`bind_from_json`].
pub fn bind_from_file(path: impl AsRef<std::path::Path>, dest: &mut dyn Bind) -> BindResult<()> {
    let file = path.as_ref();
    tracing::debug!(path = %file.display(), "loading configuration file");
    let data = std::fs::read(file).map_err(|err| BindError::file(file, err))?;
    bind_from_json(&data, dest)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Clone, Copy)]
struct JsonCursor<'v>(&'v Value);

impl JsonCursor<'_> {
    fn items_len(&self, path: &Path) -> BindResult<usize> {
        match self.0 {
            Value::Array(items) => Ok(items.len()),
            other => Err(BindError::shape_mismatch(path, "array", json_kind(other))),
        }
    }
}

impl Source for JsonCursor<'_> {
    const KIND: &'static str = "json";

    fn is_null(&self) -> bool {
        self.0.is_null()
    }

    fn expect_record(&self, path: &Path) -> BindResult<()> {
        if self.0.is_object() {
            Ok(())
        } else {
            Err(BindError::shape_mismatch(path, "object", json_kind(self.0)))
        }
    }

    fn field(
        &self,
        path: &Path,
        meta: &'static FieldMeta,
        tag: &Tag<'static>,
    ) -> BindResult<Option<(Path, Self)>> {
        let key = match meta.json {
            JsonKey::Rename(key) => key,
            JsonKey::Inherit => tag.field_name,
            JsonKey::Skip => {
                if self.0.get(tag.field_name).is_some() {
                    tracing::warn!(
                        path = %path.field(tag.field_name),
                        "ignoring JSON value for a field excluded from JSON input"
                    );
                }
                return Ok(None);
            }
        };
        Ok(self.0.get(key).map(|child| (path.field(key), Self(child))))
    }

    fn list_len(&self, path: &Path) -> BindResult<Option<usize>> {
        self.items_len(path).map(Some)
    }

    fn array_len(&self, path: &Path) -> BindResult<Option<usize>> {
        self.items_len(path).map(Some)
    }

    fn index(&self, index: usize) -> Self {
        // Lengths are checked before elements are visited.
        Self(self.0.get(index).unwrap_or(&Value::Null))
    }

    fn leaf(&self, _path: &Path) -> Option<Raw<'_>> {
        match self.0 {
            Value::Null => None,
            Value::Bool(flag) => Some(Raw::Bool(*flag)),
            Value::Number(number) => Some(Raw::Number(number)),
            Value::String(text) => Some(Raw::Text(Cow::Borrowed(text))),
            other => Some(Raw::Composite(json_kind(other))),
        }
    }
}
