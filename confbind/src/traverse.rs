//! Source-independent walk over a destination.
//!
//! The walk dispatches on the [`NodeMut`] shape of each destination and asks
//! a [`Source`] cursor for the matching piece of input. Every step reports
//! whether it assigned anything, which lets absent optional values stay
//! absent when no input reaches them.

use chrono::{DateTime, FixedOffset};
use std::time::Duration;

use crate::coerce::{self, Raw};
use crate::error::{BindError, BindResult, ParseValueError};
use crate::path::Path;
use crate::tag::{Tag, field_tag};
use crate::value::{Bind, FieldMeta, List, NodeMut, Record, ScalarMut, Sequence};

/// A position in some input, able to produce the input for nested values.
pub(crate) trait Source: Sized {
    /// Label used in log events.
    const KIND: &'static str;

    /// Whether the input at this position explicitly resets the destination.
    fn is_null(&self) -> bool;

    /// Checks that the input can populate a record.
    fn expect_record(&self, path: &Path) -> BindResult<()>;

    /// Input for a record field, with the path under which it is bound.
    ///
    /// `None` leaves the field untouched.
    fn field(
        &self,
        path: &Path,
        meta: &'static FieldMeta,
        tag: &Tag<'static>,
    ) -> BindResult<Option<(Path, Self)>>;

    /// Length of a growable sequence; `None` leaves it unconfigured.
    fn list_len(&self, path: &Path) -> BindResult<Option<usize>>;

    /// Length supplied for a fixed-size sequence, when the input has one.
    fn array_len(&self, path: &Path) -> BindResult<Option<usize>>;

    /// Input for the element at `index`.
    fn index(&self, index: usize) -> Self;

    /// Leaf value at this position; `None` leaves the destination untouched.
    fn leaf(&self, path: &Path) -> Option<Raw<'_>>;
}

/// Binds `source` into a caller-supplied destination.
///
/// Shared handles are refused before any input is read.
pub(crate) fn bind_root<S: Source>(path: &Path, dest: &mut dyn Bind, source: &S) -> BindResult<()> {
    if matches!(dest.node_mut(), NodeMut::ReadOnly) {
        return Err(BindError::not_assignable(path));
    }
    bind(path, dest, source).map(|_| ())
}

fn bind<S: Source>(path: &Path, dest: &mut dyn Bind, source: &S) -> BindResult<bool> {
    if source.is_null() {
        reset(dest);
        return Ok(true);
    }
    match dest.node_mut() {
        NodeMut::Optional(slot) => {
            slot.write_through(&mut |inner: &mut dyn Bind| bind(path, inner, source))
        }
        NodeMut::Record(record) => bind_record(path, record, source),
        NodeMut::List(list) => bind_list(path, list, source),
        NodeMut::Array(array) => bind_array(path, array, source),
        NodeMut::Scalar(slot) => {
            let Some(raw) = source.leaf(path) else {
                return Ok(false);
            };
            coerce::assign(path, slot, &raw)?;
            tracing::trace!(path = %path, source = S::KIND, "assigned configuration value");
            Ok(true)
        }
        // Shared handles below the root are read-only views; skip them.
        NodeMut::ReadOnly | NodeMut::Opaque => Ok(false),
    }
}

fn bind_record<S: Source>(path: &Path, record: &mut dyn Record, source: &S) -> BindResult<bool> {
    source.expect_record(path)?;
    let mut touched = false;
    for field in record.fields_mut() {
        let tag = field_tag(field.meta);
        if let Some((child_path, child)) = source.field(path, field.meta, &tag)? {
            touched |= bind(&child_path, field.value, &child)?;
        }
    }
    Ok(touched)
}

fn bind_list<S: Source>(path: &Path, list: &mut dyn List, source: &S) -> BindResult<bool> {
    let Some(len) = source.list_len(path)? else {
        tracing::debug!(path = %path, source = S::KIND, "list length not configured");
        return Ok(false);
    };
    list.try_reset_len(len).map_err(|_| {
        BindError::value_parse(
            path,
            ParseValueError::new("list length", len.to_string(), "list length too large"),
        )
    })?;
    bind_elements(path, list, source)?;
    Ok(true)
}

fn bind_array<S: Source>(path: &Path, array: &mut dyn Sequence, source: &S) -> BindResult<bool> {
    if let Some(actual) = source.array_len(path)?
        && actual != array.len()
    {
        return Err(BindError::length_mismatch(path, array.len(), actual));
    }
    bind_elements(path, array, source)
}

fn bind_elements<S: Source, Q: Sequence + ?Sized>(
    path: &Path,
    sequence: &mut Q,
    source: &S,
) -> BindResult<bool> {
    let mut touched = false;
    for index in 0..sequence.len() {
        let Some(element) = sequence.element_mut(index) else {
            continue;
        };
        touched |= bind(&path.index(index), element, &source.index(index))?;
    }
    Ok(touched)
}

/// Resets `dest` to its zero value.
///
/// Values behind shared handles are left alone.
pub(crate) fn reset(dest: &mut dyn Bind) {
    match dest.node_mut() {
        NodeMut::Record(record) => {
            for field in record.fields_mut() {
                reset(field.value);
            }
        }
        NodeMut::Optional(slot) => slot.clear(),
        NodeMut::List(list) => list.clear(),
        NodeMut::Array(array) => {
            for index in 0..array.len() {
                if let Some(element) = array.element_mut(index) {
                    reset(element);
                }
            }
        }
        NodeMut::Scalar(slot) => match slot {
            ScalarMut::Str(text) => text.clear(),
            ScalarMut::Bool(flag) => *flag = false,
            ScalarMut::Int(number) => {
                number.try_assign(0);
            }
            ScalarMut::DateTime(stamp) => *stamp = DateTime::<FixedOffset>::default(),
            ScalarMut::Duration(elapsed) => *elapsed = Duration::ZERO,
        },
        NodeMut::ReadOnly | NodeMut::Opaque => {}
    }
}
