//! Typed views over bindable destinations.
//!
//! Binding never inspects types at runtime. Instead every bindable type
//! implements [`Bind`] and hands the traversal one of a small, closed set of
//! shapes:
//!
//! - records ([`Record`]): named fields paired with static metadata;
//! - optional values ([`Optional`]): pointers that may be absent;
//! - sequences ([`Sequence`] and [`List`]): fixed or growable, indexed by
//!   position;
//! - scalars ([`Scalar`] / [`ScalarMut`]): strings, booleans, integers,
//!   timestamps and durations.
//!
//! Anything else reports [`Node::Opaque`] and is skipped.
//! `#[derive(Bind)]` implements [`Bind`] and [`Record`] for structs.

use std::collections::TryReserveError;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};

mod impls;
mod integer;

pub use integer::Integer;

/// A value the binding drivers can read and write.
pub trait Bind {
    /// Read-only view used by the display driver.
    fn node(&self) -> Node<'_>;

    /// Writable view used by the binding drivers.
    fn node_mut(&mut self) -> NodeMut<'_>;
}

/// Read-only shape of a value.
pub enum Node<'a> {
    /// A struct with named fields.
    Record(&'a dyn Record),
    /// An optional value; `None` when absent.
    Optional(Option<&'a dyn Bind>),
    /// A growable sequence.
    List(&'a dyn Sequence),
    /// A fixed-size sequence.
    Array(&'a dyn Sequence),
    /// A leaf value.
    Scalar(Scalar<'a>),
    /// A type the drivers do not understand.
    Opaque,
}

/// Writable shape of a value.
pub enum NodeMut<'a> {
    /// A struct with named fields.
    Record(&'a mut dyn Record),
    /// An optional value that is allocated on first write.
    Optional(&'a mut dyn Optional),
    /// A growable sequence.
    List(&'a mut dyn List),
    /// A fixed-size sequence.
    Array(&'a mut dyn Sequence),
    /// A leaf value.
    Scalar(ScalarMut<'a>),
    /// A readable value behind a shared handle that cannot be written.
    ReadOnly,
    /// A type the drivers do not understand.
    Opaque,
}

/// Read-only leaf value.
#[derive(Debug, Clone, Copy)]
pub enum Scalar<'a> {
    /// UTF-8 text.
    Str(&'a str),
    /// Boolean flag.
    Bool(bool),
    /// Any primitive integer, widened losslessly.
    Int(i128),
    /// Calendar timestamp with its offset.
    DateTime(&'a DateTime<FixedOffset>),
    /// Elapsed time.
    Duration(Duration),
}

/// Writable leaf value.
pub enum ScalarMut<'a> {
    /// UTF-8 text.
    Str(&'a mut String),
    /// Boolean flag.
    Bool(&'a mut bool),
    /// Any primitive integer.
    Int(&'a mut dyn Integer),
    /// Calendar timestamp with its offset.
    DateTime(&'a mut DateTime<FixedOffset>),
    /// Elapsed time.
    Duration(&'a mut Duration),
}

impl Scalar<'_> {
    /// Whether the value equals its type's zero value.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match *self {
            Self::Str(text) => text.is_empty(),
            Self::Bool(flag) => !flag,
            Self::Int(number) => number == 0,
            Self::DateTime(stamp) => stamp.timestamp() == 0 && stamp.timestamp_subsec_nanos() == 0,
            Self::Duration(elapsed) => elapsed.is_zero(),
        }
    }
}

/// Which JSON key feeds a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKey {
    /// Use the field's tag name.
    Inherit,
    /// Use this key instead of the tag name.
    Rename(&'static str),
    /// Never populate the field from JSON.
    Skip,
}

/// Static description of a struct field, emitted by `#[derive(Bind)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// Field identifier as written in the struct.
    pub ident: &'static str,
    /// Raw `#[config("...")]` annotation; empty when absent.
    pub annotation: &'static str,
    /// JSON key override.
    pub json: JsonKey,
}

/// Read-only handle to one struct field.
pub struct Field<'a> {
    /// Static field description.
    pub meta: &'static FieldMeta,
    /// Field value.
    pub value: &'a dyn Bind,
}

/// Writable handle to one struct field.
pub struct FieldMut<'a> {
    /// Static field description.
    pub meta: &'static FieldMeta,
    /// Field value.
    pub value: &'a mut dyn Bind,
}

impl<'a> Field<'a> {
    /// Pairs a value with its metadata.
    #[must_use]
    pub const fn new(meta: &'static FieldMeta, value: &'a dyn Bind) -> Self {
        Self { meta, value }
    }
}

impl<'a> FieldMut<'a> {
    /// Pairs a value with its metadata.
    #[must_use]
    pub const fn new(meta: &'static FieldMeta, value: &'a mut dyn Bind) -> Self {
        Self { meta, value }
    }
}

/// A struct whose fields can be enumerated in declaration order.
///
/// Only the fields returned here are ever read or written. `#[derive(Bind)]`
/// returns the `pub` fields and leaves every other field out.
pub trait Record {
    /// Bindable fields in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Bindable fields in declaration order.
    fn fields_mut(&mut self) -> Vec<FieldMut<'_>>;
}

/// A value that may be absent.
pub trait Optional {
    /// The contained value, if any.
    fn get(&self) -> Option<&dyn Bind>;

    /// Drops the contained value.
    fn clear(&mut self);

    /// Runs `write` against the contained value.
    ///
    /// An absent value is replaced by a default-initialised one for the
    /// duration of `write` and only stored when `write` reports that it
    /// assigned something.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `write`; an absent value stays absent.
    fn write_through(
        &mut self,
        write: &mut dyn FnMut(&mut dyn Bind) -> crate::BindResult<bool>,
    ) -> crate::BindResult<bool>;
}

/// A sequence indexed by position.
pub trait Sequence {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Whether the sequence holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`.
    fn element(&self, index: usize) -> Option<&dyn Bind>;

    /// Element at `index`.
    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Bind>;
}

/// A sequence whose length can change.
pub trait List: Sequence {
    /// Replaces the contents with `len` default-initialised elements.
    ///
    /// # Errors
    ///
    /// Returns the allocation error when room for `len` elements cannot be
    /// reserved. The contents are unchanged in that case.
    fn try_reset_len(&mut self, len: usize) -> Result<(), TryReserveError>;

    /// Removes every element.
    fn clear(&mut self);
}
