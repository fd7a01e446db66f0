//! Error types produced while binding and rendering configuration.

mod constructors;
mod types;

pub use types::{BindError, BindResult, ParseValueError, TagSyntaxError};
