//! Binds nested configuration structs from environment variables and JSON.
//!
//! Structs opt in with `#[derive(Bind)]`, which lists their fields together
//! with an optional `#[config("...")]` annotation. The annotation renames
//! fields, supplies default literals and controls how values are rendered:
//!
//! ```
//! use std::time::Duration;
//! use confbind::{Bind, MapEnv, bind_from_env_source, render_to_string};
//!
//! #[derive(Bind, Default)]
//! struct Database {
//!     #[config("default:localhost")]
//!     pub host: String,
//!     #[config("env:pass,print:password:[mask]")]
//!     pub secret: String,
//!     pub timeout: Duration,
//! }
//!
//! let env = MapEnv::new()
//!     .with("DB_PASS", "hunter2")
//!     .with("DB_TIMEOUT", "1m30s");
//! let mut db = Database::default();
//! bind_from_env_source("db", &mut db, &env)?;
//!
//! assert_eq!(db.host, "localhost");
//! assert_eq!(db.timeout, Duration::from_secs(90));
//! assert_eq!(
//!     render_to_string("db", &db),
//!     "db.host:     localhost\ndb.password: ******\ndb.timeout:  1m 30s"
//! );
//! # Ok::<(), confbind::BindError>(())
//! ```
//!
//! Binding is synchronous and single-pass. Every error aborts the pass and
//! names the path of the value that failed; fields bound earlier keep their
//! new values.

pub use confbind_macros::Bind;

mod coerce;
mod display;
mod env;
mod error;
mod json;
mod path;
mod tag;
mod traverse;
pub mod value;

pub use coerce::{format_datetime, format_duration, parse_bool, parse_datetime, parse_duration};
pub use display::{
    NamedValue, print, render_to_lines, render_to_list, render_to_string, try_render_to_list,
};
pub use env::{EnvSource, MapEnv, ProcessEnv, bind_from_env, bind_from_env_source};
pub use error::{BindError, BindResult, ParseValueError, TagSyntaxError};
pub use json::{bind_from_file, bind_from_json, bind_from_value};
pub use path::{Path, Segment};
pub use tag::{DisplayMode, Tag};
pub use value::{
    Bind, Field, FieldMeta, FieldMut, Integer, JsonKey, List, Node, NodeMut, Optional, Record,
    Scalar, ScalarMut, Sequence,
};
