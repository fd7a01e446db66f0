//! Binding from environment variables.
//!
//! Every leaf is looked up under the environment form of its path, for
//! example `APP_DB_HOST` for the field `Db.Host` below the prefix `App`. A
//! missing variable falls back to the field's `default:` literal; a field
//! with neither stays untouched.
//!
//! Growable sequences are only bound when their count variable
//! (`<PATH>_NUM`) is set to a non-empty value. Elements are then read from
//! `<PATH>_0`, `<PATH>_1` and so on. Fixed-size sequences read their
//! elements without a count.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::coerce::Raw;
use crate::error::{BindError, BindResult, ParseValueError};
use crate::path::Path;
use crate::tag::Tag;
use crate::traverse::{Source, bind_root};
use crate::value::{Bind, FieldMeta};

/// Key/value lookup standing in for the process environment.
///
/// Closures of type `Fn(&str) -> Option<String>` implement this trait, which
/// makes ad-hoc stores easy to build in tests.
pub trait EnvSource {
    /// Value stored under `key`, if any.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The real process environment. Values that are not valid UTF-8 are
/// treated as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Deterministic in-memory environment.
///
/// # Examples
///
/// ```
/// use confbind::{EnvSource, MapEnv};
///
/// let env: MapEnv = [("APP_PORT", "8080")].into_iter().collect();
/// assert_eq!(env.lookup("APP_PORT").as_deref(), Some("8080"));
/// assert_eq!(env.lookup("APP_HOST"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Builder form of [`MapEnv::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Populates `dest` from the process environment.
///
/// # Examples
///
/// ```no_run
/// use confbind::{Bind, bind_from_env};
///
/// #[derive(Bind, Default)]
/// struct Settings {
///     #[config("default:localhost")]
///     pub host: String,
///     pub port: u16,
/// }
///
/// let mut settings = Settings::default();
/// bind_from_env("app", &mut settings)?; // reads APP_HOST and APP_PORT
/// # Ok::<(), confbind::BindError>(())
/// ```
///
/// # Errors
///
/// See [`bind_from_env_source`].
pub fn bind_from_env(prefix: &str, dest: &mut dyn Bind) -> BindResult<()> {
    bind_from_env_source(prefix, dest, &ProcessEnv)
}

/// Populates `dest` from `env`, using `prefix` as the first key segment.
///
/// An empty prefix binds top-level fields to unprefixed variables. Fields
/// bound before a failure keep their new values.
///
/// # Errors
///
/// Returns [`BindError::NotAssignable`] when `dest` is a shared handle,
/// [`BindError::ValueParse`] when a variable or default cannot be converted
/// into its field's type or a count variable is not a non-negative integer.
pub fn bind_from_env_source(prefix: &str, dest: &mut dyn Bind, env: &dyn EnvSource) -> BindResult<()> {
    tracing::debug!(prefix, "binding configuration from environment");
    let cursor = EnvCursor { env, default: None };
    bind_root(&Path::root(prefix), dest, &cursor)
}

#[derive(Clone, Copy)]
struct EnvCursor<'e> {
    env: &'e dyn EnvSource,
    /// Default literal of the nearest enclosing field.
    default: Option<&'static str>,
}

impl Source for EnvCursor<'_> {
    const KIND: &'static str = "environment";

    fn is_null(&self) -> bool {
        false
    }

    fn expect_record(&self, _path: &Path) -> BindResult<()> {
        Ok(())
    }

    fn field(
        &self,
        path: &Path,
        _meta: &'static FieldMeta,
        tag: &Tag<'static>,
    ) -> BindResult<Option<(Path, Self)>> {
        let child = Self {
            env: self.env,
            default: tag.default,
        };
        Ok(Some((path.field_with_env(tag.field_name, tag.env_name), child)))
    }

    fn list_len(&self, path: &Path) -> BindResult<Option<usize>> {
        let Some(raw) = self.env.lookup(&path.field("Num").env_key()) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<usize>() {
            Ok(len) => Ok(Some(len)),
            Err(_) => Err(BindError::value_parse(
                path,
                ParseValueError::new("list length", raw, "failed to parse list length"),
            )),
        }
    }

    fn array_len(&self, _path: &Path) -> BindResult<Option<usize>> {
        Ok(None)
    }

    fn index(&self, _index: usize) -> Self {
        Self {
            env: self.env,
            default: None,
        }
    }

    fn leaf(&self, path: &Path) -> Option<Raw<'_>> {
        self.env
            .lookup(&path.env_key())
            .map(|value| Raw::Text(Cow::Owned(value)))
            .or_else(|| self.default.map(|value| Raw::Text(Cow::Borrowed(value))))
    }
}
