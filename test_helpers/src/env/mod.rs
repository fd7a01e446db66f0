//! Scoped mutation of the process environment.
//!
//! An [`EnvScope`] holds a global re-entrant lock for its whole lifetime, so
//! a test can set variables, run a binding pass that reads them, and be sure
//! no other test changes the environment in between. Dropping the scope
//! restores every touched variable, in reverse order, to the value it had
//! before the scope changed it.
//!
//! # Examples
//!
//! ```
//! use confbind_test_helpers::env;
//!
//! let scope = env::scope([("APP_PORT", "8080")]);
//! assert_eq!(std::env::var("APP_PORT").as_deref(), Ok("8080"));
//! drop(scope);
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Exclusive, self-restoring access to the process environment.
#[must_use = "dropping the scope restores the environment"]
pub struct EnvScope {
    saved: Vec<(String, Option<OsString>)>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl EnvScope {
    /// Acquires the environment lock without changing anything.
    pub fn new() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENV_MUTEX.lock(),
        }
    }

    /// Sets `key` to `value` until the scope is dropped.
    pub fn set(&mut self, name: impl Into<String>, value: impl AsRef<OsStr>) {
        let key = name.into();
        self.remember(&key);
        // SAFETY: `ENV_MUTEX` is held for the lifetime of `self`.
        unsafe { env::set_var(&key, value) };
    }

    /// Removes `key` until the scope is dropped.
    pub fn remove(&mut self, name: impl Into<String>) {
        let key = name.into();
        self.remember(&key);
        // SAFETY: `ENV_MUTEX` is held for the lifetime of `self`.
        unsafe { env::remove_var(&key) };
    }

    fn remember(&mut self, key: &str) {
        self.saved.push((key.to_owned(), env::var_os(key)));
    }
}

impl Default for EnvScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        while let Some((key, original)) = self.saved.pop() {
            // SAFETY: `ENV_MUTEX` is still held; `_lock` drops after this body.
            match original {
                Some(value) => unsafe { env::set_var(&key, value) },
                None => unsafe { env::remove_var(&key) },
            }
        }
    }
}

impl fmt::Debug for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvScope")
            .field("touched", &self.saved.iter().map(|(key, _)| key).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Sets every pair in `vars` and returns the scope that restores them.
pub fn scope<I, K, V>(vars: I) -> EnvScope
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: AsRef<OsStr>,
{
    let mut out = EnvScope::new();
    for (key, value) in vars {
        out.set(key, value);
    }
    out
}

/// Runs `f` with `vars` set, restoring the environment afterwards.
///
/// # Examples
///
/// ```
/// use confbind_test_helpers::env;
///
/// let seen = env::with_vars([("HELPER_DEMO", "1")], || std::env::var("HELPER_DEMO").ok());
/// assert_eq!(seen.as_deref(), Some("1"));
/// ```
pub fn with_vars<I, K, V, F, R>(vars: I, f: F) -> R
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: AsRef<OsStr>,
    F: FnOnce() -> R,
{
    let _scope = scope(vars);
    f()
}
