//! Temporary configuration files.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A file inside a temporary directory that is deleted on drop.
#[derive(Debug)]
pub struct TempConfig {
    path: Utf8PathBuf,
    _dir: TempDir,
}

impl TempConfig {
    /// Location of the file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

fn temp_root() -> Result<(TempDir, Utf8PathBuf)> {
    let dir = TempDir::new().context("create temporary directory")?;
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .map_err(|path| anyhow::anyhow!("temporary directory is not UTF-8: {}", path.display()))?;
    Ok((dir, root))
}

/// Writes `contents` to `name` inside a fresh temporary directory.
///
/// # Examples
///
/// ```
/// use confbind_test_helpers::files;
///
/// let file = files::write("app.json", r#"{"port": 80}"#)?;
/// assert!(file.path().as_str().ends_with("app.json"));
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error when the directory cannot be created, its path is not
/// valid UTF-8, or the file cannot be written.
pub fn write(name: &str, contents: &str) -> Result<TempConfig> {
    let (dir, root) = temp_root()?;
    let path = root.join(name);
    std::fs::write(&path, contents).with_context(|| format!("write {path}"))?;
    Ok(TempConfig { path, _dir: dir })
}

/// A path inside a fresh temporary directory that does not exist.
///
/// # Errors
///
/// Returns an error when the directory cannot be created or its path is not
/// valid UTF-8.
pub fn missing(name: &str) -> Result<TempConfig> {
    let (dir, root) = temp_root()?;
    Ok(TempConfig {
        path: root.join(name),
        _dir: dir,
    })
}
