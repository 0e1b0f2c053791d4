//! Application config rewriting
//!
//! Each supported config dialect implements [`ConfigRewriter`]: a pure text transform
//! that swaps the database name, user and password and leaves every other byte alone.
//! [`rewrite_file`] wraps a rewriter with the file handling shared by all dialects
//! (existence check, read, atomic replace). Content is handled as bytes, so files in
//! legacy encodings pass through untouched outside the rewritten values.
//!
//! ## Adding a dialect
//!
//! 1. Add a variant to [`ConfigTarget`](crate::request::ConfigTarget)
//! 2. Implement [`ConfigRewriter`] in a new submodule
//! 3. Return it from [`rewriter_for`]
//!
//! The job pipeline only talks to the trait and does not change.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::common::fs::write_atomic;
use crate::error::{Result, job};
use crate::request::{ConfigTarget, ConfigType};

pub mod dotenv;
pub mod wordpress;

pub use dotenv::DotenvRewriter;
pub use wordpress::WordPressRewriter;

/// The new connection values written into the staging config
#[derive(Clone, Copy)]
pub struct ConnectionValues<'a> {
    pub database: &'a str,
    pub user: &'a str,
    pub password: &'a str,
}

impl fmt::Debug for ConnectionValues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionValues")
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Output of a text rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub content: Vec<u8>,
    /// Non-fatal findings, e.g. a constant that is not defined in the file
    pub warnings: Vec<String>,
}

/// Summary of a file rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteReport {
    pub path: PathBuf,
    /// False when the file already held the target values
    pub changed: bool,
    pub warnings: Vec<String>,
}

pub trait ConfigRewriter: Send + Sync + fmt::Debug {
    /// Dialect handled by this rewriter
    fn config_type(&self) -> ConfigType;

    /// Replace the three connection fields in `content`
    fn rewrite(&self, content: &[u8], values: &ConnectionValues<'_>) -> Rewritten;
}

/// Pick the rewriter for a config target; `None` for manual configuration
pub fn rewriter_for(target: &ConfigTarget) -> Option<Box<dyn ConfigRewriter>> {
    match target {
        ConfigTarget::Manual => None,
        ConfigTarget::WordPress { .. } => Some(Box::new(WordPressRewriter)),
        ConfigTarget::Env { keys, .. } => Some(Box::new(DotenvRewriter::new(keys.clone()))),
    }
}

/// Resolve `relative` under `root`, refusing paths that leave it.
///
/// Symlinked directories are resolved first, so a link inside the staging copy that
/// points elsewhere on the host is caught here.
pub fn resolve_config_path(root: &Path, relative: &Path) -> Result<PathBuf> {
    let joined = root.join(relative);
    let display = joined.display().to_string();
    let (Some(parent), Some(name)) = (joined.parent(), joined.file_name()) else {
        return Err(job::config_rewrite_failed(display, "not a file path"));
    };

    let root = root
        .canonicalize()
        .map_err(|e| job::config_rewrite_failed(&display, format!("domain root: {e}")))?;
    let parent = parent
        .canonicalize()
        .map_err(|_| job::config_rewrite_failed(&display, "file does not exist in the staging copy"))?;
    if !parent.starts_with(&root) {
        return Err(job::config_rewrite_failed(
            display,
            format!("resolves outside the domain root {}", root.display()),
        ));
    }
    Ok(parent.join(name))
}

/// Rewrite the config file at `path` in place
pub fn rewrite_file(
    rewriter: &dyn ConfigRewriter,
    path: &Path,
    values: &ConnectionValues<'_>,
) -> Result<RewriteReport> {
    let display = path.display().to_string();

    let metadata = std::fs::symlink_metadata(path).map_err(|_| {
        job::config_rewrite_failed(&display, "file does not exist in the staging copy")
    })?;
    if metadata.file_type().is_symlink() {
        return Err(job::config_rewrite_failed(
            display,
            "is a symbolic link; only regular files are rewritten",
        ));
    }
    if !metadata.is_file() {
        return Err(job::config_rewrite_failed(display, "not a regular file"));
    }

    let original = std::fs::read(path)
        .map_err(|e| job::config_rewrite_failed(&display, format!("read failed: {e}")))?;

    let Rewritten { content, warnings } = rewriter.rewrite(&original, values);
    let changed = content != original;

    if changed {
        write_atomic(path, &content)
            .map_err(|e| job::config_rewrite_failed(&display, format!("write failed: {e}")))?;
    }

    Ok(RewriteReport {
        path: path.to_path_buf(),
        changed,
        warnings,
    })
}
