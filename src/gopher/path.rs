//! Selector to filesystem path resolution.
//!
//! Selectors are always treated as relative to the root: a leading `/` is
//! ignored, `.` segments are dropped and `..` segments pop the previous
//! segment lexically. The joined path must stay under the root; if it does
//! not, resolution falls back to [`ROOT_SELECTOR`].

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Selector used when a request tries to leave the root.
pub const ROOT_SELECTOR: &str = "/";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("selector {selector:?} resolves outside the root")]
pub struct Traversal {
    pub selector: String,
}

/// An absolute path that is the root or lies beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    path: PathBuf,
    fallback: bool,
}

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// `true` when the selector escaped the root and was replaced.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Joins `selector` onto `root`, rejecting results outside `root`.
pub fn resolve(root: &Path, selector: &str) -> Result<ResolvedPath, Traversal> {
    let traversal = || Traversal {
        selector: selector.to_string(),
    };

    let mut path = root.to_path_buf();
    for component in Path::new(selector).components() {
        match component {
            Component::Normal(segment) => path.push(segment),
            Component::ParentDir => {
                if !path.pop() {
                    return Err(traversal());
                }
            }
            Component::RootDir | Component::CurDir => {}
            Component::Prefix(_) => return Err(traversal()),
        }
    }

    if path.as_os_str().len() < root.as_os_str().len() || !path.starts_with(root) {
        return Err(traversal());
    }

    Ok(ResolvedPath {
        path,
        fallback: false,
    })
}

/// Resolves `selector`, substituting [`ROOT_SELECTOR`] on a traversal attempt.
///
/// At most two attempts are made. If the root selector itself were to fail,
/// the root is returned as-is.
pub fn resolve_or_root(root: &Path, selector: &str) -> ResolvedPath {
    match resolve(root, selector) {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::warn!(selector = %err.selector, "traversal attempt, serving root");
            let path = resolve(root, ROOT_SELECTOR)
                .map(ResolvedPath::into_path_buf)
                .unwrap_or_else(|_| root.to_path_buf());
            ResolvedPath {
                path,
                fallback: true,
            }
        }
    }
}
