//! Vault root and path containment
//!
//! Containment is checked lexically: the joined path is normalized (`.` and
//! `..` collapsed without touching the filesystem) and must still live under
//! the vault root, compared component by component. Symlinks inside the vault
//! are not resolved, so a link pointing outside the root is still followed by
//! the I/O layer.

use super::error::{VaultError, VaultResult};
use std::path::{Component, Path, PathBuf};

/// Absolute, normalized vault directory. Existence is checked lazily by the
/// components that touch the filesystem, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultRoot(PathBuf);

impl VaultRoot {
    pub fn new(path: impl AsRef<Path>) -> VaultResult<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(VaultError::invalid_arguments("vault path must not be empty"));
        }
        let absolute = std::path::absolute(path)?;
        Ok(Self(normalize(&absolute)))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

/// A caller path after it has passed the containment check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    relative: String,
    absolute: PathBuf,
}

impl ResolvedPath {
    /// The path as the caller supplied it, used in messages
    pub fn relative(&self) -> &str {
        &self.relative
    }

    pub fn absolute(&self) -> &Path {
        &self.absolute
    }
}

/// Resolves caller-supplied paths against the vault root
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: VaultRoot,
}

impl PathResolver {
    pub fn new(root: VaultRoot) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &VaultRoot {
        &self.root
    }

    /// Join `relative` onto the vault root and reject anything that escapes it.
    ///
    /// Leading separators are ignored, so `/daily/today.md` and
    /// `daily/today.md` address the same note.
    pub fn resolve(&self, relative: &str) -> VaultResult<ResolvedPath> {
        let trimmed = relative.trim_start_matches(['/', '\\']);
        let absolute = normalize(&self.root.as_path().join(trimmed));

        if !absolute.starts_with(self.root.as_path()) {
            return Err(VaultError::AccessDenied(relative.to_string()));
        }

        Ok(ResolvedPath {
            relative: relative.to_string(),
            absolute,
        })
    }
}

/// Collapse `.` and `..` segments without consulting the filesystem.
/// `..` at the filesystem root is a no-op, mirroring how the OS treats it.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
