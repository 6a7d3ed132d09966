//! Markdown note enumeration
//!
//! Scan order is depth-first with the entries of each directory sorted by
//! file name, so two scans of an unchanged tree always agree.

use super::error::{VaultError, VaultResult};
use super::path::VaultRoot;
use glob::Pattern;
use std::path::Path;
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Exclusions applied when no configuration overrides them. Each matches at
/// any depth, so nested checkouts and per-folder tool directories are skipped.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/.git/**",
    "**/.obsidian/**",
    "**/.trash/**",
    "**/node_modules/**",
];

const NOTE_EXTENSION: &str = ".md";

/// Enumerates notes under the vault root
#[derive(Debug, Clone)]
pub struct VaultScanner {
    root: VaultRoot,
    exclude: Vec<Pattern>,
}

impl VaultScanner {
    pub fn new<S: AsRef<str>>(root: VaultRoot, exclude: &[S]) -> VaultResult<Self> {
        let exclude = exclude
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|e| {
                    VaultError::invalid_arguments(format!(
                        "invalid exclude pattern '{}': {}",
                        p.as_ref(),
                        e
                    ))
                })
            })
            .collect::<VaultResult<Vec<_>>>()?;

        Ok(Self { root, exclude })
    }

    /// Relative, `/`-separated paths of every `.md` file not excluded.
    pub fn list_markdown_files(&self) -> VaultResult<Vec<String>> {
        let root = self.root.as_path();
        if !root.is_dir() {
            return Err(VaultError::NotFound(root.display().to_string()));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded_entry(root, entry));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable vault entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(relative) = relative_path(root, entry.path()) {
                if relative.ends_with(NOTE_EXTENSION) {
                    files.push(relative);
                }
            }
        }

        Ok(files)
    }

    fn is_excluded_entry(&self, root: &Path, entry: &DirEntry) -> bool {
        let Some(relative) = relative_path(root, entry.path()) else {
            return false;
        };
        if relative.is_empty() {
            return false;
        }

        if entry.file_type().is_dir() {
            // `dir/**` only matches once a separator follows the directory name
            let as_dir = format!("{}/", relative);
            self.is_excluded(&relative) || self.is_excluded(&as_dir)
        } else {
            self.is_excluded(&relative)
        }
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(relative))
    }
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
