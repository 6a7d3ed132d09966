//! Vault access layer
//!
//! Everything that touches the note directory lives here:
//! - [`PathResolver`] turns caller-supplied relative paths into contained absolute paths
//! - [`store`] reads, writes, appends to and patches a single note
//! - [`VaultScanner`] enumerates markdown notes, honoring exclusion globs
//! - [`SearchEngine`] runs case-insensitive substring search with context snippets

pub mod error;
pub mod path;
pub mod scanner;
pub mod search;
pub mod store;

pub use error::{VaultError, VaultResult};
pub use path::{PathResolver, ResolvedPath, VaultRoot};
pub use scanner::VaultScanner;
pub use search::{SearchEngine, SearchHit, FILENAME_MATCH};

use crate::Config;

/// The vault components wired against a single root.
///
/// Built once at startup and shared (behind an `Arc`) by the tool handler and
/// the resource catalog. Holds no mutable state.
pub struct Vault {
    resolver: PathResolver,
    scanner: VaultScanner,
    search: SearchEngine,
}

impl Vault {
    pub fn new(root: VaultRoot, config: &Config) -> VaultResult<Self> {
        let resolver = PathResolver::new(root.clone());
        let scanner = VaultScanner::new(root, &config.exclude_patterns)?;
        let search = SearchEngine::new(resolver.clone())
            .with_max_results(config.search_max_results)
            .with_context_chars(config.search_context_chars);

        Ok(Self {
            resolver,
            scanner,
            search,
        })
    }

    /// Build the vault from the runtime configuration
    pub fn from_config(config: &Config) -> VaultResult<Self> {
        let root = VaultRoot::new(&config.vault_path)?;
        Self::new(root, config)
    }

    pub fn root(&self) -> &VaultRoot {
        self.resolver.root()
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn scanner(&self) -> &VaultScanner {
        &self.scanner
    }

    pub fn search_engine(&self) -> &SearchEngine {
        &self.search
    }
}
