//! Vault MCP
//!
//! Exposes a local directory of markdown notes to MCP clients:
//! - Path-contained read, write, append and patch of single notes
//! - Case-insensitive search with context snippets
//! - Note listing, both as a tool and as MCP resources

pub mod mcp;
pub mod vault;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "vault-mcp.yaml";

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub scanner: ScannerYamlConfig,
    pub search: SearchYamlConfig,
    pub list: ListYamlConfig,
}

/// Scanner configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScannerYamlConfig {
    /// Glob patterns, relative to the vault root, that are never listed
    pub exclude: Vec<String>,
}

impl Default for ScannerYamlConfig {
    fn default() -> Self {
        Self {
            exclude: vault::scanner::DEFAULT_EXCLUDES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Search configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchYamlConfig {
    pub max_results: usize,
    pub context_chars: usize,
}

impl Default for SearchYamlConfig {
    fn default() -> Self {
        Self {
            max_results: vault::search::DEFAULT_MAX_RESULTS,
            context_chars: vault::search::DEFAULT_CONTEXT_CHARS,
        }
    }
}

/// list_notes configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListYamlConfig {
    pub default_limit: usize,
}

impl Default for ListYamlConfig {
    fn default() -> Self {
        Self {
            default_limit: mcp::handlers::DEFAULT_LIST_LIMIT,
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub vault_path: PathBuf,
    pub exclude_patterns: Vec<String>,
    pub search_max_results: usize,
    pub search_context_chars: usize,
    pub list_default_limit: usize,
}

impl Config {
    /// Defaults for everything but the vault path
    pub fn new(vault_path: impl Into<PathBuf>) -> Self {
        Self::from_yaml(vault_path.into(), YamlConfig::default())
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "vault-mcp.yaml" in CWD. A missing or
    /// broken file falls back to defaults. The vault path is made absolute
    /// against the current directory but not checked for existence.
    pub fn from_yaml_and_env(vault_path: &Path, yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);
        let absolute = std::path::absolute(vault_path)
            .with_context(|| format!("Invalid vault path: {}", vault_path.display()))?;

        let mut config = Self::from_yaml(absolute, yaml);

        if let Ok(excludes) = std::env::var("VAULT_EXCLUDE") {
            config.exclude_patterns = excludes
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(n) = env_usize("VAULT_SEARCH_MAX_RESULTS") {
            config.search_max_results = n;
        }
        if let Some(n) = env_usize("VAULT_LIST_LIMIT") {
            config.list_default_limit = n;
        }

        Ok(config)
    }

    fn from_yaml(vault_path: PathBuf, yaml: YamlConfig) -> Self {
        Self {
            vault_path,
            exclude_patterns: yaml.scanner.exclude,
            search_max_results: yaml.search.max_results,
            search_context_chars: yaml.search.context_chars,
            list_default_limit: yaml.list.default_limit,
        }
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!("No config file at {}, using env vars / defaults", path.display());
                YamlConfig::default()
            }
        }
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

// ============================================================================
// Tests
// ============================================================================
