//! Case-insensitive substring search over notes
//!
//! Results come back in scan order and scanning stops at the result cap, so
//! the first matches found win. There is no relevance ranking.

use super::error::{VaultError, VaultResult};
use super::path::PathResolver;
use super::store;
use serde::Serialize;
use std::io::ErrorKind;
use tracing::{debug, warn};

/// Snippet used when only the note's path matched
pub const FILENAME_MATCH: &str = "Matched in filename";

/// Hard ceiling on results per search; configuration can only lower it
pub const MAX_RESULTS_LIMIT: usize = 20;
pub const DEFAULT_MAX_RESULTS: usize = MAX_RESULTS_LIMIT;
pub const DEFAULT_CONTEXT_CHARS: usize = 50;

/// A single search match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub path: String,
    pub snippet: String,
}

#[derive(Debug, Clone)]
pub struct SearchEngine {
    resolver: PathResolver,
    max_results: usize,
    context_chars: usize,
}

impl SearchEngine {
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
            max_results: DEFAULT_MAX_RESULTS,
            context_chars: DEFAULT_CONTEXT_CHARS,
        }
    }

    /// Lower the result cap. Values above [`MAX_RESULTS_LIMIT`] are clamped.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.min(MAX_RESULTS_LIMIT);
        self
    }

    pub fn with_context_chars(mut self, context_chars: usize) -> Self {
        self.context_chars = context_chars;
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Search `candidates` (relative paths, in scan order) for `query`.
    ///
    /// A note matches when the lowercased query occurs in its lowercased
    /// content or path. Content matches carry a snippet around the first
    /// occurrence; path-only matches carry [`FILENAME_MATCH`]. Notes that are
    /// not valid UTF-8 can still match by path; other read failures are skipped.
    pub async fn search(&self, query: &str, candidates: &[String]) -> VaultResult<Vec<SearchHit>> {
        if query.is_empty() {
            return Err(VaultError::invalid_arguments("query must not be empty"));
        }

        let needle: Vec<char> = fold_case(query).chars().collect();
        let mut hits = Vec::new();

        for candidate in candidates {
            if hits.len() >= self.max_results {
                break;
            }

            let content = match self.read_candidate(candidate).await {
                Ok(c) => Some(c),
                Err(VaultError::Io(e)) if e.kind() == ErrorKind::InvalidData => {
                    debug!("Searching only the path of {}: {}", candidate, e);
                    None
                }
                Err(e) => {
                    warn!("Skipping {} during search: {}", candidate, e);
                    continue;
                }
            };

            let snippet = content
                .as_deref()
                .and_then(|c| self.content_snippet(c, &needle));

            if let Some(snippet) = snippet {
                hits.push(SearchHit {
                    path: candidate.clone(),
                    snippet,
                });
            } else if contains_chars(&fold_case(candidate), &needle) {
                hits.push(SearchHit {
                    path: candidate.clone(),
                    snippet: FILENAME_MATCH.to_string(),
                });
            }
        }

        Ok(hits)
    }

    async fn read_candidate(&self, candidate: &str) -> VaultResult<String> {
        let path = self.resolver.resolve(candidate)?;
        store::read(&path).await
    }

    /// Excerpt around the first case-insensitive occurrence of `needle`, or
    /// `None` when the content does not contain it.
    fn content_snippet(&self, content: &str, needle: &[char]) -> Option<String> {
        let original: Vec<char> = content.chars().collect();

        // Lowercasing can expand a char, so keep the source index of every folded char
        let mut folded = Vec::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len());
        for (idx, c) in original.iter().enumerate() {
            for lower in c.to_lowercase() {
                folded.push(lower);
                origin.push(idx);
            }
        }

        let pos = find_chars(&folded, needle)?;
        let match_start = origin[pos];
        let match_end = origin[pos + needle.len() - 1] + 1;

        let start = match_start.saturating_sub(self.context_chars);
        let end = (match_end + self.context_chars).min(original.len());

        let excerpt: String = original[start..end].iter().collect();
        Some(format!("...{}...", collapse_newlines(&excerpt)))
    }
}

fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn contains_chars(haystack: &str, needle: &[char]) -> bool {
    let chars: Vec<char> = haystack.chars().collect();
    find_chars(&chars, needle).is_some()
}

fn collapse_newlines(s: &str) -> String {
    s.replace("\r\n", " ").replace('\n', " ")
}
