//! Note resources
//!
//! Read-only view of the vault as MCP resources: every scanned note gets a
//! `vault:///<relative path>` URI with its path segments percent-encoded.

use super::protocol::{ResourceContents, ResourceEntry};
use crate::vault::{store, Vault, VaultError, VaultResult};
use std::sync::Arc;

pub const RESOURCE_SCHEME: &str = "vault://";
pub const NOTE_MIME_TYPE: &str = "text/markdown";

pub struct ResourceCatalog {
    vault: Arc<Vault>,
}

impl ResourceCatalog {
    pub fn new(vault: Arc<Vault>) -> Self {
        Self { vault }
    }

    /// One entry per scanned note, in scan order
    pub fn list(&self) -> VaultResult<Vec<ResourceEntry>> {
        let files = self.vault.scanner().list_markdown_files()?;
        Ok(files
            .into_iter()
            .map(|path| ResourceEntry {
                uri: note_uri(&path),
                name: path,
                mime_type: NOTE_MIME_TYPE.to_string(),
            })
            .collect())
    }

    /// Read the note addressed by `uri`
    pub async fn read(&self, uri: &str) -> VaultResult<ResourceContents> {
        let relative = relative_path_from_uri(uri)?;
        let path = self.vault.resolver().resolve(&relative)?;
        let text = store::read(&path).await?;

        Ok(ResourceContents {
            uri: uri.to_string(),
            mime_type: NOTE_MIME_TYPE.to_string(),
            text,
        })
    }
}

pub fn note_uri(relative: &str) -> String {
    let encoded: Vec<String> = relative
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{}/{}", RESOURCE_SCHEME, encoded.join("/"))
}

/// Decode the path component of a note URI, without its leading separator.
/// Any authority between `vault://` and the first `/` is ignored.
fn relative_path_from_uri(uri: &str) -> VaultResult<String> {
    let rest = uri.strip_prefix(RESOURCE_SCHEME).ok_or_else(|| {
        VaultError::invalid_arguments(format!("unsupported resource URI: {}", uri))
    })?;

    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    let path = rest.find('/').map(|idx| &rest[idx..]).unwrap_or_default();

    let decoded = urlencoding::decode(path).map_err(|e| {
        VaultError::invalid_arguments(format!("malformed resource URI {}: {}", uri, e))
    })?;

    Ok(decoded.trim_start_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::VaultRoot;
    use crate::Config;
    use std::fs;
    use tempfile::TempDir;

    fn catalog() -> (TempDir, ResourceCatalog) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(dir.path());
        let vault = Vault::new(VaultRoot::new(dir.path()).unwrap(), &config).unwrap();
        (dir, ResourceCatalog::new(Arc::new(vault)))
    }

    #[test]
    fn test_note_uri_encodes_segments() {
        assert_eq!(note_uri("a.md"), "vault:///a.md");
        assert_eq!(note_uri("My Notes/día 1.md"), "vault:///My%20Notes/d%C3%ADa%201.md");
    }

    #[test]
    fn test_uri_round_trip() {
        let path = "My Notes/día #1?.md";
        assert_eq!(relative_path_from_uri(&note_uri(path)).unwrap(), path);
    }

    #[test]
    fn test_uri_with_authority_and_query() {
        assert_eq!(
            relative_path_from_uri("vault://host/dir/a.md?x=1#frag").unwrap(),
            "dir/a.md"
        );
    }

    #[test]
    fn test_foreign_scheme_rejected() {
        assert!(matches!(
            relative_path_from_uri("file:///etc/passwd"),
            Err(VaultError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_list_entries() {
        let (dir, catalog) = catalog();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.md"), "b").unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();
        fs::write(dir.path().join("skip.txt"), "x").unwrap();

        let entries = catalog.list().unwrap();
        assert_eq!(
            entries,
            vec![
                ResourceEntry {
                    uri: "vault:///a.md".into(),
                    name: "a.md".into(),
                    mime_type: "text/markdown".into(),
                },
                ResourceEntry {
                    uri: "vault:///sub/b.md".into(),
                    name: "sub/b.md".into(),
                    mime_type: "text/markdown".into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_read_resource() {
        let (dir, catalog) = catalog();
        fs::write(dir.path().join("with space.md"), "body").unwrap();

        let contents = catalog.read("vault:///with%20space.md").await.unwrap();
        assert_eq!(contents.text, "body");
        assert_eq!(contents.mime_type, NOTE_MIME_TYPE);
        assert_eq!(contents.uri, "vault:///with%20space.md");
    }

    #[tokio::test]
    async fn test_read_resource_traversal_denied() {
        let (_dir, catalog) = catalog();
        let err = catalog.read("vault:///..%2F..%2Fetc%2Fpasswd").await.unwrap_err();
        assert!(matches!(err, VaultError::AccessDenied(_)));
    }
}
