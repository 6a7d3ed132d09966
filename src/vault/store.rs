//! Note I/O primitives
//!
//! Each function takes a path that already passed containment. None of these
//! are transactional: an interrupted write can leave a partial file.

use super::error::{VaultError, VaultResult};
use super::path::ResolvedPath;
use std::io::ErrorKind;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Read a note as UTF-8 text. Directories and missing paths are `NotFound`.
pub async fn read(path: &ResolvedPath) -> VaultResult<String> {
    ensure_file(path).await?;

    let bytes = fs::read(path.absolute()).await?;
    String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e).into())
}

/// Create or overwrite a note, creating missing parent directories.
pub async fn write(path: &ResolvedPath, content: &str) -> VaultResult<()> {
    if let Some(parent) = path.absolute().parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path.absolute(), content).await?;
    Ok(())
}

/// Append `content` on a new line. Unlike [`write`], the note must already exist.
pub async fn append(path: &ResolvedPath, content: &str) -> VaultResult<()> {
    ensure_file(path).await?;

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(path.absolute())
        .await?;
    file.write_all(format!("\n{}", content).as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// Replace the first occurrence of `old_text` with `new_text`.
///
/// The note is left untouched when `old_text` does not occur.
pub async fn patch(path: &ResolvedPath, old_text: &str, new_text: &str) -> VaultResult<()> {
    if old_text.is_empty() {
        return Err(VaultError::invalid_arguments("old_text must not be empty"));
    }

    let content = read(path).await?;
    if !content.contains(old_text) {
        return Err(VaultError::PatchTargetNotFound(path.relative().to_string()));
    }

    let patched = content.replacen(old_text, new_text, 1);
    fs::write(path.absolute(), patched).await?;
    Ok(())
}

async fn ensure_file(path: &ResolvedPath) -> VaultResult<()> {
    match fs::metadata(path.absolute()).await {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(VaultError::NotFound(path.relative().to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(VaultError::NotFound(path.relative().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
