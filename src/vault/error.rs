//! Vault error taxonomy

use thiserror::Error;

/// Failures produced by vault operations.
///
/// Every variant is reported back to the caller as an ordinary tool result
/// with the error flag set; none of them abort the request.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Access denied: path outside vault: {0}")]
    AccessDenied(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Text to replace not found in {0}")]
    PatchTargetNotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = VaultError::AccessDenied("../etc/passwd".into());
        assert_eq!(err.to_string(), "Access denied: path outside vault: ../etc/passwd");

        let err = VaultError::NotFound("missing.md".into());
        assert_eq!(err.to_string(), "File not found: missing.md");

        let err = VaultError::PatchTargetNotFound("a.md".into());
        assert!(err.to_string().contains("a.md"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: VaultError = io.into();
        assert!(matches!(err, VaultError::Io(_)));
        assert!(err.to_string().contains("nope"));
    }
}
