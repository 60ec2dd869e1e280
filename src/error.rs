use thiserror::Error;

/// Main error type for tplvault
#[derive(Error, Debug)]
pub enum VaultError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A file could not be moved into its entry directory
    #[error("Failed to move {from} to {to}: {source}")]
    Relocate {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    /// Frontmatter / metadata parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Inbox watcher could not be installed or stopped unexpectedly
    #[error("Watch error: {0}")]
    Watch(String),
}

/// Convenient Result type using VaultError
pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultError::Parse("Test error".to_string());
        assert!(err.to_string().contains("Parse error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_watch_error_display() {
        let err = VaultError::Watch("watcher thread panicked".to_string());
        assert_eq!(err.to_string(), "Watch error: watcher thread panicked");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let vault_err: VaultError = io_err.into();
        assert!(matches!(vault_err, VaultError::Io(_)));
    }

    #[test]
    fn test_relocate_error_names_both_paths() {
        let err = VaultError::Relocate {
            from: "inbox/a.zip".to_string(),
            to: "store/a/source.zip".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("inbox/a.zip"));
        assert!(msg.contains("store/a/source.zip"));
        assert!(msg.contains("denied"));
    }
}
