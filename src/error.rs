use thiserror::Error;

/// Unified error type for ci-tagger operations
#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Tag store operation failed: {0}")]
    Store(String),

    #[error("Artifact publish failed: {0}")]
    Publish(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Tag(#[from] TagError),
}

/// Convenience type alias for Results in ci-tagger
pub type Result<T> = std::result::Result<T, TaggerError>;

impl TaggerError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TaggerError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        TaggerError::Version(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        TaggerError::Branch(msg.into())
    }

    /// Create a tag store error with context
    pub fn store(msg: impl Into<String>) -> Self {
        TaggerError::Store(msg.into())
    }

    /// Create an artifact publish error with context
    pub fn publish(msg: impl Into<String>) -> Self {
        TaggerError::Publish(msg.into())
    }
}

/// Errors from cutting a permanent release tag.
///
/// An already existing tag is not an error: `create_tag` reports it as
/// [`crate::resolver::TagOutcome::AlreadyExists`].
#[derive(Error, Debug)]
pub enum TagError {
    /// The version is not a bare `MAJOR.MINOR.PATCH` string.
    #[error("Refusing to create permanent tag from '{version}': expected MAJOR.MINOR.PATCH")]
    InvalidFormat { version: String },

    /// The tag store failed to create or push the tag.
    #[error("Failed to publish tag '{name}': {source}")]
    StoreFailure {
        name: String,
        #[source]
        source: Box<TaggerError>,
    },
}

impl TagError {
    pub fn invalid_format(version: impl Into<String>) -> Self {
        TagError::InvalidFormat {
            version: version.into(),
        }
    }

    pub fn store_failure(name: impl Into<String>, source: TaggerError) -> Self {
        TagError::StoreFailure {
            name: name.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TaggerError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TaggerError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (TaggerError::config("x"), "Configuration error"),
            (TaggerError::version("x"), "Version parsing error"),
            (TaggerError::branch("x"), "Branch error"),
            (TaggerError::store("x"), "Tag store operation failed"),
            (TaggerError::publish("x"), "Artifact publish failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_tag_error_invalid_format_mentions_version() {
        let err = TagError::invalid_format("1.3.0-rc.12");
        let msg = err.to_string();
        assert!(msg.contains("1.3.0-rc.12"));
        assert!(msg.contains("MAJOR.MINOR.PATCH"));
    }

    #[test]
    fn test_tag_error_store_failure_keeps_source() {
        let err = TagError::store_failure("backend/v1.0.0", TaggerError::store("push rejected"));
        assert!(err.to_string().contains("backend/v1.0.0"));
        assert!(err.to_string().contains("push rejected"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_tag_error_converts_transparently() {
        let err: TaggerError = TagError::invalid_format("x").into();
        assert!(err.to_string().starts_with("Refusing to create permanent tag"));
    }
}
