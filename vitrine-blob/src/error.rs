use thiserror::Error;

/// Result type for blob operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Errors raised by blob backends and the ingestion pipeline
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Unknown bucket: {name}")]
    UnknownBucket { name: String },

    #[error("Object not found: {key}")]
    NotFound { key: String },

    #[error("The resource already exists: {key}")]
    AlreadyExists { key: String },

    #[error("Invalid request: {message}")]
    Invalid { message: String },

    #[error("Storage backend rejected the request: {message}")]
    Rejected { message: String },

    #[error("Storage backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl BlobError {
    /// Wrap any transport error
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(key: S) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn already_exists<S: Into<String>>(key: S) -> Self {
        Self::AlreadyExists { key: key.into() }
    }

    pub fn rejected<S: Into<String>>(message: S) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Local rejection of a file before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("File is too large: maximum size for {bucket} is {limit_mb}MB")]
    TooLarge {
        bucket: &'static str,
        limit_mb: u64,
        size: u64,
    },

    #[error("File type {content_type} is not allowed for {bucket}")]
    TypeNotAllowed {
        bucket: &'static str,
        content_type: String,
    },
}
