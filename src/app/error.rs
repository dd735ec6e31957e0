use std::path::PathBuf;

use thiserror::Error;

/// Failure class of a [`FeedDigestError`], one per stage of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Parse,
    CorruptStorage,
    StorageWrite,
    Digest,
    Render,
    Config,
}

#[derive(Error, Debug)]
pub enum FeedDigestError {
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed returned status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("Feed response exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Unsupported pubDate {0:?}")]
    PubDate(String),

    #[error("Failed to read archive {path}: {source}")]
    StorageRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid archive data in {path}: {reason}")]
    CorruptStorage { path: PathBuf, reason: String },

    #[error("Failed to serialize archive: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write archive {path}: {source}")]
    StorageWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid published time {published:?} for {link}")]
    Digest { link: String, published: String },

    #[error("Template error: {0}")]
    Template(String),

    #[error("Failed to write document {path}: {source}")]
    DocumentWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FeedDigestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl(_)
            | Self::UnsupportedScheme(_)
            | Self::Http(_)
            | Self::HttpStatus(_)
            | Self::ResponseTooLarge { .. } => ErrorKind::Fetch,
            Self::FeedParse(_) | Self::PubDate(_) => ErrorKind::Parse,
            Self::StorageRead { .. } | Self::CorruptStorage { .. } => ErrorKind::CorruptStorage,
            Self::Serialize(_) | Self::StorageWrite { .. } => ErrorKind::StorageWrite,
            Self::Digest { .. } => ErrorKind::Digest,
            Self::Template(_) | Self::DocumentWrite { .. } => ErrorKind::Render,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<handlebars::TemplateError> for FeedDigestError {
    fn from(e: handlebars::TemplateError) -> Self {
        Self::Template(e.to_string())
    }
}

impl From<handlebars::RenderError> for FeedDigestError {
    fn from(e: handlebars::RenderError) -> Self {
        Self::Template(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FeedDigestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_groups_fetch_failures() {
        let err = FeedDigestError::HttpStatus(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert_eq!(err.to_string(), "Feed returned status 404 Not Found");

        let err = FeedDigestError::ResponseTooLarge { limit: 10 };
        assert_eq!(err.kind(), ErrorKind::Fetch);
    }

    #[test]
    fn test_kind_separates_storage_failures() {
        let corrupt = FeedDigestError::CorruptStorage {
            path: "data.json".into(),
            reason: "expected value".into(),
        };
        let write = FeedDigestError::StorageWrite {
            path: "data.json".into(),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(corrupt.kind(), ErrorKind::CorruptStorage);
        assert_eq!(write.kind(), ErrorKind::StorageWrite);
    }
}
