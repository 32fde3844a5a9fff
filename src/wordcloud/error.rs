//! Error taxonomy for the word-cloud pipeline
//!
//! Variants fall into four classes: input validation (caller's fault),
//! environment (output directory), processing (tokenize/render/write) and
//! integrity (the write returned but no file exists).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WordCloudError {
    #[error("Missing required field: text")]
    MissingText,

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No write permission: {}", .0.display())]
    NotWritable(PathBuf),

    #[error("We need at least 1 word to plot a word cloud, got 0.")]
    NoWords,

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Rendering task failed: {0}")]
    Render(String),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File was not created: {}", .0.display())]
    NotPersisted(PathBuf),
}

/// Coarse class of a failure, used for logging and status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Environment,
    Processing,
    Integrity,
}

impl WordCloudError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingText | Self::InvalidJson(_) => ErrorKind::Input,
            Self::OutputDir { .. } | Self::NotWritable(_) => ErrorKind::Environment,
            Self::NoWords | Self::Encode(_) | Self::Render(_) | Self::Write { .. } => {
                ErrorKind::Processing
            }
            Self::NotPersisted(_) => ErrorKind::Integrity,
        }
    }

    pub const fn is_client_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert!(WordCloudError::MissingText.is_client_error());
        assert_eq!(WordCloudError::NoWords.kind(), ErrorKind::Processing);
        assert_eq!(
            WordCloudError::NotPersisted(PathBuf::from("/tmp/x.png")).kind(),
            ErrorKind::Integrity
        );
        assert!(!WordCloudError::NotWritable(PathBuf::from("/tmp")).is_client_error());
    }

    #[test]
    fn test_integrity_message_is_distinct_from_write_failure() {
        let missing = WordCloudError::NotPersisted(PathBuf::from("/out/a.png")).to_string();
        let write = WordCloudError::Write {
            path: PathBuf::from("/out/a.png"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        }
        .to_string();
        assert_eq!(missing, "File was not created: /out/a.png");
        assert!(write.contains("disk full"));
        assert_ne!(missing, write);
    }
}
