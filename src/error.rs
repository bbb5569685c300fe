//! Error taxonomy for the archive pipeline.
//!
//! Domain failures are typed so the orchestrator can decide which ones
//! trigger an abort, while bootstrap code (config, client setup, `main`)
//! keeps using `anyhow`.

use std::fmt;

use thiserror::Error;

/// A storage backend call that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    OpenMultipart,
    UploadPart,
    CompleteMultipart,
    AbortMultipart,
    PutObject,
}

impl fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageOperation::OpenMultipart => write!(f, "create multipart upload"),
            StorageOperation::UploadPart => write!(f, "upload part"),
            StorageOperation::CompleteMultipart => write!(f, "complete multipart upload"),
            StorageOperation::AbortMultipart => write!(f, "abort multipart upload"),
            StorageOperation::PutObject => write!(f, "put object"),
        }
    }
}

/// A failed call against the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct TransferError {
    pub operation: StorageOperation,
    pub part_number: Option<u32>,
    pub message: String,
}

impl TransferError {
    pub fn new(operation: StorageOperation, message: impl fmt::Display) -> Self {
        Self {
            operation,
            part_number: None,
            message: message.to_string(),
        }
    }

    /// Attach the part number the failed call was for.
    pub fn for_part(mut self, part_number: u32) -> Self {
        self.part_number = Some(part_number);
        self
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.part_number {
            Some(n) => write!(f, "Failed to {} {}: {}", self.operation, n, self.message),
            None => write!(f, "Failed to {}: {}", self.operation, self.message),
        }
    }
}

/// Every way an archive request can fail.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No destination bucket was configured
    #[error("No AWS Bucket configured on server!")]
    Configuration,

    /// The source link could not be resolved to a media stream
    #[error("Failed to resolve {link}: {reason}")]
    Resolution { link: String, reason: String },

    /// A storage backend call failed
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// The stream produced more chunks than a multipart upload may hold
    #[error("Number of parts exceeded threshold of {limit}")]
    PartLimitExceeded { limit: u32 },

    /// The media stream failed mid-read
    #[error("Media stream failed: {reason}")]
    SourceStream { reason: String },

    /// An internal invariant was violated
    #[error("Received malformed result: {detail}")]
    MalformedResult { detail: String },
}

impl ArchiveError {
    pub fn resolution(link: &str, reason: impl fmt::Display) -> Self {
        ArchiveError::Resolution {
            link: link.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns true for failures that never reached the network.
    pub fn is_internal(&self) -> bool {
        matches!(self, ArchiveError::MalformedResult { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_error_display_with_part() {
        let err = TransferError::new(StorageOperation::UploadPart, "BadDigest").for_part(7);
        assert_eq!(err.to_string(), "Failed to upload part 7: BadDigest");
    }

    #[test]
    fn test_transfer_error_display_without_part() {
        let err = TransferError::new(StorageOperation::OpenMultipart, "AccessDenied");
        assert_eq!(err.to_string(), "Failed to create multipart upload: AccessDenied");
    }

    #[test]
    fn test_transfer_error_is_transparent() {
        let err: ArchiveError = TransferError::new(StorageOperation::PutObject, "timeout").into();
        assert_eq!(err.to_string(), "Failed to put object: timeout");
        assert!(!err.is_internal());
    }

    #[test]
    fn test_part_limit_message() {
        let err = ArchiveError::PartLimitExceeded { limit: 10_000 };
        assert!(err.to_string().contains("10000"));
    }
}
