use serde::{Deserialize, Serialize};

use crate::error::ArchiveError;

/// A single request to archive one video link into one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub source_link: String,
    pub destination_bucket: String,
}

impl TransferRequest {
    /// Build a request, failing before any network activity when no bucket is configured.
    pub fn new(source_link: &str, destination_bucket: Option<&str>) -> Result<Self, ArchiveError> {
        let bucket = destination_bucket
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .ok_or(ArchiveError::Configuration)?;

        Ok(TransferRequest {
            source_link: source_link.trim().to_string(),
            destination_bucket: bucket.to_string(),
        })
    }
}

/// Lifecycle of a remote multipart transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Completed,
    Aborted,
}

/// An open multipart transfer on the storage backend.
///
/// Owned by exactly one orchestrator; once completed or aborted it is never
/// reused and a new session has to be opened instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub upload_id: String,
    pub bucket: String,
    pub key: String,
    state: SessionState,
}

impl UploadSession {
    pub fn open(upload_id: String, bucket: &str, key: &str) -> Self {
        UploadSession {
            upload_id,
            bucket: bucket.to_string(),
            key: key.to_string(),
            state: SessionState::Open,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub(crate) fn mark_completed(&mut self) {
        debug_assert!(self.is_open(), "session {} already closed", self.upload_id);
        self.state = SessionState::Completed;
    }

    pub(crate) fn mark_aborted(&mut self) {
        debug_assert!(self.is_open(), "session {} already closed", self.upload_id);
        self.state = SessionState::Aborted;
    }
}

/// One successfully uploaded part, as required by the commit manifest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PartRecord {
    pub part_number: u32,
    pub completion_token: String,
}

/// Summary of a committed multipart transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTransfer {
    pub key: String,
    pub parts: u32,
    pub bytes_transferred: u64,
}

/// Terminal value of any upload attempt, single-shot or multipart.
#[derive(Debug)]
pub enum UploadOutcome {
    Success { key: String },
    Failure(ArchiveError),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }

    pub fn into_result(self) -> Result<String, ArchiveError> {
        match self {
            UploadOutcome::Success { key } => Ok(key),
            UploadOutcome::Failure(err) => Err(err),
        }
    }
}

impl From<Result<String, ArchiveError>> for UploadOutcome {
    fn from(result: Result<String, ArchiveError>) -> Self {
        match result {
            Ok(key) => UploadOutcome::Success { key },
            Err(err) => UploadOutcome::Failure(err),
        }
    }
}
