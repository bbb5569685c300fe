//! Upload strategies for moving a media stream into object storage.

use crate::constants::{DEFAULT_CHUNK_SIZE, MULTIPART_THRESHOLD, S3_MAX_PARTS, VIDEO_CONTENT_TYPE};

/// Multipart session handling (open, parts, commit or abort)
pub mod multipart;

/// Per-part upload with optional retries
pub mod part;

/// Retry policy for part uploads
pub mod retry;

/// Single-shot vs multipart selection
pub mod router;

pub use multipart::MultipartOrchestrator;
pub use part::PartUploader;
pub use retry::RetryPolicy;
pub use router::{UploadRouter, UploadStrategy};

/// Tunables shared by both upload paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    /// Lengths at or above this use multipart upload.
    pub multipart_threshold: u64,
    pub max_parts: u32,
    pub chunk_size: usize,
    pub content_type: String,
    pub retry: RetryPolicy,
}

impl Default for UploadSettings {
    fn default() -> Self {
        UploadSettings {
            multipart_threshold: MULTIPART_THRESHOLD,
            max_parts: S3_MAX_PARTS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            content_type: VIDEO_CONTENT_TYPE.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}
