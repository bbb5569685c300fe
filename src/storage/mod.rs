//! Object storage integration.
//!
//! The upload layer never talks to S3 directly. It only needs the handful of
//! calls in [`ObjectStorage`], which keeps the multipart state machine
//! testable against an in-memory backend and lets S3-compatible stores
//! (MinIO, R2, Wasabi) plug in through the same client.
//!
//! ## Components
//!
//! - **ObjectStorage**: capability contract used by the upload layer
//! - **S3Storage**: rusoto-backed implementation
//! - **content_md5**: per-chunk integrity checksum

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::TransferError;
use crate::models::PartRecord;

/// Chunk checksum calculation
pub mod checksum;

/// S3 client construction
pub mod client;

/// Amazon S3 implementation of [`ObjectStorage`]
pub mod s3;

pub use checksum::content_md5;
pub use s3::S3Storage;

/// The calls the upload layer needs from an object store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Start a multipart transfer and return its upload ID.
    async fn open_multipart(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
    ) -> Result<String, TransferError>;

    /// Upload one numbered part and return its completion token (ETag).
    async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: u32,
        body: Bytes,
        checksum: &str,
    ) -> Result<String, TransferError>;

    /// Commit a transfer from its parts, sorted by part number.
    async fn complete_multipart(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[PartRecord],
    ) -> Result<(), TransferError>;

    /// Release every part held for an unfinished transfer.
    async fn abort_multipart(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> Result<(), TransferError>;

    /// Store a whole object in one call.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), TransferError>;
}
