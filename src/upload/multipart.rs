//! Multipart transfer of a chunked stream.
//!
//! The orchestrator owns one [`UploadSession`] from open to commit. Parts are
//! numbered from 1 in stream order and the commit manifest lists them in that
//! order. Any failure after the session was opened aborts it exactly once; a
//! failing abort is logged and never replaces the error that caused it. A
//! panic while transferring also aborts the session before it unwinds further.

use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use log::{debug, error, info, warn};

use crate::error::ArchiveError;
use crate::media::ChunkReader;
use crate::models::{CompletedTransfer, PartRecord, UploadSession};
use crate::storage::{content_md5, ObjectStorage};
use crate::upload::part::PartUploader;
use crate::upload::UploadSettings;

pub struct MultipartOrchestrator<'a> {
    storage: &'a dyn ObjectStorage,
    uploader: PartUploader<'a>,
    max_parts: u32,
    content_type: &'a str,
}

impl<'a> MultipartOrchestrator<'a> {
    pub fn new(storage: &'a dyn ObjectStorage, settings: &'a UploadSettings) -> Self {
        MultipartOrchestrator {
            storage,
            uploader: PartUploader::new(storage, settings.retry),
            max_parts: settings.max_parts,
            content_type: &settings.content_type,
        }
    }

    /// Stream every chunk of `reader` into `bucket/key` as one multipart object.
    ///
    /// `total_bytes` is only used for progress reporting.
    pub async fn upload(
        &self,
        bucket: &str,
        key: &str,
        total_bytes: u64,
        reader: &mut ChunkReader,
    ) -> Result<CompletedTransfer, ArchiveError> {
        // Nothing to clean up if the open itself fails.
        let upload_id = self
            .storage
            .open_multipart(bucket, key, self.content_type)
            .await?;

        let mut session = UploadSession::open(upload_id, bucket, key);
        info!(
            "Started multipart upload {} for s3://{}/{}",
            session.upload_id, bucket, key
        );

        let result = AssertUnwindSafe(self.transfer(&session, total_bytes, reader))
            .catch_unwind()
            .await;

        let result = match result {
            Ok(result) => result,
            Err(payload) => {
                error!(
                    "Multipart upload of s3://{}/{} panicked, aborting session",
                    bucket, key
                );
                self.abort(&mut session).await;
                panic::resume_unwind(payload);
            }
        };

        match result {
            Ok(completed) => {
                session.mark_completed();
                info!(
                    "Completed multipart upload of s3://{}/{} ({} parts, {} bytes)",
                    bucket, key, completed.parts, completed.bytes_transferred
                );
                Ok(completed)
            }
            Err(cause) => {
                warn!("Multipart upload of s3://{}/{} failed: {}", bucket, key, cause);
                self.abort(&mut session).await;
                Err(cause)
            }
        }
    }

    async fn transfer(
        &self,
        session: &UploadSession,
        total_bytes: u64,
        reader: &mut ChunkReader,
    ) -> Result<CompletedTransfer, ArchiveError> {
        let mut parts: Vec<PartRecord> = Vec::new();
        let mut part_number: u32 = 0;
        let mut transferred: u64 = 0;

        while let Some(chunk) = reader.next_chunk().await? {
            if part_number >= self.max_parts {
                return Err(ArchiveError::PartLimitExceeded {
                    limit: self.max_parts,
                });
            }
            part_number += 1;

            let checksum = content_md5(&chunk);
            let size = chunk.len() as u64;
            debug!("Part {}: {} bytes, Content-MD5 {}", part_number, size, checksum);

            let record = self
                .uploader
                .upload(session, part_number, chunk, &checksum)
                .await?;

            transferred += size;
            info!(
                "Chunk {}: Uploaded {} / {}",
                part_number, transferred, total_bytes
            );
            parts.push(record);
        }

        parts.sort_by_key(|part| part.part_number);
        self.storage
            .complete_multipart(&session.bucket, &session.key, &session.upload_id, &parts)
            .await?;

        Ok(CompletedTransfer {
            key: session.key.clone(),
            parts: part_number,
            bytes_transferred: transferred,
        })
    }

    async fn abort(&self, session: &mut UploadSession) {
        match self
            .storage
            .abort_multipart(&session.bucket, &session.key, &session.upload_id)
            .await
        {
            Ok(()) => info!("Aborted multipart upload {}", session.upload_id),
            Err(e) => warn!(
                "Failed to abort multipart upload {}: {}",
                session.upload_id, e
            ),
        }
        session.mark_aborted();
    }
}
