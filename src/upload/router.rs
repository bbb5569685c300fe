use std::sync::Arc;

use log::{info, warn};

use crate::error::ArchiveError;
use crate::media::ChunkReader;
use crate::models::UploadOutcome;
use crate::storage::ObjectStorage;
use crate::upload::multipart::MultipartOrchestrator;
use crate::upload::UploadSettings;

/// Which upload path a stream of a given length takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStrategy {
    SingleShot,
    Multipart,
}

/// Picks the upload path by advertised length and normalizes the result.
#[derive(Clone)]
pub struct UploadRouter {
    storage: Arc<dyn ObjectStorage>,
    settings: UploadSettings,
}

impl UploadRouter {
    pub fn new(storage: Arc<dyn ObjectStorage>, settings: UploadSettings) -> Self {
        UploadRouter { storage, settings }
    }

    /// Lengths strictly below the threshold go single-shot.
    pub fn strategy_for(&self, byte_length: u64) -> UploadStrategy {
        if byte_length < self.settings.multipart_threshold {
            UploadStrategy::SingleShot
        } else {
            UploadStrategy::Multipart
        }
    }

    /// Upload the stream to `bucket/key`. Never panics on storage failures,
    /// they come back as [`UploadOutcome::Failure`].
    pub async fn route(
        &self,
        bucket: &str,
        key: &str,
        byte_length: u64,
        reader: ChunkReader,
    ) -> UploadOutcome {
        let strategy = self.strategy_for(byte_length);
        info!(
            "Uploading {} bytes to s3://{}/{} ({:?})",
            byte_length, bucket, key, strategy
        );

        let result = match strategy {
            UploadStrategy::SingleShot => self.upload_single(bucket, key, reader).await,
            UploadStrategy::Multipart => {
                self.upload_multipart(bucket, key, byte_length, reader)
                    .await
            }
        };

        if let Err(e) = &result {
            warn!("Upload to s3://{}/{} failed: {}", bucket, key, e);
        }

        result.into()
    }

    async fn upload_single(
        &self,
        bucket: &str,
        key: &str,
        reader: ChunkReader,
    ) -> Result<String, ArchiveError> {
        let body = reader.read_to_end().await?;
        self.storage
            .put_object(bucket, key, body, &self.settings.content_type)
            .await?;
        Ok(key.to_string())
    }

    async fn upload_multipart(
        &self,
        bucket: &str,
        key: &str,
        byte_length: u64,
        mut reader: ChunkReader,
    ) -> Result<String, ArchiveError> {
        let orchestrator = MultipartOrchestrator::new(self.storage.as_ref(), &self.settings);
        let completed = orchestrator
            .upload(bucket, key, byte_length, &mut reader)
            .await?;
        Ok(completed.key)
    }
}
