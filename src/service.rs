//! The archive pipeline: link in, [`TransferReport`] out.

use std::sync::Arc;

use log::{error, info, warn};

use crate::config::ArchiverConfig;
use crate::error::ArchiveError;
use crate::media::{HttpMediaSource, MediaSource};
use crate::models::{TransferRequest, UploadOutcome};
use crate::report::{MediaSummary, TransferReport};
use crate::storage::client::create_s3_client;
use crate::storage::{ObjectStorage, S3Storage};
use crate::upload::{UploadRouter, UploadSettings};

/// Resolves links and archives the media behind them into one bucket.
#[derive(Clone)]
pub struct Archiver {
    source: Arc<dyn MediaSource>,
    router: UploadRouter,
    bucket: Option<String>,
}

impl Archiver {
    pub fn new(
        source: Arc<dyn MediaSource>,
        storage: Arc<dyn ObjectStorage>,
        settings: UploadSettings,
        bucket: Option<String>,
    ) -> Self {
        Archiver {
            source,
            router: UploadRouter::new(storage, settings),
            bucket,
        }
    }

    /// Wire the HTTP media source and the S3 backend from configuration.
    pub fn from_config(config: &ArchiverConfig) -> anyhow::Result<Self> {
        let client = create_s3_client(
            config.region.as_deref(),
            config.profile.as_deref(),
            config.endpoint.as_deref(),
        )?;
        let settings = config.upload_settings();
        let source = HttpMediaSource::new(settings.chunk_size)?;

        Ok(Archiver::new(
            Arc::new(source),
            Arc::new(S3Storage::new(client)),
            settings,
            config.bucket_name.clone(),
        ))
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// Archive the media behind `link`. Every failure is folded into the report.
    pub async fn archive(&self, link: &str) -> TransferReport {
        let request = match TransferRequest::new(link, self.bucket.as_deref()) {
            Ok(request) => request,
            Err(e) => {
                error!("{}", e);
                return TransferReport::failed(link, None, &e);
            }
        };
        let link = request.source_link.as_str();
        let bucket = request.destination_bucket.as_str();

        let descriptor = match self.source.resolve(link).await {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!("{}", e);
                return TransferReport::failed(link, Some(bucket), &e);
            }
        };

        let media = MediaSummary::from(&descriptor);
        info!("Uploading {} to {} in bucket {}", link, media.key, bucket);

        let router = self.router.clone();
        let task_bucket = bucket.to_string();
        let task_key = media.key.clone();
        let byte_length = descriptor.byte_length;
        let reader = descriptor.stream;

        // Own task so a panic in the upload path cannot take the caller down.
        let outcome = tokio::spawn(async move {
            router
                .route(&task_bucket, &task_key, byte_length, reader)
                .await
        })
        .await
        .unwrap_or_else(|e| {
            UploadOutcome::Failure(ArchiveError::MalformedResult {
                detail: e.to_string(),
            })
        });

        match outcome.into_result() {
            Ok(_) => {
                let report = TransferReport::success(link, bucket, &media);
                info!("{}", report.message);
                report
            }
            Err(e) => {
                if e.is_internal() {
                    error!("Upload task for {} failed: {}", link, e);
                }
                let report = TransferReport::upload_failed(link, bucket, &media, &e);
                error!("{}", report.message);
                report
            }
        }
    }
}
