//! The JSON-serialisable record returned for every archive request.

use serde::Serialize;

use crate::constants::{ERROR_INTERNAL, ERROR_NO_BUCKET, STATUS_OK, STATUS_SERVER_ERROR};
use crate::error::ArchiveError;
use crate::media::MediaDescriptor;

/// Outcome of one archive request as reported to the caller.
///
/// Fields that are unknown on a failure path are left out of the JSON.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    pub message: String,
}

/// What was known about the media when the upload ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSummary {
    pub owner_id: String,
    pub media_id: String,
    pub key: String,
    pub byte_length: u64,
}

impl From<&MediaDescriptor> for MediaSummary {
    fn from(descriptor: &MediaDescriptor) -> Self {
        MediaSummary {
            owner_id: descriptor.owner_id.clone(),
            media_id: descriptor.media_id.clone(),
            key: descriptor.destination_key(),
            byte_length: descriptor.byte_length,
        }
    }
}

impl TransferReport {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Bucket missing: nothing but the status and the message is known.
    pub fn missing_bucket() -> Self {
        TransferReport {
            status: STATUS_SERVER_ERROR,
            youtube_link: None,
            video_id: None,
            channel_id: None,
            file_name: None,
            file_size: None,
            bucket_name: None,
            message: ERROR_NO_BUCKET.to_string(),
        }
    }

    pub fn success(link: &str, bucket: &str, media: &MediaSummary) -> Self {
        Self::with_media(
            STATUS_OK,
            link,
            bucket,
            media,
            format!("{} uploaded to bucket {} at {}.", link, bucket, media.key),
        )
    }

    /// Failure after the media was resolved.
    pub fn upload_failed(link: &str, bucket: &str, media: &MediaSummary, error: &ArchiveError) -> Self {
        Self::with_media(
            STATUS_SERVER_ERROR,
            link,
            bucket,
            media,
            Self::failure_message(link, error),
        )
    }

    /// Failure before any media was resolved.
    pub fn failed(link: &str, bucket: Option<&str>, error: &ArchiveError) -> Self {
        if matches!(error, ArchiveError::Configuration) {
            return Self::missing_bucket();
        }

        TransferReport {
            status: STATUS_SERVER_ERROR,
            youtube_link: Some(link.to_string()),
            video_id: None,
            channel_id: None,
            file_name: None,
            file_size: None,
            bucket_name: bucket.map(str::to_string),
            message: Self::failure_message(link, error),
        }
    }

    fn with_media(status: u16, link: &str, bucket: &str, media: &MediaSummary, message: String) -> Self {
        TransferReport {
            status,
            youtube_link: Some(link.to_string()),
            video_id: Some(media.media_id.clone()),
            channel_id: Some(media.owner_id.clone()),
            file_name: Some(media.key.clone()),
            file_size: Some(media.byte_length),
            bucket_name: Some(bucket.to_string()),
            message,
        }
    }

    fn failure_message(link: &str, error: &ArchiveError) -> String {
        if error.is_internal() {
            ERROR_INTERNAL.to_string()
        } else {
            format!("{} upload failed:\n{}", link, error)
        }
    }
}
