use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use log::{debug, info};
use rusoto_core::ByteStream;
use rusoto_s3::{
    AbortMultipartUploadRequest, CompleteMultipartUploadRequest, CompletedMultipartUpload,
    CompletedPart, CreateMultipartUploadRequest, PutObjectRequest, S3Client, UploadPartRequest, S3,
};

use crate::error::{StorageOperation, TransferError};
use crate::models::PartRecord;
use crate::storage::ObjectStorage;

/// Amazon S3 (or S3-compatible) object storage.
///
/// Thin mapping from [`ObjectStorage`] calls onto rusoto requests. Every
/// part carries its `Content-MD5` so S3 rejects parts corrupted in transit.
#[derive(Clone)]
pub struct S3Storage {
    client: Arc<S3Client>,
}

impl S3Storage {
    pub fn new(client: Arc<S3Client>) -> Self {
        S3Storage { client }
    }
}

/// Request body over the part's own buffer, without copying it.
fn byte_stream(body: Bytes) -> ByteStream {
    let size = body.len();
    ByteStream::new_with_size(stream::once(async move { Ok::<_, std::io::Error>(body) }), size)
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn open_multipart(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
    ) -> Result<String, TransferError> {
        let output = self
            .client
            .create_multipart_upload(CreateMultipartUploadRequest {
                bucket: bucket.to_string(),
                key: key.to_string(),
                content_type: Some(content_type.to_string()),
                ..Default::default()
            })
            .await
            .map_err(|e| TransferError::new(StorageOperation::OpenMultipart, e))?;

        let upload_id = output.upload_id.ok_or_else(|| {
            TransferError::new(StorageOperation::OpenMultipart, "No upload ID returned from S3")
        })?;

        debug!("Started multipart upload with ID: {} for s3://{}/{}", upload_id, bucket, key);
        Ok(upload_id)
    }

    async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: u32,
        body: Bytes,
        checksum: &str,
    ) -> Result<String, TransferError> {
        let request = UploadPartRequest {
            bucket: bucket.to_string(),
            key: key.to_string(),
            upload_id: upload_id.to_string(),
            part_number: i64::from(part_number),
            content_length: Some(body.len() as i64),
            content_md5: Some(checksum.to_string()),
            body: Some(byte_stream(body)),
            ..Default::default()
        };

        let output = self.client.upload_part(request).await.map_err(|e| {
            TransferError::new(StorageOperation::UploadPart, e).for_part(part_number)
        })?;

        output.e_tag.ok_or_else(|| {
            TransferError::new(StorageOperation::UploadPart, "No ETag in upload part response")
                .for_part(part_number)
        })
    }

    async fn complete_multipart(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[PartRecord],
    ) -> Result<(), TransferError> {
        let completed_parts = parts
            .iter()
            .map(|part| CompletedPart {
                e_tag: Some(part.completion_token.clone()),
                part_number: Some(i64::from(part.part_number)),
            })
            .collect();

        self.client
            .complete_multipart_upload(CompleteMultipartUploadRequest {
                bucket: bucket.to_string(),
                key: key.to_string(),
                upload_id: upload_id.to_string(),
                multipart_upload: Some(CompletedMultipartUpload {
                    parts: Some(completed_parts),
                }),
                ..Default::default()
            })
            .await
            .map_err(|e| TransferError::new(StorageOperation::CompleteMultipart, e))?;

        debug!("Completed multipart upload for s3://{}/{}", bucket, key);
        Ok(())
    }

    async fn abort_multipart(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> Result<(), TransferError> {
        self.client
            .abort_multipart_upload(AbortMultipartUploadRequest {
                bucket: bucket.to_string(),
                key: key.to_string(),
                upload_id: upload_id.to_string(),
                ..Default::default()
            })
            .await
            .map_err(|e| TransferError::new(StorageOperation::AbortMultipart, e))?;

        debug!("Aborted multipart upload for s3://{}/{}", bucket, key);
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), TransferError> {
        let size = body.len();
        let start = Instant::now();

        self.client
            .put_object(PutObjectRequest {
                bucket: bucket.to_string(),
                key: key.to_string(),
                content_type: Some(content_type.to_string()),
                content_length: Some(size as i64),
                body: Some(byte_stream(body)),
                ..Default::default()
            })
            .await
            .map_err(|e| TransferError::new(StorageOperation::PutObject, e))?;

        info!(
            "Uploaded {} bytes to s3://{}/{} in {:?}",
            size,
            bucket,
            key,
            start.elapsed()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn test_byte_stream_shares_part_buffer() {
        let body = Bytes::from(vec![7u8; 1024]);
        let frames: Vec<Bytes> = byte_stream(body.clone()).try_collect().await.unwrap();

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], body);
        assert_eq!(frames[0].as_ptr(), body.as_ptr());
    }

    #[tokio::test]
    async fn test_byte_stream_empty_body() {
        let frames: Vec<Bytes> = byte_stream(Bytes::new()).try_collect().await.unwrap();
        assert!(frames.iter().all(|frame| frame.is_empty()));
    }
}
