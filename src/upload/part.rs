use bytes::Bytes;
use log::warn;
use tokio::time::sleep;

use crate::error::TransferError;
use crate::models::{PartRecord, UploadSession};
use crate::storage::ObjectStorage;
use crate::upload::retry::RetryPolicy;

/// Uploads single numbered parts into an open multipart session.
pub struct PartUploader<'a> {
    storage: &'a dyn ObjectStorage,
    retry: RetryPolicy,
}

impl<'a> PartUploader<'a> {
    pub fn new(storage: &'a dyn ObjectStorage, retry: RetryPolicy) -> Self {
        PartUploader { storage, retry }
    }

    /// Upload one chunk with its checksum and return the part's completion record.
    ///
    /// With the default [`RetryPolicy`] the backend is called exactly once.
    pub async fn upload(
        &self,
        session: &UploadSession,
        part_number: u32,
        chunk: Bytes,
        checksum: &str,
    ) -> Result<PartRecord, TransferError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result = self
                .storage
                .upload_part(
                    &session.bucket,
                    &session.key,
                    &session.upload_id,
                    part_number,
                    chunk.clone(),
                    checksum,
                )
                .await;

            match result {
                Ok(completion_token) => {
                    return Ok(PartRecord {
                        part_number,
                        completion_token,
                    })
                }
                Err(e) if attempt < self.retry.max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    warn!(
                        "Part {} upload attempt {} failed, retrying in {:?}: {}",
                        part_number, attempt, delay, e
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
