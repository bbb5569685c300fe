//! Shared fakes for the integration tests.
//!
//! `RecordingStorage` keeps every backend call in order and can be told to
//! fail a specific call. `StaticSource` hands out canned media.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};

use video_vault::error::{ArchiveError, StorageOperation, TransferError};
use video_vault::media::{ChunkReader, MediaDescriptor, MediaSource};
use video_vault::models::PartRecord;
use video_vault::storage::ObjectStorage;

pub const UPLOAD_ID: &str = "upload-0001";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open {
        bucket: String,
        key: String,
        content_type: String,
    },
    UploadPart {
        upload_id: String,
        part_number: u32,
        body: Bytes,
        checksum: String,
    },
    Complete {
        upload_id: String,
        parts: Vec<PartRecord>,
    },
    Abort {
        upload_id: String,
    },
    Put {
        bucket: String,
        key: String,
        body: Bytes,
        content_type: String,
    },
}

#[derive(Default)]
pub struct RecordingStorage {
    calls: Mutex<Vec<Call>>,
    fail_open: Option<String>,
    fail_part: Option<u32>,
    fail_complete: bool,
    fail_abort: bool,
    fail_put: bool,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_open(mut self, message: &str) -> Self {
        self.fail_open = Some(message.to_string());
        self
    }

    pub fn failing_part(mut self, part_number: u32) -> Self {
        self.fail_part = Some(part_number);
        self
    }

    pub fn failing_complete(mut self) -> Self {
        self.fail_complete = true;
        self
    }

    pub fn failing_abort(mut self) -> Self {
        self.fail_abort = true;
        self
    }

    pub fn failing_put(mut self) -> Self {
        self.fail_put = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn part_numbers(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::UploadPart { part_number, .. } => Some(part_number),
                _ => None,
            })
            .collect()
    }

    pub fn opens(&self) -> usize {
        self.count(|c| matches!(c, Call::Open { .. }))
    }

    pub fn aborts(&self) -> usize {
        self.count(|c| matches!(c, Call::Abort { .. }))
    }

    pub fn completes(&self) -> usize {
        self.count(|c| matches!(c, Call::Complete { .. }))
    }

    pub fn puts(&self) -> usize {
        self.count(|c| matches!(c, Call::Put { .. }))
    }

    /// Manifest of the (single) commit call.
    pub fn committed_parts(&self) -> Option<Vec<PartRecord>> {
        self.calls().into_iter().find_map(|call| match call {
            Call::Complete { parts, .. } => Some(parts),
            _ => None,
        })
    }

    fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn open_multipart(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
    ) -> Result<String, TransferError> {
        self.record(Call::Open {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
        });
        match &self.fail_open {
            Some(message) => Err(TransferError::new(StorageOperation::OpenMultipart, message)),
            None => Ok(UPLOAD_ID.to_string()),
        }
    }

    async fn upload_part(
        &self,
        _bucket: &str,
        _key: &str,
        upload_id: &str,
        part_number: u32,
        body: Bytes,
        checksum: &str,
    ) -> Result<String, TransferError> {
        self.record(Call::UploadPart {
            upload_id: upload_id.to_string(),
            part_number,
            body,
            checksum: checksum.to_string(),
        });
        if self.fail_part == Some(part_number) {
            return Err(
                TransferError::new(StorageOperation::UploadPart, "InternalError").for_part(part_number),
            );
        }
        Ok(format!("\"etag-{}\"", part_number))
    }

    async fn complete_multipart(
        &self,
        _bucket: &str,
        _key: &str,
        upload_id: &str,
        parts: &[PartRecord],
    ) -> Result<(), TransferError> {
        self.record(Call::Complete {
            upload_id: upload_id.to_string(),
            parts: parts.to_vec(),
        });
        if self.fail_complete {
            return Err(TransferError::new(
                StorageOperation::CompleteMultipart,
                "InvalidPartOrder",
            ));
        }
        Ok(())
    }

    async fn abort_multipart(
        &self,
        _bucket: &str,
        _key: &str,
        upload_id: &str,
    ) -> Result<(), TransferError> {
        self.record(Call::Abort {
            upload_id: upload_id.to_string(),
        });
        if self.fail_abort {
            return Err(TransferError::new(StorageOperation::AbortMultipart, "NoSuchUpload"));
        }
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), TransferError> {
        self.record(Call::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body,
            content_type: content_type.to_string(),
        });
        if self.fail_put {
            return Err(TransferError::new(StorageOperation::PutObject, "RequestTimeout"));
        }
        Ok(())
    }
}

/// `count` chunks of `size` bytes, chunk `i` filled with byte `i`.
pub fn chunks(count: usize, size: usize) -> Vec<Bytes> {
    (0..count)
        .map(|i| Bytes::from(vec![i as u8; size]))
        .collect()
}

pub fn reader(count: usize, size: usize) -> ChunkReader {
    ChunkReader::from_chunks(chunks(count, size))
}

/// Reader that yields `good_chunks` chunks of `size` bytes, then panics.
pub fn panicking_reader(good_chunks: usize, size: usize) -> ChunkReader {
    let frames = stream::iter(0..=good_chunks).map(move |i| {
        if i == good_chunks {
            panic!("media stream broke after {} chunks", good_chunks);
        }
        Ok::<_, io::Error>(Bytes::from(vec![i as u8; size]))
    });
    ChunkReader::new(frames.boxed())
}

/// Canned media for the source to hand out.
#[derive(Clone)]
pub struct CannedMedia {
    pub owner_id: String,
    pub media_id: String,
    pub byte_length: u64,
    pub chunks: Vec<Bytes>,
}

/// Media source answering from a fixed table; unknown links fail to resolve.
#[derive(Default)]
pub struct StaticSource {
    media: HashMap<String, CannedMedia>,
    resolves: AtomicUsize,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_media(mut self, link: &str, media: CannedMedia) -> Self {
        self.media.insert(link.to_string(), media);
        self
    }

    pub fn resolves(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaSource for StaticSource {
    async fn resolve(&self, link: &str) -> Result<MediaDescriptor, ArchiveError> {
        self.resolves.fetch_add(1, Ordering::SeqCst);

        let media = self
            .media
            .get(link)
            .ok_or_else(|| ArchiveError::resolution(link, "video unavailable"))?;

        Ok(MediaDescriptor {
            owner_id: media.owner_id.clone(),
            media_id: media.media_id.clone(),
            byte_length: media.byte_length,
            stream: ChunkReader::from_chunks(media.chunks.clone()),
        })
    }
}
