//! End-to-end tests of the archive pipeline: link in, report out.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use common::{chunks, panicking_reader, CannedMedia, RecordingStorage, StaticSource};
use video_vault::error::ArchiveError;
use video_vault::media::{MediaDescriptor, MediaSource};
use video_vault::service::Archiver;
use video_vault::upload::UploadSettings;

const LINK: &str = "https://www.youtube.com/watch?v=abc";

fn archiver(source: Arc<StaticSource>, storage: Arc<RecordingStorage>, bucket: Option<&str>) -> Archiver {
    Archiver::new(
        source,
        storage,
        UploadSettings::default(),
        bucket.map(str::to_string),
    )
}

fn canned(byte_length: u64, data: Vec<Bytes>) -> CannedMedia {
    CannedMedia {
        owner_id: "UC123".to_string(),
        media_id: "abc".to_string(),
        byte_length,
        chunks: data,
    }
}

#[tokio::test]
async fn test_small_video_archived() {
    let source = Arc::new(
        StaticSource::new().with_media(LINK, canned(10, vec![Bytes::from_static(b"hello")])),
    );
    let storage = Arc::new(RecordingStorage::new());

    let report = archiver(source, storage.clone(), Some("bkt")).archive(LINK).await;

    assert!(report.is_success(), "{}", report.message);
    assert_eq!(report.file_name.as_deref(), Some("UC123/abc.mp4"));
    assert_eq!(
        report.message,
        format!("{} uploaded to bucket bkt at UC123/abc.mp4.", LINK)
    );
    assert_eq!(storage.puts(), 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], 200);
    assert_eq!(json["video_id"], "abc");
    assert_eq!(json["channel_id"], "UC123");
    assert_eq!(json["file_size"], 10);
    assert_eq!(json["bucket_name"], "bkt");
    assert_eq!(json["youtube_link"], LINK);
}

#[tokio::test]
async fn test_large_video_archived_in_parts() {
    let source = Arc::new(StaticSource::new().with_media(LINK, canned(6_000_000, chunks(4, 1_500_000))));
    let storage = Arc::new(RecordingStorage::new());

    let report = archiver(source, storage.clone(), Some("bkt")).archive(LINK).await;

    assert!(report.is_success(), "{}", report.message);
    assert_eq!(storage.part_numbers(), vec![1, 2, 3, 4]);
    assert_eq!(storage.completes(), 1);
}

#[tokio::test]
async fn test_open_failure_reported() {
    let source = Arc::new(StaticSource::new().with_media(LINK, canned(10_000_000, chunks(2, 8))));
    let storage = Arc::new(RecordingStorage::new().failing_open("AccessDenied"));

    let report = archiver(source, storage.clone(), Some("bkt")).archive(LINK).await;

    assert_eq!(report.status, 500);
    assert!(report.message.contains("AccessDenied"), "{}", report.message);
    assert!(report.message.starts_with(&format!("{} upload failed:\n", LINK)));
    assert_eq!(report.file_name.as_deref(), Some("UC123/abc.mp4"));
    assert!(storage.part_numbers().is_empty());
    assert_eq!(storage.completes(), 0);
}

#[tokio::test]
async fn test_missing_bucket_never_resolves() {
    let source = Arc::new(StaticSource::new().with_media(LINK, canned(10, chunks(1, 10))));
    let storage = Arc::new(RecordingStorage::new());

    let report = archiver(source.clone(), storage.clone(), None).archive(LINK).await;

    assert_eq!(report.status, 500);
    assert_eq!(report.message, "No AWS Bucket configured on server!");
    assert_eq!(source.resolves(), 0);
    assert!(storage.calls().is_empty());
}

#[tokio::test]
async fn test_resolution_failure_reported() {
    let source = Arc::new(StaticSource::new());
    let storage = Arc::new(RecordingStorage::new());

    let report = archiver(source.clone(), storage.clone(), Some("bkt"))
        .archive("https://www.youtube.com/watch?v=gone")
        .await;

    assert_eq!(report.status, 500);
    assert_eq!(
        report.youtube_link.as_deref(),
        Some("https://www.youtube.com/watch?v=gone")
    );
    assert!(report.message.contains("video unavailable"));
    assert_eq!(source.resolves(), 1);
    assert!(storage.calls().is_empty());
}

#[tokio::test]
async fn test_part_failure_reported_after_abort() {
    let source = Arc::new(StaticSource::new().with_media(LINK, canned(9_000_000, chunks(3, 8))));
    let storage = Arc::new(RecordingStorage::new().failing_part(2).failing_abort());

    let report = archiver(source, storage.clone(), Some("bkt")).archive(LINK).await;

    assert_eq!(report.status, 500);
    assert!(report.message.ends_with("Failed to upload part 2: InternalError"));
    assert_eq!(storage.aborts(), 1);
}

/// Source whose stream panics after two chunks.
struct BrokenStreamSource;

#[async_trait]
impl MediaSource for BrokenStreamSource {
    async fn resolve(&self, _link: &str) -> Result<MediaDescriptor, ArchiveError> {
        Ok(MediaDescriptor {
            owner_id: "UC123".to_string(),
            media_id: "abc".to_string(),
            byte_length: 10_000_000,
            stream: panicking_reader(2, 8),
        })
    }
}

#[tokio::test]
async fn test_stream_panic_reported_and_session_aborted() {
    let storage = Arc::new(RecordingStorage::new());
    let archiver = Archiver::new(
        Arc::new(BrokenStreamSource),
        storage.clone(),
        UploadSettings::default(),
        Some("bkt".to_string()),
    );

    let report = archiver.archive(LINK).await;

    assert_eq!(report.status, 500);
    assert_eq!(report.message, "Internal server error.");
    assert_eq!(storage.opens(), 1);
    assert_eq!(storage.part_numbers(), vec![1, 2]);
    assert_eq!(storage.completes(), 0);
    assert_eq!(storage.aborts(), 1);
}
