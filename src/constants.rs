//! Global constants for video-vault.
//!
//! This module centralizes all hardcoded values so the upload limits and
//! defaults live in one place.

// Upload routing and multipart limits
/// Objects smaller than this many bytes are uploaded with a single PutObject;
/// anything at or above it goes through a multipart transfer.
pub const MULTIPART_THRESHOLD: u64 = 5_000_000;

/// S3 maximum parts per multipart upload
pub const S3_MAX_PARTS: u32 = 10_000;

/// S3 minimum part size for multipart uploads (5MB, except the last part)
pub const S3_MIN_PART_SIZE: usize = 5 * 1024 * 1024;

/// Default size of the chunks read from a media stream (9MB)
pub const DEFAULT_CHUNK_SIZE: usize = 9 * 1024 * 1024;

/// Content type attached to every archived video
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Extension appended to archived object keys
pub const VIDEO_EXTENSION: &str = "mp4";

// Timeout and retry constants
/// Default number of attempts per part (1 = no retry)
pub const DEFAULT_PART_ATTEMPTS: u32 = 1;

/// Base retry delay in milliseconds
pub const RETRY_BASE_DELAY_MS: u64 = 250;

/// Default connection timeout for media downloads in seconds
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;

// Server defaults
/// Default listen address for the HTTP endpoint
pub const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1:5000";

/// Form field carrying the video link on `POST /`
pub const LINK_FORM_FIELD: &str = "youtube-link";

// Environment variables
pub const ENV_BUCKET_NAME: &str = "BUCKET_NAME";
pub const ENV_AWS_REGION: &str = "AWS_REGION";
pub const ENV_AWS_PROFILE: &str = "AWS_PROFILE";
pub const ENV_S3_ENDPOINT: &str = "S3_ENDPOINT_URL";

// Status codes carried in transfer reports
pub const STATUS_OK: u16 = 200;
pub const STATUS_SERVER_ERROR: u16 = 500;

// Messages
pub const ERROR_NO_BUCKET: &str = "No AWS Bucket configured on server!";
pub const ERROR_INTERNAL: &str = "Internal server error.";

// Default file names
pub const DEFAULT_CONFIG_NAME: &str = "video-vault.yaml";
