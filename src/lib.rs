//! # video-vault
//!
//! Archives videos into S3-compatible object storage by streaming them
//! straight from their source, without staging them on local disk.
//!
//! ## Overview
//!
//! A link is resolved by a [`media::MediaSource`] into identifiers, an
//! advertised byte length and a chunked byte stream. Short media is stored
//! with a single `PutObject`; anything at or above
//! [`constants::MULTIPART_THRESHOLD`] is streamed as a multipart upload, one
//! checksummed part per chunk. A failed multipart upload is always aborted
//! so no orphaned parts are left behind. Every request ends in a
//! [`report::TransferReport`], never in a panic.
//!
//! ## Usage
//!
//! ```no_run
//! use video_vault::config::ArchiverConfig;
//! use video_vault::service::Archiver;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut config = ArchiverConfig::default();
//! config.bucket_name = Some("my-video-archive".to_string());
//!
//! let archiver = Archiver::from_config(&config)?;
//! let report = archiver.archive("https://cdn.example.com/videos/intro.mp4").await;
//!
//! println!("{}", report.message);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`config`]: YAML configuration with environment and CLI overrides
//! - [`media`]: Link resolution and chunked media streams
//! - [`storage`]: Object storage contract and the S3 implementation
//! - [`upload`]: Single-shot and multipart upload strategies
//! - [`service`]: The end-to-end archive pipeline
//! - [`report`]: Caller-facing transfer reports
//! - [`server`]: HTTP front end
//! - [`constants`]: Application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Configuration loading and overrides
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Error types for the archive pipeline
pub mod error;

/// Media sources and chunk streams
pub mod media;

/// Core data models shared by the upload layer
pub mod models;

/// Transfer reports returned to callers
pub mod report;

/// HTTP server exposing the archive pipeline
pub mod server;

/// The archive pipeline
pub mod service;

/// Object storage integration (S3)
pub mod storage;

/// Upload strategies
pub mod upload;
