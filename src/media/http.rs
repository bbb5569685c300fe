//! Media source for direct HTTP(S) media links.
//!
//! The link is fetched with a plain `GET`. The host becomes the owner id and
//! the file name (without extension) the media id, so
//! `https://cdn.example.com/videos/intro.mp4` is archived as
//! `cdn.example.com/intro.mp4`.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, info};
use reqwest::Url;

use crate::constants::DEFAULT_CONNECTION_TIMEOUT_SECS;
use crate::error::ArchiveError;
use crate::media::stream::{rechunk, ChunkReader};
use crate::media::{MediaDescriptor, MediaSource};

/// Streams media from direct links over HTTP.
pub struct HttpMediaSource {
    client: reqwest::Client,
    chunk_size: usize,
}

impl HttpMediaSource {
    /// Create a source that hands out chunks of `chunk_size` bytes.
    pub fn new(chunk_size: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECTION_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, chunk_size })
    }

    /// Derive `(owner_id, media_id)` from a direct media link.
    pub fn media_identity(link: &str) -> Result<(String, String), ArchiveError> {
        let url = Url::parse(link).map_err(|e| ArchiveError::resolution(link, e))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ArchiveError::resolution(
                link,
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        let owner_id = url
            .host_str()
            .ok_or_else(|| ArchiveError::resolution(link, "link has no host"))?
            .to_string();

        let file_name = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .ok_or_else(|| ArchiveError::resolution(link, "link has no file name"))?;

        let media_id = match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => file_name,
        };

        Ok((owner_id, media_id.to_string()))
    }
}

#[async_trait]
impl MediaSource for HttpMediaSource {
    async fn resolve(&self, link: &str) -> Result<MediaDescriptor, ArchiveError> {
        let (owner_id, media_id) = Self::media_identity(link)?;

        let response = self
            .client
            .get(link)
            .send()
            .await
            .map_err(|e| ArchiveError::resolution(link, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArchiveError::resolution(
                link,
                format!("download failed with status: {}", status),
            ));
        }

        let byte_length = response.content_length().ok_or_else(|| {
            ArchiveError::resolution(link, "response does not advertise a Content-Length")
        })?;

        info!("Resolved {} to {}/{} ({} bytes)", link, owner_id, media_id, byte_length);
        debug!("Streaming {} in {} byte chunks", link, self.chunk_size);

        let frames = response
            .bytes_stream()
            .map(|frame| frame.map_err(|e| io::Error::new(io::ErrorKind::Other, e)))
            .boxed();

        Ok(MediaDescriptor {
            owner_id,
            media_id,
            byte_length,
            stream: ChunkReader::new(rechunk(frames, self.chunk_size)),
        })
    }
}
