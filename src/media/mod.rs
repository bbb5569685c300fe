//! Media sources: turning a link into a readable byte stream.
//!
//! A [`MediaSource`] resolves a link to a [`MediaDescriptor`] carrying the
//! identifiers used to name the archived object, the advertised byte length
//! (which decides single-shot vs multipart upload) and a [`ChunkReader`]
//! over the media bytes.

use std::fmt;

use async_trait::async_trait;

use crate::constants::VIDEO_EXTENSION;
use crate::error::ArchiveError;

/// HTTP media source for direct media links
pub mod http;

/// Chunked, forward-only stream reading
pub mod stream;

pub use http::HttpMediaSource;
pub use stream::{rechunk, ChunkReader, ChunkStream};

/// A resolved piece of media, ready to be streamed.
pub struct MediaDescriptor {
    pub owner_id: String,
    pub media_id: String,
    pub byte_length: u64,
    pub stream: ChunkReader,
}

impl MediaDescriptor {
    /// Object key the media is archived under: `{owner_id}/{media_id}.mp4`.
    pub fn destination_key(&self) -> String {
        format!("{}/{}.{}", self.owner_id, self.media_id, VIDEO_EXTENSION)
    }
}

impl fmt::Debug for MediaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaDescriptor")
            .field("owner_id", &self.owner_id)
            .field("media_id", &self.media_id)
            .field("byte_length", &self.byte_length)
            .finish_non_exhaustive()
    }
}

/// Resolves links to downloadable media.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn resolve(&self, link: &str) -> Result<MediaDescriptor, ArchiveError>;
}
