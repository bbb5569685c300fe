//! Forward-only chunk reading over a media byte stream.

use std::io;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt};

use crate::error::ArchiveError;

/// A boxed stream of raw chunks as delivered by the source transport.
pub type ChunkStream = BoxStream<'static, io::Result<Bytes>>;

/// Single-pass reader over a [`ChunkStream`].
///
/// End of stream is `Ok(None)`; a transport failure is
/// [`ArchiveError::SourceStream`]. Chunk sizes are whatever the stream
/// yields, the reader only counts them.
pub struct ChunkReader {
    inner: ChunkStream,
    bytes_read: u64,
    finished: bool,
}

impl ChunkReader {
    pub fn new(inner: ChunkStream) -> Self {
        ChunkReader {
            inner,
            bytes_read: 0,
            finished: false,
        }
    }

    /// Reader over an in-memory list of chunks.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
        I::IntoIter: Send + 'static,
    {
        Self::new(stream::iter(chunks.into_iter().map(Ok)).boxed())
    }

    /// Pull the next chunk, or `None` once the stream is exhausted.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, ArchiveError> {
        if self.finished {
            return Ok(None);
        }

        match self.inner.next().await {
            Some(Ok(chunk)) => {
                self.bytes_read += chunk.len() as u64;
                Ok(Some(chunk))
            }
            Some(Err(e)) => {
                self.finished = true;
                Err(ArchiveError::SourceStream {
                    reason: format!("{} (after {} bytes)", e, self.bytes_read),
                })
            }
            None => {
                self.finished = true;
                Ok(None)
            }
        }
    }

    /// Buffer the rest of the stream into one contiguous block.
    pub async fn read_to_end(mut self) -> Result<Bytes, ArchiveError> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = self.next_chunk().await? {
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer.freeze())
    }

    /// Total bytes handed out so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

/// Regroup a transport stream into chunks of exactly `chunk_size` bytes.
///
/// Network frames are usually a few kilobytes, far below the 5MB S3 minimum
/// part size. Every emitted chunk except the last is `chunk_size` long; an
/// error is passed through once and ends the stream.
pub fn rechunk(source: ChunkStream, chunk_size: usize) -> ChunkStream {
    let chunk_size = chunk_size.max(1);
    let state = (source, BytesMut::with_capacity(chunk_size), false);

    stream::unfold(state, move |(mut source, mut buffer, mut done)| async move {
        loop {
            if buffer.len() >= chunk_size {
                let chunk = buffer.split_to(chunk_size).freeze();
                return Some((Ok(chunk), (source, buffer, done)));
            }
            if done {
                if buffer.is_empty() {
                    return None;
                }
                let rest = buffer.split().freeze();
                return Some((Ok(rest), (source, buffer, done)));
            }
            match source.next().await {
                Some(Ok(frame)) => buffer.extend_from_slice(&frame),
                Some(Err(e)) => {
                    buffer.clear();
                    done = true;
                    return Some((Err(e), (source, buffer, done)));
                }
                None => done = true,
            }
        }
    })
    .boxed()
}
