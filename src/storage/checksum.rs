use base64::{engine::general_purpose::STANDARD, Engine};

/// Calculate the `Content-MD5` value for a chunk.
///
/// The backend recomputes the digest on receipt and rejects the part when
/// the two differ, so a chunk corrupted in transit never lands in a commit.
pub fn content_md5(chunk: &[u8]) -> String {
    let digest = md5::compute(chunk);
    STANDARD.encode(digest.0)
}
