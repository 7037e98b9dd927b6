// identity.rs — Content-derived entry identity.
//
// An entry is identified by its version plus a short SHA-256 prefix of its
// content: `2.1.22:1a2b3c4d`. The same text under two versions gets two
// identities, and re-fetching a document never changes the identity of an
// unchanged bullet. This string is the only key shared by the diff engine,
// the acknowledgment store and the batch executor.

use sha2::{Digest, Sha256};

/// Number of hex characters of the content hash kept in an identity.
const CONTENT_HASH_LEN: usize = 8;

/// Hash a UTF-8 string, returning a lowercase hex-encoded SHA-256 string.
pub fn hash_str(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Identity of the entry with this version and content.
pub fn entry_id(version: &str, content: &str) -> String {
    let hash = hash_str(content);
    format!("{}:{}", version, &hash[..CONTENT_HASH_LEN])
}
