//! Content deduplication for fetched page bodies
//!
//! Distinct URLs routinely serve identical content (trailing-slash variants,
//! mirrored paths), so pages are deduplicated by a hash of the raw response
//! body rather than by URL. The store is shared across every fetch task of a
//! crawl session.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::RwLock;

/// SHA-256 fingerprint of a page body
pub type BodyDigest = [u8; 32];

/// Thread-safe set of page-body fingerprints seen during a crawl
///
/// Reads take a shared lock; the check-and-record used on every fetch
/// completion is a single insert under the exclusive lock, so two concurrent
/// fetches of identical content can never both proceed to extraction.
#[derive(Debug, Default)]
pub struct DedupStore {
    seen: RwLock<HashSet<BodyDigest>>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the fingerprint of a raw response body
    pub fn fingerprint(body: &[u8]) -> BodyDigest {
        Sha256::digest(body).into()
    }

    /// Returns true if this fingerprint has already been recorded
    pub fn seen(&self, digest: &BodyDigest) -> bool {
        self.seen.read().unwrap().contains(digest)
    }

    /// Records a fingerprint, returning true only for the first caller
    ///
    /// This is the atomic check-and-set: callers that receive `false` must
    /// skip all further processing of the body.
    pub fn try_record(&self, digest: BodyDigest) -> bool {
        self.seen.write().unwrap().insert(digest)
    }

    /// Number of distinct bodies recorded so far
    pub fn len(&self) -> usize {
        self.seen.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.read().unwrap().is_empty()
    }
}
