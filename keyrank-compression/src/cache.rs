//! Bounded cache for compressed payloads
//!
//! Keys derive from the raw body bytes, the content type, and the encoding,
//! so identical responses negotiated the same way share one entry. When the
//! cache is full the entry with the fewest hits is evicted; ties break by
//! insertion order. One exclusive lock guards the whole map, which keeps
//! hit-counting and eviction atomic under concurrent requests.

use crate::Encoding;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Cache key for a compressed payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Hash of the uncompressed body bytes
    pub content_hash: u64,
    /// Response content type
    pub content_type: String,
    /// Negotiated encoding
    pub encoding: Encoding,
}

impl CacheKey {
    /// Derive a key from response content
    ///
    /// Identical (content, content type, encoding) triples always produce
    /// the same key.
    pub fn new(content: &[u8], content_type: &str, encoding: Encoding) -> Self {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);

        Self {
            content_hash: hasher.finish(),
            content_type: content_type.to_string(),
            encoding,
        }
    }
}

/// A single cached payload
///
/// The cache exclusively owns entries; callers only ever see cheap clones of
/// the payload bytes.
#[derive(Debug)]
struct CacheEntry {
    payload: Bytes,
    /// Used only for eviction ranking
    hits: u64,
    /// Tie-break for eviction: lower means inserted earlier
    sequence: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    next_sequence: u64,
}

/// Bounded store of compressed payloads with least-hit eviction
#[derive(Debug)]
pub struct CompressionCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl CompressionCache {
    /// Create a cache holding at most `capacity` payloads
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Look up the compressed payload for a response
    ///
    /// Bumps the entry's hit counter on a hit.
    pub fn get(&self, content: &[u8], content_type: &str, encoding: Encoding) -> Option<Bytes> {
        let key = CacheKey::new(content, content_type, encoding);

        let mut state = self.state.lock();
        let entry = state.entries.get_mut(&key)?;
        entry.hits += 1;
        Some(entry.payload.clone())
    }

    /// Store a compressed payload
    ///
    /// When the cache is at capacity and the key is new, exactly one
    /// least-hit entry is evicted first. New entries start with one hit.
    pub fn put(&self, content: &[u8], content_type: &str, encoding: Encoding, compressed: Bytes) {
        if self.capacity == 0 {
            return;
        }

        let key = CacheKey::new(content, content_type, encoding);

        let mut state = self.state.lock();
        if let Some(entry) = state.entries.get_mut(&key) {
            entry.payload = compressed;
            return;
        }

        if state.entries.len() >= self.capacity {
            evict_least_hit(&mut state);
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.entries.insert(
            key,
            CacheEntry {
                payload: compressed,
                hits: 1,
                sequence,
            },
        );
    }

    /// Drop every cached payload
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
    }

    /// Number of cached payloads
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of cached payloads
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn evict_least_hit(state: &mut CacheState) {
    let victim = state
        .entries
        .iter()
        .min_by_key(|(_, entry)| (entry.hits, entry.sequence))
        .map(|(key, entry)| (key.clone(), entry.hits));

    if let Some((key, hits)) = victim {
        tracing::debug!(hits, "evicting least-hit compressed payload");
        state.entries.remove(&key);
    }
}
