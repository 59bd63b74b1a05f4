//! Decoded-audio cache
//!
//! Maps string keys to decoded buffers. Decoding happens upstream; this is
//! only the lookup surface sounds resolve their data through at
//! construction time.

use std::collections::HashMap;
use std::sync::Arc;

use crate::graph::AudioBuffer;

/// Cache of decoded audio buffers by key
#[derive(Default)]
pub struct AudioCache {
    entries: HashMap<String, Arc<AudioBuffer>>,
}

impl AudioCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Store a decoded buffer under a key, replacing any previous entry
    pub fn insert<S: Into<String>>(&mut self, key: S, buffer: AudioBuffer) -> Arc<AudioBuffer> {
        let key = key.into();
        let buffer = Arc::new(buffer);
        log::debug!(
            "Cached audio '{}' ({:.3}s, {} ch)",
            key,
            buffer.duration(),
            buffer.channels()
        );
        self.entries.insert(key, Arc::clone(&buffer));
        buffer
    }

    /// Look up a decoded buffer by key
    pub fn get(&self, key: &str) -> Option<Arc<AudioBuffer>> {
        self.entries.get(key).map(Arc::clone)
    }

    /// Check if a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an entry, returning the buffer if it was present
    pub fn remove(&mut self, key: &str) -> Option<Arc<AudioBuffer>> {
        self.entries.remove(key)
    }

    /// Get the number of cached buffers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut cache = AudioCache::new();
        assert!(cache.is_empty());

        cache.insert("beep", AudioBuffer::silent(1.0, 1, 1000));
        assert!(cache.contains("beep"));
        assert_eq!(cache.len(), 1);

        let buffer = cache.get("beep").unwrap();
        assert_eq!(buffer.frame_count(), 1000);
    }

    #[test]
    fn test_missing_key() {
        let cache = AudioCache::new();
        assert!(cache.get("nope").is_none());
    }

    #[test]
    fn test_remove() {
        let mut cache = AudioCache::new();
        cache.insert("beep", AudioBuffer::silent(1.0, 1, 1000));
        assert!(cache.remove("beep").is_some());
        assert!(!cache.contains("beep"));
    }
}
