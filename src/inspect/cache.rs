/// Bounded preview buffer cache
///
/// Decoded previews are large, so the inspector keeps at most `capacity` of
/// them, keyed by path, evicting the least recently used buffer when a new
/// one needs room. Buffers are shared (`Arc`): eviction never invalidates a
/// handle a caller is still holding.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::buffer::InspectorBuffer;
use crate::preview::{PreviewDecoder, SizeHint};

struct Entry {
    buffer: Arc<InspectorBuffer>,
    last_used: u64,
}

struct CacheInner {
    entries: HashMap<PathBuf, Entry>,
    // Monotonic recency counter; higher = more recently used
    tick: u64,
}

impl CacheInner {
    /// Bump `path` to most-recently-used and return its buffer
    fn promote(&mut self, path: &Path) -> Option<Arc<InspectorBuffer>> {
        let tick = self.tick + 1;
        match self.entries.get_mut(path) {
            Some(entry) => {
                self.tick = tick;
                entry.last_used = tick;
                Some(entry.buffer.clone())
            }
            None => None,
        }
    }

    /// Insert under the LRU discipline, evicting until there is room
    fn insert(&mut self, path: PathBuf, buffer: Arc<InspectorBuffer>, capacity: usize) {
        while self.entries.len() >= capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(path, _)| path.clone());
            match oldest {
                Some(path) => {
                    self.entries.remove(&path);
                }
                None => break,
            }
        }
        self.tick += 1;
        self.entries.insert(
            path,
            Entry {
                buffer,
                last_used: self.tick,
            },
        );
    }
}

/// Fixed-capacity, path-keyed cache of decoded previews
pub struct BufferCache {
    capacity: usize,
    decoder: Arc<dyn PreviewDecoder>,
    inner: Mutex<CacheInner>,
}

impl BufferCache {
    /// Create a cache holding at most `capacity` buffers (minimum 1)
    pub fn new(capacity: usize, decoder: Arc<dyn PreviewDecoder>) -> Self {
        BufferCache {
            capacity: capacity.max(1),
            decoder,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                tick: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Is `path` resident? Does not affect recency.
    pub fn contains(&self, path: &Path) -> bool {
        self.lock().entries.contains_key(path)
    }

    /// Return the buffer for `path`, decoding it on a miss.
    ///
    /// A hit refreshes the entry's recency. A decode failure returns None
    /// and leaves the cache untouched — no placeholder is retained.
    pub fn get(&self, path: &Path, hint: SizeHint) -> Option<Arc<InspectorBuffer>> {
        if let Some(buffer) = self.lock().promote(path) {
            return Some(buffer);
        }

        // Decode outside the lock; the decoder is caller-supplied code and
        // may take arbitrarily long. Two threads racing on the same path may
        // both decode; the loser's buffer is simply dropped.
        let buffer = Arc::new(InspectorBuffer::load(path, hint, self.decoder.as_ref())?);

        let mut inner = self.lock();
        if let Some(existing) = inner.promote(path) {
            return Some(existing);
        }
        inner.insert(path.to_path_buf(), buffer.clone(), self.capacity);
        Some(buffer)
    }

    /// Warm the cache for `path`, discarding the buffer. Preloading a
    /// resident path only bumps its recency; the decoder is not invoked.
    pub fn preload(&self, path: &Path, hint: SizeHint) {
        let _ = self.get(path, hint);
    }

    /// Drop every entry unconditionally. Buffers still referenced by
    /// callers stay alive until those references are released.
    pub fn invalidate_all(&self) {
        self.lock().entries.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        self.inner.lock().expect("inspector cache mutex poisoned")
    }
}
