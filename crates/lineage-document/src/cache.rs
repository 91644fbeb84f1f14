//! Parse cache shared by every extraction worker
//!
//! Lookups take the read lock; a miss parses outside any lock and inserts
//! under the write lock. Two workers missing on the same path may both parse
//! it; the first insert wins and the second result is dropped.

use crate::{DocumentError, DocumentStore, DocumentTree};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that had to parse
    pub misses: u64,
    /// Documents currently cached
    pub size: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Human-readable one-liner
    pub fn summary(&self) -> String {
        format!(
            "Parse cache: {} documents, {} hits, {} misses ({:.1}% hit rate)",
            self.size,
            self.hits,
            self.misses,
            self.hit_rate() * 100.0
        )
    }
}

/// Thread-safe cache of parsed documents keyed by absolute path
#[derive(Debug, Default)]
pub struct ParseCache {
    store: DocumentStore,
    entries: RwLock<HashMap<PathBuf, Arc<DocumentTree>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ParseCache {
    /// Create an empty cache over a document store
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached tree for `path`, parsing it on a miss
    pub fn get_or_parse(&self, path: &Path) -> Result<Arc<DocumentTree>, DocumentError> {
        let key = absolute_key(path)?;

        if let Some(doc) = self.entries.read().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(doc));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let parsed = Arc::new(self.store.parse(&key)?);

        let mut entries = self.entries.write();
        let doc = entries.entry(key).or_insert(parsed);
        Ok(Arc::clone(doc))
    }

    /// Whether a document is already cached
    pub fn contains(&self, path: &Path) -> bool {
        absolute_key(path)
            .map(|key| self.entries.read().contains_key(&key))
            .unwrap_or(false)
    }

    /// Parse and cache each path, skipping (and logging) failures
    ///
    /// Returns how many documents ended up cached.
    pub fn preload<I, P>(&self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut loaded = 0;
        for path in paths {
            let path = path.as_ref();
            match self.get_or_parse(path) {
                Ok(_) => loaded += 1,
                Err(e) if e.is_missing() => debug!("Skipping preload: {}", e),
                Err(e) => warn!("Preload failed: {}", e),
            }
        }
        loaded
    }

    /// Parse and cache every `.html` document below `root`
    pub fn preload_dir(&self, root: &Path) -> usize {
        let paths: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
                    .unwrap_or(false)
            })
            .collect();

        let total = paths.len();
        let loaded = self.preload(paths);
        info!("Pre-warmed {}/{} documents under {}", loaded, total, root.display());
        loaded
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.entries.read().len(),
        }
    }

    /// Drop every cached document, keeping the counters
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

fn absolute_key(path: &Path) -> Result<PathBuf, DocumentError> {
    std::path::absolute(path).map_err(|e| DocumentError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_hit_and_miss_counters() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "Metric.html", "<p>metric</p>");
        let cache = ParseCache::default();

        let first = cache.get_or_parse(&path).unwrap();
        let second = cache.get_or_parse(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_documents_are_not_cached() {
        let dir = TempDir::new().unwrap();
        let cache = ParseCache::default();
        let err = cache.get_or_parse(&dir.path().join("Nope.html")).unwrap_err();
        assert!(err.is_missing());
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_preload_dir_only_takes_html() {
        let dir = TempDir::new().unwrap();
        write(&dir, "A.html", "<p>a</p>");
        write(&dir, "B.HTM", "<p>b</p>");
        write(&dir, "notes.txt", "not html");
        let cache = ParseCache::default();

        assert_eq!(cache.preload_dir(dir.path()), 2);
        assert!(cache.contains(&dir.path().join("A.html")));
        assert!(!cache.contains(&dir.path().join("notes.txt")));
    }

    #[test]
    fn test_clear_keeps_counters() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "A.html", "<p>a</p>");
        let cache = ParseCache::default();
        cache.get_or_parse(&path).unwrap();
        cache.clear();
        assert_eq!(cache.stats().size, 0);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_concurrent_lookups_share_one_entry() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "Shared.html", "<p>shared</p>");
        let cache = Arc::new(ParseCache::default());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let path = path.clone();
                thread::spawn(move || cache.get_or_parse(&path).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hits + stats.misses, 8);
        assert!(stats.misses >= 1);
    }
}
