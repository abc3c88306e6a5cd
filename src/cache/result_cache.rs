use crate::search::SearchResponse;
use lru::LruCache;
use std::num::NonZeroUsize;

/// LRU cache of search pages keyed by [`crate::search::UnitSearch::cache_key`].
///
/// Any catalog mutation invalidates everything; entries are cheap to rebuild.
/// Each invalidation bumps a generation so a page computed from data read
/// before the mutation is never stored after it.
pub struct ResultCache {
    cache: LruCache<String, SearchResponse>,
    generation: u64,
}

impl ResultCache {
    /// Capacity of zero is bumped to one
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            generation: 0,
        }
    }

    /// Clone out a cached page without touching recency
    pub fn get(&self, key: &str) -> Option<SearchResponse> {
        self.cache.peek(key).cloned()
    }

    pub fn put(&mut self, key: String, value: SearchResponse) {
        self.cache.put(key, value);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Store `value` only if no invalidation happened since `generation`
    pub fn put_if_current(&mut self, generation: u64, key: String, value: SearchResponse) -> bool {
        if generation != self.generation {
            return false;
        }
        self.cache.put(key, value);
        true
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    pub fn invalidate_all(&mut self) {
        self.cache.clear();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(query: &str) -> SearchResponse {
        SearchResponse {
            units: Vec::new(),
            total: 0,
            offset: 0,
            limit: 10,
            query: query.to_string(),
            scope: "all".to_string(),
            elapsed_ms: 0.0,
        }
    }

    #[test]
    fn test_put_get_and_invalidate() {
        let mut cache = ResultCache::new(4);
        cache.put("a".to_string(), response("floor=1"));
        assert_eq!(cache.get("a").unwrap().query, "floor=1");
        assert!(cache.get("b").is_none());

        cache.invalidate_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stale_generation_is_not_stored() {
        let mut cache = ResultCache::new(4);
        let generation = cache.generation();
        cache.invalidate_all();
        assert!(!cache.put_if_current(generation, "a".to_string(), response("a")));
        assert!(cache.is_empty());

        let generation = cache.generation();
        assert!(cache.put_if_current(generation, "a".to_string(), response("a")));
    }

    #[test]
    fn test_evicts_least_recent() {
        let mut cache = ResultCache::new(2);
        cache.put("a".to_string(), response("a"));
        cache.put("b".to_string(), response("b"));
        cache.put("c".to_string(), response("c"));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_zero_capacity_is_usable() {
        let mut cache = ResultCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.put("a".to_string(), response("a"));
        assert_eq!(cache.len(), 1);
    }
}
