//! Bounded memoisation of fragment merges.
//!
//! Render functions tend to merge the same handful of fragments on every
//! frame, so merges are looked up in a per-thread LRU keyed by the value of
//! both operands. The cache never grows past its capacity.

use super::StyleFragment;
use lru::LruCache;
use std::cell::RefCell;
use std::num::NonZeroUsize;

/// Default number of merge results kept per thread.
pub const MERGE_CACHE_CAPACITY: usize = 512;

type MergeKey = (StyleFragment, StyleFragment);

thread_local! {
    static MERGE_CACHE: RefCell<LruCache<MergeKey, StyleFragment>> =
        RefCell::new(LruCache::new(capacity(MERGE_CACHE_CAPACITY)));
}

/// `n` as a cache capacity, at least one entry.
fn capacity(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN)
}

/// Merge two fragments; fields set in `over` win.
///
/// Results are memoised in a bounded per-thread cache.
pub fn merge(base: &StyleFragment, over: &StyleFragment) -> StyleFragment {
    if *over == StyleFragment::new() {
        return base.clone();
    }
    if *base == StyleFragment::new() {
        return over.clone();
    }

    MERGE_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        let key = (base.clone(), over.clone());
        if let Some(hit) = cache.get(&key) {
            return hit.clone();
        }
        let merged = base.overlay(over);
        cache.put(key, merged.clone());
        merged
    })
}

/// Number of merge results currently cached on this thread.
pub fn merge_cache_len() -> usize {
    MERGE_CACHE.with(|cache| cache.borrow().len())
}
