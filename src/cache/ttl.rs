//! Time-bounded snapshot cache with single-flight refresh.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info};

/// A value that can live in a [`TtlCache`].
pub trait Keyed {
    /// Unique key of the value within one snapshot.
    fn key(&self) -> &str;
}

/// Immutable contents of one refresh pass.
#[derive(Debug)]
struct Snapshot<V> {
    entries: Vec<V>,
    index: HashMap<String, usize>,
    last_refresh: Option<Instant>,
    generation: u64,
}

impl<V> Snapshot<V> {
    fn empty(generation: u64) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            last_refresh: None,
            generation,
        }
    }

    fn is_stale(&self, ttl: Duration) -> bool {
        match self.last_refresh {
            None => true,
            Some(at) => at.elapsed() > ttl,
        }
    }
}

impl<V: Keyed> Snapshot<V> {
    /// Later values replace earlier ones with the same key, keeping the
    /// first value's position.
    fn build(values: Vec<V>, generation: u64, refreshed_at: Instant) -> Self {
        let mut entries: Vec<V> = Vec::with_capacity(values.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(values.len());

        for value in values {
            match index.get(value.key()) {
                Some(&pos) => entries[pos] = value,
                None => {
                    index.insert(value.key().to_string(), entries.len());
                    entries.push(value);
                }
            }
        }

        Self {
            entries,
            index,
            last_refresh: Some(refreshed_at),
            generation,
        }
    }
}

/// In-memory cache of keyed values that expires as a whole.
///
/// The cache moves through `Empty → Populated → Stale → Populated`. A
/// refresh replaces every entry; nothing is merged. Refreshes are
/// serialized: concurrent callers that find the cache stale wait for the
/// one in-flight refresh instead of starting their own, and readers only
/// ever see a complete snapshot.
///
/// Every refresh (and [`clear`](TtlCache::clear)) bumps a generation
/// counter so memoized fields computed against an older snapshot can be
/// rejected by [`update_if_current`](TtlCache::update_if_current).
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    state: RwLock<Snapshot<V>>,
    refresh_lock: Mutex<()>,
}

impl<V: Keyed + Clone> TtlCache<V> {
    /// Creates an empty cache whose snapshots stay fresh for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: RwLock::new(Snapshot::empty(0)),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// True when the cache is empty or older than the expiry window.
    pub async fn is_stale(&self) -> bool {
        self.state.read().await.is_stale(self.ttl)
    }

    /// Refreshes the cache with `loader` if it is stale.
    ///
    /// Returns `Ok(true)` if this call performed the refresh. When the
    /// loader fails the previous snapshot and its timestamp are kept.
    pub async fn ensure_fresh<F, Fut, E>(&self, loader: F) -> Result<bool, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<V>, E>>,
    {
        if !self.is_stale().await {
            return Ok(false);
        }

        let _guard = self.refresh_lock.lock().await;
        // Another caller may have refreshed while we waited.
        if !self.is_stale().await {
            debug!("refresh already completed by another caller");
            return Ok(false);
        }

        let values = loader().await?;
        let mut state = self.state.write().await;
        let generation = state.generation + 1;
        *state = Snapshot::build(values, generation, Instant::now());
        info!(entries = state.entries.len(), generation, "cache refreshed");
        Ok(true)
    }

    /// All values in refresh order, with the generation they belong to.
    pub async fn values(&self) -> (Vec<V>, u64) {
        let state = self.state.read().await;
        (state.entries.clone(), state.generation)
    }

    /// The value stored under `key`, with its generation.
    pub async fn get(&self, key: &str) -> Option<(V, u64)> {
        let state = self.state.read().await;
        state
            .index
            .get(key)
            .map(|&pos| (state.entries[pos].clone(), state.generation))
    }

    /// First value satisfying `predicate`, in refresh order.
    pub async fn find<P>(&self, predicate: P) -> Option<(V, u64)>
    where
        P: Fn(&V) -> bool,
    {
        let state = self.state.read().await;
        state
            .entries
            .iter()
            .find(|v| predicate(v))
            .map(|v| (v.clone(), state.generation))
    }

    /// Applies `update` to the value under `key` if the cache is still at
    /// `generation`. Returns whether the update was stored.
    pub async fn update_if_current<F>(&self, key: &str, generation: u64, update: F) -> bool
    where
        F: FnOnce(&mut V),
    {
        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(key, generation, current = state.generation, "dropping stale memo");
            return false;
        }
        match state.index.get(key).copied() {
            Some(pos) => {
                update(&mut state.entries[pos]);
                true
            }
            None => false,
        }
    }

    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// When the current snapshot was built, if ever.
    pub async fn last_refresh(&self) -> Option<Instant> {
        self.state.read().await.last_refresh
    }

    /// Marks the cache stale without dropping its entries.
    pub async fn invalidate(&self) {
        self.state.write().await.last_refresh = None;
    }

    /// Drops every entry and returns the cache to its empty state.
    pub async fn clear(&self) {
        let _guard = self.refresh_lock.lock().await;
        let mut state = self.state.write().await;
        let generation = state.generation + 1;
        *state = Snapshot::empty(generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        key: String,
        value: u32,
        memo: Option<u32>,
    }

    impl Item {
        fn new(key: &str, value: u32) -> Self {
            Self {
                key: key.to_string(),
                value,
                memo: None,
            }
        }
    }

    impl Keyed for Item {
        fn key(&self) -> &str {
            &self.key
        }
    }

    const TTL: Duration = Duration::from_secs(300);

    async fn load(counter: &AtomicUsize, items: Vec<Item>) -> Result<Vec<Item>, String> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(items)
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cache_is_stale() {
        let cache: TtlCache<Item> = TtlCache::new(TTL);
        assert!(cache.is_stale().await);
        assert!(cache.is_empty().await);
        assert!(cache.last_refresh().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_rescan_within_window() {
        let cache = TtlCache::new(TTL);
        let counter = AtomicUsize::new(0);

        let refreshed = cache
            .ensure_fresh(|| load(&counter, vec![Item::new("a", 1)]))
            .await
            .unwrap();
        assert!(refreshed);
        let first = cache.values().await;

        tokio::time::advance(Duration::from_secs(299)).await;
        let refreshed = cache
            .ensure_fresh(|| load(&counter, vec![Item::new("b", 2)]))
            .await
            .unwrap();
        assert!(!refreshed);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(cache.values().await, first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_after_expiry_replaces_everything() {
        let cache = TtlCache::new(TTL);
        let counter = AtomicUsize::new(0);

        cache
            .ensure_fresh(|| load(&counter, vec![Item::new("a", 1), Item::new("b", 2)]))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(301)).await;
        assert!(cache.is_stale().await);

        cache
            .ensure_fresh(|| load(&counter, vec![Item::new("c", 3)]))
            .await
            .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        let (values, generation) = cache.values().await;
        assert_eq!(values, vec![Item::new("c", 3)]);
        assert_eq!(generation, 2);
        assert!(cache.get("a").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_write_wins_keeps_first_position() {
        let cache = TtlCache::new(TTL);
        let counter = AtomicUsize::new(0);
        let items = vec![Item::new("a", 1), Item::new("b", 2), Item::new("a", 3)];

        cache.ensure_fresh(|| load(&counter, items)).await.unwrap();

        let (values, _) = cache.values().await;
        assert_eq!(values, vec![Item::new("a", 3), Item::new("b", 2)]);
        assert_eq!(cache.get("a").await.unwrap().0.value, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_refreshes_are_single_flight() {
        let cache = Arc::new(TtlCache::new(TTL));
        let counter = Arc::new(AtomicUsize::new(0));

        let slow_load = |counter: Arc<AtomicUsize>| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, String>(vec![Item::new("a", 1)])
        };

        let (first, second) = tokio::join!(
            cache.ensure_fresh(|| slow_load(counter.clone())),
            cache.ensure_fresh(|| slow_load(counter.clone())),
        );

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_ne!(first.unwrap(), second.unwrap());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_loader_keeps_previous_snapshot() {
        let cache = TtlCache::new(TTL);
        let counter = AtomicUsize::new(0);
        cache
            .ensure_fresh(|| load(&counter, vec![Item::new("a", 1)]))
            .await
            .unwrap();
        let refreshed_at = cache.last_refresh().await;

        tokio::time::advance(Duration::from_secs(301)).await;
        let result = cache
            .ensure_fresh(|| async { Err::<Vec<Item>, _>("disk on fire".to_string()) })
            .await;

        assert!(result.is_err());
        assert_eq!(cache.last_refresh().await, refreshed_at);
        assert_eq!(cache.get("a").await.unwrap().0, Item::new("a", 1));
        assert_eq!(cache.generation().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_if_current_rejects_old_generation() {
        let cache = TtlCache::new(TTL);
        let counter = AtomicUsize::new(0);
        cache
            .ensure_fresh(|| load(&counter, vec![Item::new("a", 1)]))
            .await
            .unwrap();
        let (_, generation) = cache.get("a").await.unwrap();

        assert!(cache.update_if_current("a", generation, |v| v.memo = Some(9)).await);
        assert_eq!(cache.get("a").await.unwrap().0.memo, Some(9));

        cache.invalidate().await;
        cache
            .ensure_fresh(|| load(&counter, vec![Item::new("a", 1)]))
            .await
            .unwrap();

        assert!(!cache.update_if_current("a", generation, |v| v.memo = Some(7)).await);
        assert_eq!(cache.get("a").await.unwrap().0.memo, None);
        assert!(!cache.update_if_current("zzz", generation + 1, |v| v.memo = Some(1)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_returns_to_empty() {
        let cache = TtlCache::new(TTL);
        let counter = AtomicUsize::new(0);
        cache
            .ensure_fresh(|| load(&counter, vec![Item::new("a", 1)]))
            .await
            .unwrap();

        cache.clear().await;

        assert!(cache.is_empty().await);
        assert!(cache.is_stale().await);
        assert_eq!(cache.generation().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_by_predicate() {
        let cache = TtlCache::new(TTL);
        let counter = AtomicUsize::new(0);
        cache
            .ensure_fresh(|| load(&counter, vec![Item::new("Alpha", 1), Item::new("beta", 2)]))
            .await
            .unwrap();

        let found = cache.find(|v| v.key.eq_ignore_ascii_case("alpha")).await;
        assert_eq!(found.unwrap().0.value, 1);
    }
}
