use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, info, warn};

/// Remembers recently processed `update_id`s so that Telegram's redelivery of
/// an update it did not see acknowledged is not answered twice.
#[derive(Clone)]
pub struct UpdateDeduplicator {
    cache: Arc<DashMap<i64, Instant>>,
    ttl: Duration,
    max_entries: usize,
}

impl UpdateDeduplicator {
    /// Must be called inside a Tokio runtime: a background task sweeps
    /// expired entries once a minute.
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        let deduplicator = Self {
            cache: Arc::new(DashMap::new()),
            ttl,
            max_entries,
        };

        let cleanup_cache = Arc::downgrade(&deduplicator.cache);
        tokio::spawn(async move {
            let mut cleanup_interval = interval(Duration::from_secs(60));
            loop {
                cleanup_interval.tick().await;
                // Stop once every clone of the deduplicator is gone.
                let Some(cache) = cleanup_cache.upgrade() else {
                    break;
                };
                Self::cleanup_expired_entries(&cache, ttl);
            }
        });

        info!("🔄 UpdateDeduplicator initialized with TTL: {:?}, max_entries: {}", ttl, max_entries);
        deduplicator
    }

    /// Returns `true` if the update was already seen; otherwise records it.
    /// The check and the insert happen under one shard lock, so concurrent
    /// deliveries of the same update see exactly one `false`.
    pub fn is_duplicate(&self, update_id: i64) -> bool {
        if self.cache.len() >= self.max_entries {
            warn!("🚫 Update cache full ({} entries), forcing cleanup", self.cache.len());
            Self::cleanup_expired_entries(&self.cache, self.ttl);
        }

        let now = Instant::now();
        match self.cache.entry(update_id) {
            Entry::Occupied(mut entry) => {
                if now.duration_since(*entry.get()) < self.ttl {
                    debug!(update_id, "Duplicate update detected");
                    return true;
                }
                entry.insert(now);
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                false
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.cache.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[cfg(test)]
    fn force_cleanup(&self) {
        Self::cleanup_expired_entries(&self.cache, self.ttl);
    }

    fn cleanup_expired_entries(cache: &DashMap<i64, Instant>, ttl: Duration) {
        let now = Instant::now();
        let initial_size = cache.len();

        cache.retain(|_, seen_at| now.duration_since(*seen_at) < ttl);

        let removed = initial_size.saturating_sub(cache.len());
        if removed > 0 {
            info!(
                "🧹 Cleaned up {} expired update entries (cache: {} -> {})",
                removed,
                initial_size,
                cache.len()
            );
        }
    }
}

impl Default for UpdateDeduplicator {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(300), // 5 minutes TTL
            10000, // 10k max entries
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Duration};

    #[tokio::test]
    async fn test_update_deduplication() {
        let deduplicator = UpdateDeduplicator::new(Duration::from_millis(100), 1000);

        assert!(!deduplicator.is_duplicate(1));
        assert!(deduplicator.is_duplicate(1));
        assert!(!deduplicator.is_duplicate(2));

        sleep(Duration::from_millis(150)).await;

        // After TTL, the same update is processed again
        assert!(!deduplicator.is_duplicate(1));
    }

    #[tokio::test]
    async fn test_force_cleanup() {
        let deduplicator = UpdateDeduplicator::new(Duration::from_millis(50), 100);

        deduplicator.is_duplicate(1);
        deduplicator.is_duplicate(2);
        assert_eq!(deduplicator.len(), 2);

        sleep(Duration::from_millis(100)).await;
        deduplicator.force_cleanup();

        assert!(deduplicator.is_empty());
    }

    #[tokio::test]
    async fn test_full_cache_drops_expired_entries_first() {
        let deduplicator = UpdateDeduplicator::new(Duration::from_millis(50), 2);

        deduplicator.is_duplicate(1);
        deduplicator.is_duplicate(2);
        sleep(Duration::from_millis(100)).await;

        assert!(!deduplicator.is_duplicate(3));
        assert_eq!(deduplicator.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deliveries_are_processed_once() {
        let deduplicator = UpdateDeduplicator::new(Duration::from_secs(60), 1000);

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let deduplicator = deduplicator.clone();
                tokio::spawn(async move { deduplicator.is_duplicate(77) })
            })
            .collect();

        let mut first_deliveries = 0;
        for handle in handles {
            if !handle.await.unwrap() {
                first_deliveries += 1;
            }
        }
        assert_eq!(first_deliveries, 1);
    }
}
