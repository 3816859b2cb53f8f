use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::error::Result;
use crate::types::SnapshotData;

/// Runs one full reload of the snapshot pipeline. Implemented by
/// `loader::HttpSnapshotLoader` in production and by mock loaders in tests.
pub trait SnapshotLoader: Send + Sync {
    fn load(&self) -> impl Future<Output = Result<SnapshotData>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
    /// Never loaded, or explicitly invalidated.
    Empty,
    /// Loaded within the TTL.
    Fresh,
    /// A previous load exists but the TTL has elapsed.
    Stale,
}

/// What a caller gets back from `get_or_load`. `data` is the freshest
/// available snapshot, possibly a retained older one when the reload just
/// failed. `notice` carries the surfaced reload error, if any; the caller
/// must show an explicit no-data state when `data` is absent.
#[derive(Debug, Clone)]
pub struct CachedView {
    pub data: Option<Arc<SnapshotData>>,
    pub notice: Option<String>,
    pub state: CacheState,
}

struct Slot {
    data: Option<Arc<SnapshotData>>,
    loaded_at: Option<Instant>,
}

/// Time-boxed memoization of the last successful reload.
///
/// State machine: Empty → Fresh on first successful load; Fresh → Stale
/// once `ttl` elapses; Stale/Empty trigger a synchronous reload on the
/// next `get_or_load`. A failed reload keeps the prior good data and
/// surfaces the error instead of discarding it: stale-but-available beats
/// no data. The slot mutex guarantees at most one reload in flight.
pub struct FreshnessCache<L> {
    loader: L,
    ttl: Duration,
    slot: Mutex<Slot>,
}

impl<L: SnapshotLoader> FreshnessCache<L> {
    pub fn new(loader: L, ttl: Duration) -> Self {
        Self {
            loader,
            ttl,
            slot: Mutex::new(Slot { data: None, loaded_at: None }),
        }
    }

    pub async fn get_or_load(&self) -> CachedView {
        let mut slot = self.slot.lock().await;

        if let Some(at) = slot.loaded_at {
            if at.elapsed() < self.ttl {
                return CachedView {
                    data: slot.data.clone(),
                    notice: None,
                    state: CacheState::Fresh,
                };
            }
        }

        match self.loader.load().await {
            Ok(data) => {
                info!(
                    matches = data.latest.len(),
                    history_rows = data.history.len(),
                    "snapshot reloaded"
                );
                let data = Arc::new(data);
                slot.data = Some(Arc::clone(&data));
                slot.loaded_at = Some(Instant::now());
                CachedView { data: Some(data), notice: None, state: CacheState::Fresh }
            }
            Err(e) => {
                warn!("snapshot reload failed: {e}");
                let state = if slot.loaded_at.is_some() {
                    CacheState::Stale
                } else {
                    CacheState::Empty
                };
                CachedView {
                    data: slot.data.clone(),
                    notice: Some(e.to_string()),
                    state,
                }
            }
        }
    }

    /// Force the next `get_or_load` to reload, regardless of TTL.
    /// The last good data is retained so a failed manual refresh can still
    /// serve something.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        slot.loaded_at = None;
    }

    /// Current state without triggering a reload (for /health).
    pub async fn state(&self) -> CacheState {
        self.peek().await.state
    }

    /// Observe the cache without triggering a reload.
    pub async fn peek(&self) -> CachedView {
        let slot = self.slot.lock().await;
        let state = match slot.loaded_at {
            Some(at) if at.elapsed() < self.ttl => CacheState::Fresh,
            Some(_) => CacheState::Stale,
            None => CacheState::Empty,
        };
        CachedView { data: slot.data.clone(), notice: None, state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::{AppError, FetchError};
    use crate::types::MatchEvent;

    fn snapshot(tag: i64) -> SnapshotData {
        let ev = MatchEvent {
            ts: tag,
            match_id: format!("m{tag}"),
            league: "Lig".to_string(),
            home: "H".to_string(),
            away: "A".to_string(),
            score: "0-0".to_string(),
            minute: "1".to_string(),
            odds: None,
            date: String::new(),
            time: String::new(),
        };
        SnapshotData { latest: vec![ev.clone()], history: vec![ev], loaded_at_ts: tag }
    }

    /// Pops scripted results; `None` entries mean a fetch timeout.
    struct MockLoader {
        calls: AtomicUsize,
        script: std::sync::Mutex<VecDeque<Option<i64>>>,
    }

    impl MockLoader {
        fn new(script: Vec<Option<i64>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                script: std::sync::Mutex::new(script.into()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SnapshotLoader for MockLoader {
        fn load(&self) -> impl Future<Output = Result<SnapshotData>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front().flatten();
            async move {
                match next {
                    Some(tag) => Ok(snapshot(tag)),
                    None => Err(AppError::Fetch(FetchError::Timeout)),
                }
            }
        }
    }

    #[test]
    fn cache_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CacheState::Fresh).unwrap(), "\"fresh\"");
        assert_eq!(serde_json::to_string(&CacheState::Stale).unwrap(), "\"stale\"");
    }

    #[tokio::test(start_paused = true)]
    async fn second_call_within_ttl_is_served_from_cache() {
        let cache =
            FreshnessCache::new(MockLoader::new(vec![Some(1), Some(2)]), Duration::from_secs(10));

        let first = cache.get_or_load().await;
        assert_eq!(first.state, CacheState::Fresh);
        assert_eq!(first.data.unwrap().loaded_at_ts, 1);

        tokio::time::advance(Duration::from_secs(5)).await;
        let second = cache.get_or_load().await;
        assert_eq!(second.data.unwrap().loaded_at_ts, 1);
        assert_eq!(cache.loader.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn call_after_ttl_triggers_exactly_one_reload() {
        let cache =
            FreshnessCache::new(MockLoader::new(vec![Some(1), Some(2)]), Duration::from_secs(10));

        cache.get_or_load().await;
        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(cache.state().await, CacheState::Stale);

        let view = cache.get_or_load().await;
        assert_eq!(view.data.unwrap().loaded_at_ts, 2);
        assert_eq!(cache.loader.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_reload_serves_prior_data_with_notice() {
        let cache =
            FreshnessCache::new(MockLoader::new(vec![Some(1), None]), Duration::from_secs(10));

        cache.get_or_load().await;
        tokio::time::advance(Duration::from_secs(11)).await;

        let view = cache.get_or_load().await;
        assert_eq!(view.state, CacheState::Stale);
        assert_eq!(view.data.unwrap().loaded_at_ts, 1);
        assert!(view.notice.unwrap().contains("timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_with_no_prior_data_is_an_explicit_empty_state() {
        let cache = FreshnessCache::new(MockLoader::new(vec![None]), Duration::from_secs(10));

        let view = cache.get_or_load().await;
        assert_eq!(view.state, CacheState::Empty);
        assert!(view.data.is_none());
        assert!(view.notice.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_a_reload_within_ttl() {
        let cache =
            FreshnessCache::new(MockLoader::new(vec![Some(1), Some(2)]), Duration::from_secs(10));

        cache.get_or_load().await;
        cache.invalidate().await;
        assert_eq!(cache.state().await, CacheState::Empty);

        let view = cache.get_or_load().await;
        assert_eq!(view.data.unwrap().loaded_at_ts, 2);
        assert_eq!(cache.loader.calls(), 2);
    }
}
