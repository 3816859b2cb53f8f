use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::cache::SnapshotLoader;
use crate::config::Config;
use crate::db::reader::load_events;
use crate::error::{AppError, FetchError, Result};
use crate::fetcher::{fetch_snapshot, snapshot_client};
use crate::reduce::{recent_window, reduce_to_latest};
use crate::store::SnapshotStore;
use crate::types::SnapshotData;

/// Production reload pipeline: fetch → persist → open → load → reduce.
///
/// Each stage completes fully before the next starts; the fetch timeout is
/// the only cancellation point. Owned by a single `FreshnessCache`, whose
/// lock already guarantees one reload in flight.
pub struct HttpSnapshotLoader {
    client: reqwest::Client,
    store: SnapshotStore,
    snapshot_url: String,
    history_limit: usize,
}

impl HttpSnapshotLoader {
    pub fn new(cfg: &Config) -> std::result::Result<Self, FetchError> {
        Ok(Self {
            client: snapshot_client(cfg.fetch_timeout_secs)?,
            store: SnapshotStore::new(cfg.scratch_dir.clone()),
            snapshot_url: cfg.snapshot_url.clone(),
            history_limit: cfg.history_limit,
        })
    }

    async fn reload(&self) -> Result<SnapshotData> {
        let bytes = fetch_snapshot(&self.client, &self.snapshot_url).await?;
        let handle = self.store.persist(&bytes).await?;
        let pool = self.store.open(&handle).await?;

        let events = load_events(&pool).await?;
        pool.close().await;
        if events.is_empty() {
            return Err(AppError::EmptyResult);
        }

        let latest = reduce_to_latest(&events);
        let history = recent_window(&events, self.history_limit);
        debug!(
            "reduced {} rows to {} current matches, {} history rows",
            events.len(),
            latest.len(),
            history.len()
        );

        Ok(SnapshotData { latest, history, loaded_at_ts: now_secs() })
    }
}

impl SnapshotLoader for HttpSnapshotLoader {
    fn load(&self) -> impl Future<Output = Result<SnapshotData>> + Send {
        self.reload()
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
