use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::debug;

use crate::config::SNAPSHOT_FILE_NAME;
use crate::error::Result;

/// Opaque reference to a persisted snapshot, threaded through calls instead
/// of relying on an implicit well-known path.
#[derive(Debug, Clone)]
pub struct SnapshotHandle {
    path: PathBuf,
}

impl SnapshotHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Owns the scratch location for downloaded snapshots. At most one snapshot
/// is retained: each persist writes to a unique temp path and atomically
/// renames it over the slot, so a reader never observes a partial write.
#[derive(Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
    seq: AtomicU64,
}

impl SnapshotStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, seq: AtomicU64::new(0) }
    }

    /// Write `bytes` into the snapshot slot, replacing the previous copy.
    pub async fn persist(&self, bytes: &[u8]) -> Result<SnapshotHandle> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .dir
            .join(format!("{SNAPSHOT_FILE_NAME}.tmp-{}-{seq}", std::process::id()));
        let slot = self.dir.join(SNAPSHOT_FILE_NAME);

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &slot).await?;
        debug!("persisted snapshot: {} bytes at {}", bytes.len(), slot.display());

        Ok(SnapshotHandle { path: slot })
    }

    /// Open the persisted snapshot as a read-only SQLite pool. The file is
    /// never modified in place (replacement is an atomic rename), so it is
    /// opened as immutable. A file that is not a database surfaces as
    /// `QueryError::Corrupt`, here or on the first query.
    pub async fn open(&self, handle: &SnapshotHandle) -> Result<SqlitePool> {
        let opts = SqliteConnectOptions::new()
            .filename(handle.path())
            .read_only(true)
            .immutable(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(crate::db::classify_sqlite_error)?;
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> PathBuf {
        let n = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("livescore-store-test-{n}"))
    }

    #[tokio::test]
    async fn persist_overwrites_previous_snapshot() {
        let dir = scratch();
        let store = SnapshotStore::new(dir.clone());

        let first = store.persist(b"first").await.unwrap();
        let second = store.persist(b"second").await.unwrap();

        assert_eq!(first.path(), second.path());
        let contents = tokio::fs::read(second.path()).await.unwrap();
        assert_eq!(contents, b"second");

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn persist_leaves_no_temp_files_behind() {
        let dir = scratch();
        let store = SnapshotStore::new(dir.clone());
        store.persist(b"data").await.unwrap();

        let mut entries = tokio::fs::read_dir(&dir).await.unwrap();
        let mut names = Vec::new();
        while let Some(e) = entries.next_entry().await.unwrap() {
            names.push(e.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec![SNAPSHOT_FILE_NAME.to_string()]);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
