use sqlx::SqlitePool;
use tracing::debug;

use crate::db::classify_sqlite_error;
use crate::db::models::RawEventRow;
use crate::error::Result;
use crate::types::MatchEvent;

/// Load every row of the `raw` table in deterministic scan order:
/// timestamp descending, then rowid ascending. The reducer's tie-break
/// ("first seen wins") depends on this ordering being stable.
pub async fn load_events(pool: &SqlitePool) -> Result<Vec<MatchEvent>> {
    let rows: Vec<RawEventRow> = sqlx::query_as(
        r#"
        SELECT ts, mac_id, lig, ev, dep, skor, dakika, oran, tarih, saat
        FROM raw
        ORDER BY ts DESC, rowid ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(classify_sqlite_error)?;

    debug!("loaded {} raw event rows", rows.len());
    Ok(rows.into_iter().map(MatchEvent::from).collect())
}
