//! Row types matching the snapshot's `raw` table. Used by sqlx for typed
//! reads; decoding failures are reported as schema mismatches.

use crate::types::{MatchEvent, OddsStatus};

/// One row of the upstream `raw` table, with the upstream column names.
#[derive(Debug, sqlx::FromRow)]
pub struct RawEventRow {
    pub ts: i64,
    pub mac_id: String,
    pub lig: String,
    pub ev: String,
    pub dep: String,
    pub skor: String,
    pub dakika: String,
    pub oran: String,
    pub tarih: String,
    pub saat: String,
}

impl From<RawEventRow> for MatchEvent {
    fn from(r: RawEventRow) -> Self {
        MatchEvent {
            ts: r.ts,
            match_id: r.mac_id,
            league: r.lig,
            home: r.ev,
            away: r.dep,
            score: r.skor,
            minute: r.dakika,
            odds: OddsStatus::parse(&r.oran),
            date: r.tarih,
            time: r.saat,
        }
    }
}
