use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MatchEvent
// ---------------------------------------------------------------------------

/// One observed state of a match at a point in time, as read from the
/// snapshot's `raw` table. Multiple rows may share a `match_id` (polling
/// history); (`match_id`, `ts`) identifies a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Observation time, Unix epoch seconds.
    pub ts: i64,
    pub match_id: String,
    pub league: String,
    pub home: String,
    pub away: String,
    /// Free-text "H-A" score, e.g. "2-0".
    pub score: String,
    /// Match minute as displayed upstream; may be "45+2", so kept as text.
    pub minute: String,
    /// None when the upstream value is not a recognized status.
    pub odds: Option<OddsStatus>,
    /// Upstream display date string (`tarih`), e.g. "01.05.2024".
    pub date: String,
    /// Upstream display time string (`saat`), e.g. "20:31".
    pub time: String,
}

impl MatchEvent {
    /// Parse the "H-A" score into goal counts. Returns None for anything
    /// that is not two dash-separated integers.
    pub fn parsed_score(&self) -> Option<(u32, u32)> {
        parse_score(&self.score)
    }

    /// True when at least one goal has been scored.
    pub fn has_goals(&self) -> bool {
        self.parsed_score().is_some_and(|(h, a)| h + a > 0)
    }

    pub fn odds_label(&self) -> &'static str {
        match self.odds {
            Some(OddsStatus::Open) => "AÇIK",
            Some(OddsStatus::Closed) => "KAPALI",
            None => "-",
        }
    }
}

pub fn parse_score(s: &str) -> Option<(u32, u32)> {
    let (h, a) = s.trim().split_once('-')?;
    Some((h.trim().parse().ok()?, a.trim().parse().ok()?))
}

// ---------------------------------------------------------------------------
// OddsStatus
// ---------------------------------------------------------------------------

/// Whether betting odds are still open for a match. The snapshot stores
/// the Turkish labels "AÇIK" / "KAPALI".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsStatus {
    Open,
    Closed,
}

impl OddsStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "AÇIK" | "ACIK" => Some(OddsStatus::Open),
            "KAPALI" => Some(OddsStatus::Closed),
            s if s.eq_ignore_ascii_case("open") => Some(OddsStatus::Open),
            s if s.eq_ignore_ascii_case("closed") => Some(OddsStatus::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for OddsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OddsStatus::Open => "open",
            OddsStatus::Closed => "closed",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// SnapshotData: the two derived views served by the cache
// ---------------------------------------------------------------------------

/// Result of one full reload. Recomputed on every cache miss and replaced
/// wholesale when a newer snapshot loads; carries no identity of its own.
#[derive(Debug, Clone)]
pub struct SnapshotData {
    /// One row per match: the maximum-timestamp event for that match,
    /// ordered by timestamp descending.
    pub latest: Vec<MatchEvent>,
    /// Most recent raw rows, timestamp descending, no dedup.
    pub history: Vec<MatchEvent>,
    /// Unix epoch seconds at which this snapshot finished loading.
    pub loaded_at_ts: i64,
}

impl SnapshotData {
    /// Maximum observation timestamp in the snapshot (0 when empty).
    pub fn last_update_ts(&self) -> i64 {
        self.latest.first().map_or(0, |e| e.ts)
    }
}
