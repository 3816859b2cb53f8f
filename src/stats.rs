use std::collections::HashMap;

use serde::Serialize;

use crate::config::TOP_SCORES_LIMIT;
use crate::types::{MatchEvent, OddsStatus};

/// Aggregates over the latest-state view backing the statistics tab:
/// matches per league, matches per odds status, most frequent scores.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotStats {
    pub total_matches: usize,
    /// (league, match count), count descending then league name ascending.
    pub league_counts: Vec<(String, usize)>,
    pub odds_open: usize,
    pub odds_closed: usize,
    /// (score, match count), top 10, count descending then score ascending.
    pub top_scores: Vec<(String, usize)>,
}

pub fn compute_stats(latest: &[MatchEvent]) -> SnapshotStats {
    let league_counts = ranked_counts(latest.iter().map(|e| e.league.as_str()), usize::MAX);
    let top_scores = ranked_counts(latest.iter().map(|e| e.score.as_str()), TOP_SCORES_LIMIT);

    let odds_open = latest.iter().filter(|e| e.odds == Some(OddsStatus::Open)).count();
    let odds_closed = latest.iter().filter(|e| e.odds == Some(OddsStatus::Closed)).count();

    SnapshotStats {
        total_matches: latest.len(),
        league_counts,
        odds_open,
        odds_closed,
        top_scores,
    }
}

/// Frequency table ordered by count descending, then key ascending so
/// equal counts render the same way on every reload.
fn ranked_counts<'a>(keys: impl Iterator<Item = &'a str>, limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> =
        counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}
