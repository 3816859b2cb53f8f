use std::collections::HashMap;

use crate::types::MatchEvent;

/// Collapse the raw event table to one row per match: the event with the
/// maximum timestamp for that `match_id`.
///
/// Tie-break on equal maximum timestamps: the first row seen in scan order
/// wins. The loader feeds rows in `ORDER BY ts DESC, rowid ASC`, which
/// makes the winner deterministic across reloads; the reduction itself does
/// not require any particular input order.
///
/// Output is sorted by timestamp descending, order-stable among equal
/// timestamps relative to scan order. An empty input yields an empty
/// output, never an error.
pub fn reduce_to_latest(events: &[MatchEvent]) -> Vec<MatchEvent> {
    let mut winners: Vec<MatchEvent> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for ev in events {
        match index.get(ev.match_id.as_str()) {
            Some(&i) => {
                // Strictly greater replaces; equal keeps the first seen.
                if ev.ts > winners[i].ts {
                    winners[i] = ev.clone();
                }
            }
            None => {
                index.insert(ev.match_id.as_str(), winners.len());
                winners.push(ev.clone());
            }
        }
    }

    winners.sort_by(|a, b| b.ts.cmp(&a.ts));
    winners
}

/// The most recent `limit` raw rows, timestamp descending, no dedup.
/// Returns every row when fewer than `limit` are present.
pub fn recent_window(events: &[MatchEvent], limit: usize) -> Vec<MatchEvent> {
    let mut window: Vec<MatchEvent> = events.to_vec();
    window.sort_by(|a, b| b.ts.cmp(&a.ts));
    window.truncate(limit);
    window
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(match_id: &str, ts: i64, score: &str) -> MatchEvent {
        MatchEvent {
            ts,
            match_id: match_id.to_string(),
            league: "Süper Lig".to_string(),
            home: "Home".to_string(),
            away: "Away".to_string(),
            score: score.to_string(),
            minute: "45".to_string(),
            odds: None,
            date: String::new(),
            time: String::new(),
        }
    }

    #[test]
    fn latest_picks_max_ts_per_match() {
        let input = vec![ev("m1", 10, "1-0"), ev("m1", 20, "2-0"), ev("m2", 15, "0-0")];
        let latest = reduce_to_latest(&input);

        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].match_id, "m1");
        assert_eq!(latest[0].ts, 20);
        assert_eq!(latest[0].score, "2-0");
        assert_eq!(latest[1].match_id, "m2");
        assert_eq!(latest[1].ts, 15);
        assert_eq!(latest[1].score, "0-0");
    }

    #[test]
    fn latest_has_one_row_per_match_with_max_ts() {
        let input = vec![
            ev("a", 3, "0-0"),
            ev("b", 9, "1-1"),
            ev("a", 7, "1-0"),
            ev("c", 1, "0-0"),
            ev("b", 2, "0-1"),
            ev("a", 5, "0-0"),
        ];
        let latest = reduce_to_latest(&input);

        assert_eq!(latest.len(), 3);
        for row in &latest {
            let max = input
                .iter()
                .filter(|e| e.match_id == row.match_id)
                .map(|e| e.ts)
                .max()
                .unwrap();
            assert_eq!(row.ts, max, "match {}", row.match_id);
        }
        // Output ordered by ts descending.
        assert!(latest.windows(2).all(|w| w[0].ts >= w[1].ts));
    }

    #[test]
    fn latest_tie_break_keeps_first_seen() {
        let input = vec![ev("m1", 10, "1-0"), ev("m1", 10, "1-1")];
        let latest = reduce_to_latest(&input);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].score, "1-0");
    }

    #[test]
    fn latest_on_empty_input_is_empty() {
        assert!(reduce_to_latest(&[]).is_empty());
    }

    #[test]
    fn window_truncates_and_sorts_descending() {
        let input = vec![ev("m1", 10, "1-0"), ev("m1", 20, "2-0"), ev("m2", 15, "0-0")];
        let window = recent_window(&input, 2);

        assert_eq!(window.len(), 2);
        assert_eq!((window[0].match_id.as_str(), window[0].ts), ("m1", 20));
        assert_eq!((window[1].match_id.as_str(), window[1].ts), ("m2", 15));
    }

    #[test]
    fn window_returns_all_rows_when_short() {
        let input = vec![ev("m1", 10, "1-0")];
        let window = recent_window(&input, 10_000);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn window_is_a_subset_of_input() {
        let input = vec![ev("m1", 10, "1-0"), ev("m2", 30, "0-2"), ev("m1", 20, "2-0")];
        let window = recent_window(&input, 2);
        for row in &window {
            assert!(input.contains(row));
        }
    }
}
