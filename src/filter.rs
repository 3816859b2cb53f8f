use crate::types::{MatchEvent, OddsStatus};

/// Filters applied to the latest-state view before display or export.
/// Mirrors the dashboard controls: league dropdown, odds-status dropdown,
/// "goal-scored matches only" checkbox.
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub league: Option<String>,
    pub odds: Option<OddsStatus>,
    /// Keep only matches with at least one goal. Decided on the parsed
    /// score rather than a "0-0" substring test, which would also drop
    /// scores like "10-0".
    pub goals_only: bool,
}

impl MatchFilter {
    pub fn matches(&self, ev: &MatchEvent) -> bool {
        if let Some(league) = &self.league {
            if &ev.league != league {
                return false;
            }
        }
        if let Some(odds) = self.odds {
            if ev.odds != Some(odds) {
                return false;
            }
        }
        if self.goals_only && !ev.has_goals() {
            return false;
        }
        true
    }

    pub fn apply(&self, events: &[MatchEvent]) -> Vec<MatchEvent> {
        events.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

/// History-tab filter: rows for one display date, capped at `limit`.
/// With no date every row passes (up to the cap).
pub fn filter_history(events: &[MatchEvent], date: Option<&str>, limit: usize) -> Vec<MatchEvent> {
    events
        .iter()
        .filter(|e| date.is_none_or(|d| e.date == d))
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(league: &str, score: &str, odds: Option<OddsStatus>, date: &str) -> MatchEvent {
        MatchEvent {
            ts: 0,
            match_id: "m".to_string(),
            league: league.to_string(),
            home: "H".to_string(),
            away: "A".to_string(),
            score: score.to_string(),
            minute: "10".to_string(),
            odds,
            date: date.to_string(),
            time: String::new(),
        }
    }

    #[test]
    fn league_filter_is_exact() {
        let events = vec![
            ev("Süper Lig", "0-0", None, ""),
            ev("Premier Lig", "0-0", None, ""),
        ];
        let filter = MatchFilter { league: Some("Süper Lig".to_string()), ..Default::default() };
        let out = filter.apply(&events);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].league, "Süper Lig");
    }

    #[test]
    fn odds_filter_skips_unknown_status() {
        let events = vec![
            ev("L", "0-0", Some(OddsStatus::Open), ""),
            ev("L", "0-0", Some(OddsStatus::Closed), ""),
            ev("L", "0-0", None, ""),
        ];
        let filter = MatchFilter { odds: Some(OddsStatus::Open), ..Default::default() };
        assert_eq!(filter.apply(&events).len(), 1);
    }

    #[test]
    fn goals_only_keeps_ten_nil() {
        let events = vec![ev("L", "0-0", None, ""), ev("L", "10-0", None, "")];
        let filter = MatchFilter { goals_only: true, ..Default::default() };
        let out = filter.apply(&events);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].score, "10-0");
    }

    #[test]
    fn history_filters_by_date_and_caps() {
        let events = vec![
            ev("L", "0-0", None, "01.05.2024"),
            ev("L", "1-0", None, "01.05.2024"),
            ev("L", "2-0", None, "02.05.2024"),
        ];
        let out = filter_history(&events, Some("01.05.2024"), 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].score, "0-0");

        let all = filter_history(&events, None, 100);
        assert_eq!(all.len(), 3);
    }
}
