use serde::Deserialize;

use livescore_viewer::types::{MatchEvent, OddsStatus};

// ---------------------------------------------------------------------------
// API response types (mirror api/routes.rs shapes)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MatchesResponse {
    pub matches: Vec<MatchEvent>,
    pub last_update_ts: i64,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[allow(dead_code)]
pub struct StatsResponse {
    pub total_matches: usize,
    pub league_counts: Vec<(String, usize)>,
    pub odds_open: usize,
    pub odds_closed: usize,
    pub top_scores: Vec<(String, usize)>,
    pub last_update_ts: i64,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[allow(dead_code)]
pub struct HealthResponse {
    pub cache_state: Option<String>,
    pub loaded_at_ts: Option<i64>,
    pub match_count: Option<usize>,
    pub history_rows: Option<usize>,
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    Error(String),
}

/// Cycled by the `o` key: all → open only → closed only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OddsFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl OddsFilter {
    pub fn next(self) -> Self {
        match self {
            OddsFilter::All => OddsFilter::Open,
            OddsFilter::Open => OddsFilter::Closed,
            OddsFilter::Closed => OddsFilter::All,
        }
    }

    pub fn query_value(self) -> Option<&'static str> {
        match self {
            OddsFilter::All => None,
            OddsFilter::Open => Some("open"),
            OddsFilter::Closed => Some("closed"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OddsFilter::All => "all",
            OddsFilter::Open => "open",
            OddsFilter::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub status: ConnectionStatus,
    pub matches: Vec<MatchEvent>,
    pub stats: StatsResponse,
    pub notice: Option<String>,
    pub last_update_ts: i64,
    pub odds_filter: OddsFilter,
    pub goals_only: bool,
    /// Index into `league_choices`; 0 = all leagues.
    pub league_idx: usize,
    pub league_choices: Vec<String>,
    pub base_url: String,
}

impl AppState {
    pub fn new(base_url: String) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            matches: Vec::new(),
            stats: StatsResponse::default(),
            notice: None,
            last_update_ts: 0,
            odds_filter: OddsFilter::default(),
            goals_only: false,
            league_idx: 0,
            league_choices: Vec::new(),
            base_url,
        }
    }

    pub fn selected_league(&self) -> Option<&str> {
        if self.league_idx == 0 {
            None
        } else {
            self.league_choices.get(self.league_idx - 1).map(String::as_str)
        }
    }

    pub fn cycle_league(&mut self) {
        self.league_idx = (self.league_idx + 1) % (self.league_choices.len() + 1);
    }

    fn matches_url(&self) -> String {
        let mut url = format!("{}/matches?goals_only={}", self.base_url, self.goals_only);
        if let Some(odds) = self.odds_filter.query_value() {
            url.push_str(&format!("&odds={odds}"));
        }
        if let Some(league) = self.selected_league() {
            url.push_str(&format!("&league={}", urlencode(league)));
        }
        url
    }

    /// Ask the server to drop its cache, then pull the fresh views.
    pub async fn force_refresh(&mut self, client: &reqwest::Client) {
        let _ = client.post(format!("{}/refresh", self.base_url)).send().await;
        self.refresh(client).await;
    }

    pub async fn refresh(&mut self, client: &reqwest::Client) {
        let matches_url = self.matches_url();
        let stats_url = format!("{}/stats/summary", self.base_url);

        let (matches_res, stats_res) = tokio::join!(
            client.get(&matches_url).send(),
            client.get(&stats_url).send(),
        );

        let (matches_resp, stats_resp) = match (matches_res, stats_res) {
            (Ok(m), Ok(s)) => (m, s),
            (Err(e), _) | (_, Err(e)) => {
                self.status = ConnectionStatus::Error(format!("{e}"));
                return;
            }
        };

        let (matches, stats) = tokio::join!(
            matches_resp.json::<MatchesResponse>(),
            stats_resp.json::<StatsResponse>(),
        );

        match (matches, stats) {
            (Ok(m), Ok(s)) => {
                self.matches = m.matches;
                self.last_update_ts = m.last_update_ts;
                self.notice = m.notice;
                // League choices follow the unfiltered stats view so a
                // league filter doesn't shrink its own menu.
                self.league_choices =
                    s.league_counts.iter().map(|(l, _)| l.clone()).collect();
                if self.league_idx > self.league_choices.len() {
                    self.league_idx = 0;
                }
                self.stats = s;
                self.status = ConnectionStatus::Connected;
            }
            (Err(e), _) | (_, Err(e)) => {
                self.status = ConnectionStatus::Error(format!("parse error: {e}"));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Convert an epoch-seconds timestamp to an HH:MM:SS string.
pub fn format_time_ts(ts: i64) -> String {
    if ts <= 0 {
        return "--:--:--".to_string();
    }
    let secs = ts as u64;
    let h = (secs / 3600) % 24;
    let m = (secs / 60) % 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

pub fn odds_color_label(odds: Option<OddsStatus>) -> &'static str {
    match odds {
        Some(OddsStatus::Open) => "AÇIK",
        Some(OddsStatus::Closed) => "KAPALI",
        None => "-",
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

/// Percent-encode the handful of characters that break query strings.
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '&' => out.push_str("%26"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            '%' => out.push_str("%25"),
            '+' => out.push_str("%2B"),
            // Non-ASCII is percent-encoded by the URL parser itself.
            _ => out.push(c),
        }
    }
    out
}

fn main() {
    // Shared module for the tui binary; entry point lives in src/bin/tui.rs
}
