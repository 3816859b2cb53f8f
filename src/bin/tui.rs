mod tui_app;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use tui_app::{format_time_ts, odds_color_label, truncate, AppState, ConnectionStatus};

use livescore_viewer::types::OddsStatus;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> io::Result<()> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(20))
        .build()
        .expect("failed to build HTTP client");

    let mut app = AppState::new(base_url);

    // Initial fetch before rendering
    app.refresh(&client).await;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut table_state = TableState::default();
    table_state.select(None);

    let result = run_loop(&mut terminal, &mut app, &client, &mut table_state).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    client: &reqwest::Client,
    table_state: &mut TableState,
) -> io::Result<()> {
    let refresh_interval = Duration::from_secs(5);
    let mut last_tick = std::time::Instant::now();

    loop {
        terminal.draw(|f| render(f, app, table_state))?;

        let timeout = refresh_interval
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            app.force_refresh(client).await;
                            last_tick = std::time::Instant::now();
                        }
                        KeyCode::Char('o') | KeyCode::Char('O') => {
                            app.odds_filter = app.odds_filter.next();
                            app.refresh(client).await;
                        }
                        KeyCode::Char('g') | KeyCode::Char('G') => {
                            app.goals_only = !app.goals_only;
                            app.refresh(client).await;
                        }
                        KeyCode::Char('l') | KeyCode::Char('L') => {
                            app.cycle_league();
                            app.refresh(client).await;
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            let max = app.matches.len().saturating_sub(1);
                            let next = table_state.selected().map_or(0, |i| (i + 1).min(max));
                            table_state.select(Some(next));
                        }
                        KeyCode::Up | KeyCode::Char('k') => {
                            let prev = table_state.selected().map_or(0, |i| i.saturating_sub(1));
                            table_state.select(Some(prev));
                        }
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= refresh_interval {
            app.refresh(client).await;
            last_tick = std::time::Instant::now();
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &AppState, table_state: &mut TableState) {
    let area = f.area();

    // Outer vertical split: header | body | footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_body(f, app, table_state, chunks[1]);
    render_footer(f, chunks[2]);
}

fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (status_text, status_color) = match &app.status {
        ConnectionStatus::Connected => ("● connected".to_string(), Color::Green),
        ConnectionStatus::Connecting => ("◌ connecting".to_string(), Color::Yellow),
        ConnectionStatus::Error(e) => (format!("✗ {}", truncate(e, 40)), Color::Red),
    };

    let mut title_spans = vec![
        Span::styled(
            " Canlı Futbol  ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(
            format!("{} live matches", app.matches.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  │  "),
        Span::styled(
            format!("updated {}", format_time_ts(app.last_update_ts)),
            Style::default().fg(Color::White),
        ),
    ];

    if let Some(notice) = &app.notice {
        title_spans.push(Span::raw("  │  "));
        title_spans.push(Span::styled(
            format!("⚠ stale: {}", truncate(notice, 36)),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(title_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(paragraph, area);
}

fn render_body(f: &mut Frame, app: &AppState, table_state: &mut TableState, area: Rect) {
    // Horizontal split: live matches (62%) | stats (38%)
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    render_matches_table(f, app, table_state, halves[0]);
    render_stats_pane(f, app, halves[1]);
}

fn render_matches_table(f: &mut Frame, app: &AppState, state: &mut TableState, area: Rect) {
    let header_cells = ["Time", "League", "Home", "Score", "Away", "Min", "Odds"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .matches
        .iter()
        .map(|m| {
            let has_goals = m.has_goals();
            let score_color = if has_goals { Color::Green } else { Color::White };
            let odds_color = match m.odds {
                Some(OddsStatus::Open) => Color::Green,
                Some(OddsStatus::Closed) => Color::Red,
                None => Color::DarkGray,
            };

            Row::new(vec![
                Cell::from(m.time.clone()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(truncate(&m.league, 18)),
                Cell::from(truncate(&m.home, 16)),
                Cell::from(m.score.clone())
                    .style(Style::default().fg(score_color).add_modifier(Modifier::BOLD)),
                Cell::from(truncate(&m.away, 16)),
                Cell::from(m.minute.clone()).style(Style::default().fg(Color::Cyan)),
                Cell::from(odds_color_label(m.odds)).style(Style::default().fg(odds_color)),
            ])
        })
        .collect();

    let league_label = app.selected_league().unwrap_or("all leagues");
    let title = format!(
        " LIVE MATCHES: {league_label} | odds: {} | goals only: {} ",
        app.odds_filter.label(),
        if app.goals_only { "on" } else { "off" },
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Min(10),
            Constraint::Length(6),
            Constraint::Min(10),
            Constraint::Length(5),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                title,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
    )
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    f.render_stateful_widget(table, area, state);
}

fn render_stats_pane(f: &mut Frame, app: &AppState, area: Rect) {
    // Vertical split: league bar chart | odds + top scores
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_league_chart(f, app, parts[0]);
    render_score_stats(f, app, parts[1]);
}

fn render_league_chart(f: &mut Frame, app: &AppState, area: Rect) {
    let data: Vec<(&str, u64)> = app
        .stats
        .league_counts
        .iter()
        .take(8)
        .map(|(league, count)| (league.as_str(), *count as u64))
        .collect();

    let chart = BarChart::default()
        .data(data.as_slice())
        .bar_width(9)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    " MATCHES BY LEAGUE ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        );

    f.render_widget(chart, area);
}

fn render_score_stats(f: &mut Frame, app: &AppState, area: Rect) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("odds open: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                app.stats.odds_open.to_string(),
                Style::default().fg(Color::Green),
            ),
            Span::raw("   "),
            Span::styled("closed: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                app.stats.odds_closed.to_string(),
                Style::default().fg(Color::Red),
            ),
        ]),
        Line::raw(""),
        Line::styled("most frequent scores:", Style::default().fg(Color::DarkGray)),
    ];

    for (score, count) in app.stats.top_scores.iter().take(6) {
        lines.push(Line::from(vec![
            Span::styled(format!("  {score:>5}  "), Style::default().fg(Color::White)),
            Span::styled(
                "▇".repeat((*count).min(30)),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(format!(" {count}"), Style::default().fg(Color::DarkGray)),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " ODDS & SCORES ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("[r] ", Style::default().fg(Color::Yellow)),
        Span::raw("refresh  "),
        Span::styled("[l] ", Style::default().fg(Color::Yellow)),
        Span::raw("league  "),
        Span::styled("[o] ", Style::default().fg(Color::Yellow)),
        Span::raw("odds  "),
        Span::styled("[g] ", Style::default().fg(Color::Yellow)),
        Span::raw("goals only  "),
        Span::styled("[↑↓ / j k] ", Style::default().fg(Color::Yellow)),
        Span::raw("scroll  "),
        Span::styled("auto-refresh: 5s", Style::default().fg(Color::DarkGray)),
    ]);
    let paragraph = Paragraph::new(line).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}
