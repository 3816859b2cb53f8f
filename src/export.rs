//! Delimited-text renders of the filtered table. CSV for downloads, TSV
//! for pasting into spreadsheet software. Columns and formatting are
//! exactly what the table views display, so exports round-trip the view.

use crate::types::MatchEvent;

pub const DISPLAY_HEADERS: [&str; 8] =
    ["Date", "Time", "League", "Home", "Score", "Away", "Minute", "Odds"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn delimiter(self) -> char {
        match self {
            ExportFormat::Csv => ',',
            ExportFormat::Tsv => '\t',
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Tsv => "text/tab-separated-values; charset=utf-8",
        }
    }

    pub fn ext(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
        }
    }
}

/// The display column values for one event, in header order.
pub fn display_row(ev: &MatchEvent) -> Vec<String> {
    vec![
        ev.date.clone(),
        ev.time.clone(),
        ev.league.clone(),
        ev.home.clone(),
        ev.score.clone(),
        ev.away.clone(),
        ev.minute.clone(),
        ev.odds_label().to_string(),
    ]
}

/// Render events as a delimited document with a header row.
pub fn to_export_string(events: &[MatchEvent], format: ExportFormat) -> String {
    let delim = format.delimiter();
    let mut out = String::new();

    write_row(&mut out, DISPLAY_HEADERS.iter().map(|s| s.to_string()), delim);
    for ev in events {
        write_row(&mut out, display_row(ev).into_iter(), delim);
    }
    out
}

fn write_row(out: &mut String, fields: impl Iterator<Item = String>, delim: char) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(delim);
        }
        first = false;
        out.push_str(&escape_field(&field, delim));
    }
    out.push('\n');
}

/// Quote a field when it contains the delimiter, a quote, or a line break;
/// inner quotes are doubled.
fn escape_field(field: &str, delim: char) -> String {
    if field.contains(delim) || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
