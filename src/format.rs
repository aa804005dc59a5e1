//! Output rendering helpers: tables, state coloring, humanized times.

use chrono::{DateTime, Utc};
use comfy_table::{presets, Cell, Color, Table};
use serde::Serialize;

/// Plain left-aligned listing table.
pub fn plain_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(headers.to_vec());
    table
}

/// State cell colored the way listings do it.
pub fn state_cell(state: &str) -> Cell {
    match state {
        "Running" | "Partly running" | "Deployed" => Cell::new(state).fg(Color::Green),
        "Stopped" | "Not running" | "Init" => Cell::new(state).fg(Color::Yellow),
        "Stopped with errors" | "Start failed" | "Terminated" => Cell::new(state).fg(Color::Red),
        _ => Cell::new(state),
    }
}

/// Prefix a state with its glyph for compact listings.
pub fn state_glyph(state: &str) -> String {
    match state {
        "Running" | "Partly running" => format!("\u{25B6} {}", state),
        "Init" | "Stopped" => format!("\u{25FC} {}", state),
        "Starting" | "Stopping" | "Scaling" | "Terminating" | "Deploying" => {
            format!("\u{2699} {}", state)
        }
        "Start failed" | "Stopped with errors" => format!("! {}", state),
        "Terminated" => format!("\u{2718} {}", state),
        _ => state.to_string(),
    }
}

/// First 8 characters of a uuid for compact listings.
pub fn short_uuid(uuid: &str) -> &str {
    uuid.get(..8).unwrap_or(uuid)
}

/// "2 hours ago" with single-unit precision.
pub fn humanize_since(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => humanize_since_at(ts, Utc::now()),
        None => String::new(),
    }
}

pub fn humanize_since_at(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds();
    if seconds < 0 {
        return "just now".to_string();
    }
    let (value, unit) = if seconds < 60 {
        (seconds, "second")
    } else if seconds < 3600 {
        (seconds / 60, "minute")
    } else if seconds < 86_400 {
        (seconds / 3600, "hour")
    } else if seconds < 31_536_000 {
        (seconds / 86_400, "day")
    } else {
        (seconds / 31_536_000, "year")
    };
    if value == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", value, unit)
    }
}

/// Pretty-printed JSON dump, used by the inspect commands.
pub fn print_json<T: Serialize>(value: &T) -> crate::error::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_state_glyph() {
        assert_eq!(state_glyph("Running"), "\u{25B6} Running");
        assert_eq!(state_glyph("Stopped"), "\u{25FC} Stopped");
        assert_eq!(state_glyph("Stopping"), "\u{2699} Stopping");
        assert_eq!(state_glyph("Stopped with errors"), "! Stopped with errors");
        assert_eq!(state_glyph("Terminated"), "\u{2718} Terminated");
        assert_eq!(state_glyph("Weird"), "Weird");
    }

    #[test]
    fn test_short_uuid() {
        assert_eq!(short_uuid("7a4cfe51-03bb-42d6-825e-3b533888d8cd"), "7a4cfe51");
        assert_eq!(short_uuid("abc"), "abc");
    }

    #[test]
    fn test_humanize_since_at() {
        let now = Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap();
        let at = |secs: i64| now - chrono::Duration::seconds(secs);

        assert_eq!(humanize_since_at(at(1), now), "1 second ago");
        assert_eq!(humanize_since_at(at(90), now), "1 minute ago");
        assert_eq!(humanize_since_at(at(7200), now), "2 hours ago");
        assert_eq!(humanize_since_at(at(172_800), now), "2 days ago");
        assert_eq!(humanize_since_at(at(63_072_000), now), "2 years ago");
        assert_eq!(humanize_since_at(at(-5), now), "just now");
    }

    #[test]
    fn test_humanize_since_none() {
        assert_eq!(humanize_since(None), "");
    }
}
