use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

/// `22 Dec 2025`, `22 Des 2025`, `5 December 2025`
static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s+([[:alpha:]]+)\.?\s+(\d{4})$").expect("date pattern is valid")
});

/// Indonesian short month names, as the `id-ID` locale abbreviates them
const SHORT_MONTHS_ID: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Month names recognized by `parse_idea_date`, lowercase, with their number.
const MONTH_NAMES: &[(&str, u32)] = &[
    ("jan", 1),
    ("january", 1),
    ("januari", 1),
    ("feb", 2),
    ("february", 2),
    ("februari", 2),
    ("mar", 3),
    ("march", 3),
    ("maret", 3),
    ("apr", 4),
    ("april", 4),
    ("may", 5),
    ("mei", 5),
    ("jun", 6),
    ("june", 6),
    ("juni", 6),
    ("jul", 7),
    ("july", 7),
    ("juli", 7),
    ("aug", 8),
    ("agu", 8),
    ("agt", 8),
    ("august", 8),
    ("agustus", 8),
    ("sep", 9),
    ("sept", 9),
    ("september", 9),
    ("oct", 10),
    ("okt", 10),
    ("october", 10),
    ("oktober", 10),
    ("nov", 11),
    ("november", 11),
    ("dec", 12),
    ("des", 12),
    ("december", 12),
    ("desember", 12),
];

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTH_NAMES
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, m)| *m)
}

/// Parse a string-encoded idea date.
///
/// Accepts ISO `YYYY-MM-DD` and `D Mon YYYY` with English or Indonesian
/// month names (short or full). Returns `None` for anything else,
/// including the empty string.
pub fn parse_idea_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    let caps = DAY_MONTH_YEAR.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Format a date the way the board shows a fresh idea date: `16 Okt 2026`.
pub fn format_default_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        SHORT_MONTHS_ID[date.month0() as usize],
        date.year()
    )
}

/// Today's date in local time, formatted with `format_default_date`.
pub fn today_default_date() -> String {
    format_default_date(chrono::Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso() {
        assert_eq!(parse_idea_date("2025-12-22"), Some(ymd(2025, 12, 22)));
    }

    #[test]
    fn parses_english_short_month() {
        assert_eq!(parse_idea_date("22 Dec 2025"), Some(ymd(2025, 12, 22)));
        assert_eq!(parse_idea_date("  1 jan 2026 "), Some(ymd(2026, 1, 1)));
    }

    #[test]
    fn parses_indonesian_month() {
        assert_eq!(parse_idea_date("16 Okt 2026"), Some(ymd(2026, 10, 16)));
        assert_eq!(parse_idea_date("3 Mei 2025"), Some(ymd(2025, 5, 3)));
        assert_eq!(parse_idea_date("17 Agustus 2025"), Some(ymd(2025, 8, 17)));
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert_eq!(parse_idea_date(""), None);
        assert_eq!(parse_idea_date("   "), None);
        assert_eq!(parse_idea_date("soon"), None);
        assert_eq!(parse_idea_date("22 Foo 2025"), None);
        assert_eq!(parse_idea_date("31 Feb 2025"), None);
    }

    #[test]
    fn default_date_uses_indonesian_abbreviations() {
        assert_eq!(format_default_date(ymd(2026, 10, 16)), "16 Okt 2026");
        assert_eq!(format_default_date(ymd(2025, 12, 2)), "2 Des 2025");
        assert_eq!(format_default_date(ymd(2025, 5, 31)), "31 Mei 2025");
    }

    #[test]
    fn default_date_round_trips_through_parser() {
        let date = ymd(2025, 8, 9);
        assert_eq!(parse_idea_date(&format_default_date(date)), Some(date));
    }
}
