use std::collections::VecDeque;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::model::idea::{Category, IdeaDraft, Priority};

/// Maximum number of characters kept in a draft title
pub const TITLE_MAX_CHARS: usize = 50;

/// Appended to a title that was cut at `TITLE_MAX_CHARS`
pub const TITLE_ELLIPSIS: &str = "...";

const BULLET_MARKERS: [char; 2] = ['-', '•'];

/// Checked before the revenue keywords; the first group that hits wins.
const COST_SAVING_KEYWORDS: &[&str] = &["hemat", "efisien", "kurang", "otomasi", "automasi"];
const REVENUE_KEYWORDS: &[&str] = &["jual", "revenue", "penjualan", "pasar", "market"];
const HIGH_PRIORITY_KEYWORDS: &[&str] = &["urgent", "penting", "segera"];

/// A date like `22 Dec 2025` anywhere on the first line
static DATE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{1,2}\s+[A-Za-z0-9_]{3}\s+[0-9]{4}").expect("date line pattern is valid")
});

/// Output of `parse_raw_ideas`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// Date found on the first line, or the caller's default
    pub idea_date: String,
    /// Proposer found on the header line; empty when absent
    pub proposer_name: String,
    /// One draft per non-empty bullet line, in input order
    pub drafts: Vec<IdeaDraft>,
    /// Non-bullet lines after the header, trimmed, in input order
    pub ignored: Vec<String>,
}

/// Parse pasted meeting notes into idea drafts.
///
/// Expected shape (every part optional):
///
/// ```text
/// 22 Dec 2025
/// Pak Akiong
/// - Automasi proses approval menggunakan workflow digital
/// • Jual produk baru ke pasar urgent
/// ```
///
/// Blank lines are dropped first. A date on the first line becomes the idea
/// date, then a first line that is not a bullet becomes the proposer name.
/// Every remaining bullet is a draft. Never fails: unrecognized input just
/// yields fewer drafts.
pub fn parse_raw_ideas(raw_text: &str, default_date: &str) -> ParseResult {
    let mut lines: VecDeque<&str> = raw_text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();

    let mut idea_date = default_date.to_string();
    if let Some(first) = lines.front()
        && let Some(m) = DATE_LINE.find(first)
    {
        idea_date = m.as_str().to_string();
        lines.pop_front();
    }

    let mut proposer_name = String::new();
    if let Some(first) = lines.front()
        && strip_bullet(first.trim()).is_none()
    {
        proposer_name = first.trim().to_string();
        lines.pop_front();
    }

    let mut drafts = Vec::new();
    let mut ignored = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        match strip_bullet(trimmed) {
            Some("") => {}
            Some(text) => drafts.push(draft_from_text(text)),
            None => ignored.push(trimmed.to_string()),
        }
    }

    ParseResult {
        idea_date,
        proposer_name,
        drafts,
        ignored,
    }
}

/// Strip a leading `-` or `•` and the whitespace after it.
/// Returns `None` if the line is not a bullet.
fn strip_bullet(trimmed: &str) -> Option<&str> {
    trimmed.strip_prefix(BULLET_MARKERS).map(str::trim)
}

fn draft_from_text(text: &str) -> IdeaDraft {
    IdeaDraft {
        title: make_title(text),
        description: text.to_string(),
        category: classify_category(text),
        priority: classify_priority(text),
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Guess the category from keywords. Cost saving wins over revenue.
pub fn classify_category(text: &str) -> Category {
    let lower = text.to_lowercase();
    if contains_any(&lower, COST_SAVING_KEYWORDS) {
        Category::CostSaving
    } else if contains_any(&lower, REVENUE_KEYWORDS) {
        Category::RevenueGrowth
    } else {
        Category::Both
    }
}

/// `High` for urgent-sounding text, otherwise `Medium`. Never `Low`.
pub fn classify_priority(text: &str) -> Priority {
    if contains_any(&text.to_lowercase(), HIGH_PRIORITY_KEYWORDS) {
        Priority::High
    } else {
        Priority::Medium
    }
}

/// First `TITLE_MAX_CHARS` characters, plus `...` if anything was cut.
pub fn make_title(text: &str) -> String {
    if text.chars().count() > TITLE_MAX_CHARS {
        let mut title: String = text.chars().take(TITLE_MAX_CHARS).collect();
        title.push_str(TITLE_ELLIPSIS);
        title
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_DATE: &str = "16 Okt 2026";

    #[test]
    fn test_parse_meeting_notes() {
        let source = "\
22 Dec 2025
Pak Akiong
- Automasi proses approval menggunakan workflow digital
- Jual produk baru ke pasar urgent";
        let result = parse_raw_ideas(source, DEFAULT_DATE);
        assert_eq!(result.idea_date, "22 Dec 2025");
        assert_eq!(result.proposer_name, "Pak Akiong");
        assert_eq!(result.drafts.len(), 2);

        assert_eq!(result.drafts[0].category, Category::CostSaving);
        assert_eq!(result.drafts[0].priority, Priority::Medium);
        assert_eq!(
            result.drafts[0].description,
            "Automasi proses approval menggunakan workflow digital"
        );
        assert_eq!(
            result.drafts[0].title,
            "Automasi proses approval menggunakan workflow digi..."
        );

        assert_eq!(result.drafts[1].category, Category::RevenueGrowth);
        assert_eq!(result.drafts[1].priority, Priority::High);
        assert_eq!(result.drafts[1].title, "Jual produk baru ke pasar urgent");
        assert!(result.ignored.is_empty());
    }

    #[test]
    fn test_parse_without_date_keeps_default() {
        let result = parse_raw_ideas("Bu Sari\n- Kurangi kertas", DEFAULT_DATE);
        assert_eq!(result.idea_date, DEFAULT_DATE);
        assert_eq!(result.proposer_name, "Bu Sari");
        assert_eq!(result.drafts.len(), 1);
        assert_eq!(result.drafts[0].category, Category::CostSaving);
    }

    #[test]
    fn test_parse_bullet_first_means_no_proposer() {
        let result = parse_raw_ideas("22 Dec 2025\n- Ide pertama\n• Ide kedua", DEFAULT_DATE);
        assert_eq!(result.proposer_name, "");
        assert_eq!(result.drafts.len(), 2);
        assert_eq!(result.drafts[1].description, "Ide kedua");
    }

    #[test]
    fn test_parse_bullet_dot_marker_not_taken_as_proposer() {
        let result = parse_raw_ideas("• Buka pasar baru", DEFAULT_DATE);
        assert_eq!(result.proposer_name, "");
        assert_eq!(result.drafts.len(), 1);
        assert_eq!(result.drafts[0].category, Category::RevenueGrowth);
    }

    #[test]
    fn test_parse_skips_blank_lines_before_header() {
        let source = "\n   \n22 Dec 2025\n\n  Pak Akiong  \n\n  -   Hemat listrik kantor  \n";
        let result = parse_raw_ideas(source, DEFAULT_DATE);
        assert_eq!(result.idea_date, "22 Dec 2025");
        assert_eq!(result.proposer_name, "Pak Akiong");
        assert_eq!(result.drafts[0].description, "Hemat listrik kantor");
    }

    #[test]
    fn test_parse_date_embedded_in_first_line() {
        let result = parse_raw_ideas("Rapat 5 Jan 2026 pagi\nPak Budi\n- Ide", DEFAULT_DATE);
        assert_eq!(result.idea_date, "5 Jan 2026");
        assert_eq!(result.proposer_name, "Pak Budi");
    }

    #[test]
    fn test_parse_date_only_on_first_line() {
        // A date on a later line is not special
        let result = parse_raw_ideas("Pak Budi\n22 Dec 2025\n- Ide", DEFAULT_DATE);
        assert_eq!(result.idea_date, DEFAULT_DATE);
        assert_eq!(result.proposer_name, "Pak Budi");
        assert_eq!(result.ignored, vec!["22 Dec 2025"]);
    }

    #[test]
    fn test_parse_empty_input() {
        let result = parse_raw_ideas("", DEFAULT_DATE);
        assert_eq!(result.idea_date, DEFAULT_DATE);
        assert_eq!(result.proposer_name, "");
        assert!(result.drafts.is_empty());
        assert!(result.ignored.is_empty());
    }

    #[test]
    fn test_parse_empty_bullets_skipped() {
        let result = parse_raw_ideas("Pak Budi\n-\n•   \n- Ide nyata", DEFAULT_DATE);
        assert_eq!(result.drafts.len(), 1);
        assert!(result.ignored.is_empty());
    }

    #[test]
    fn test_parse_collects_ignored_lines() {
        let source = "Pak Budi\n- Ide satu\nCatatan tambahan\n- Ide dua";
        let result = parse_raw_ideas(source, DEFAULT_DATE);
        assert_eq!(result.drafts.len(), 2);
        assert_eq!(result.ignored, vec!["Catatan tambahan"]);
    }

    #[test]
    fn test_category_precedence() {
        assert_eq!(
            classify_category("Otomasi laporan untuk naikkan penjualan"),
            Category::CostSaving
        );
        assert_eq!(classify_category("MARKET expansion"), Category::RevenueGrowth);
        assert_eq!(classify_category("Perbaiki budaya tim"), Category::Both);
    }

    #[test]
    fn test_priority_keywords() {
        assert_eq!(classify_priority("Segera ganti server"), Priority::High);
        assert_eq!(classify_priority("Ini PENTING"), Priority::High);
        assert_eq!(classify_priority("Nanti saja"), Priority::Medium);
    }

    #[test]
    fn test_make_title_boundaries() {
        let fifty = "a".repeat(50);
        assert_eq!(make_title(&fifty), fifty);
        let fifty_one = "b".repeat(51);
        assert_eq!(make_title(&fifty_one), format!("{}...", "b".repeat(50)));
    }

    #[test]
    fn test_make_title_counts_chars_not_bytes() {
        let text = "é".repeat(60);
        let title = make_title(&text);
        assert_eq!(title.chars().count(), 53);
        assert!(title.starts_with(&"é".repeat(50)));
    }
}
