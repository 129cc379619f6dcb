use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::model::idea::IdeaRecord;

/// Maximum size of the recovery log before old entries are trimmed (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Default number of days before entries are prunable.
pub const PRUNE_AGE_DAYS: i64 = 30;

/// Written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- ideaboard recovery log: append-only
     Holds data ib could not keep on the board: ignored import lines,
     deleted ideas, and ideas that failed to save.
     View with: ib recovery
     Prune old entries: ib recovery prune
     Safe to delete if empty or stale. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// Lines the raw-idea parser did not turn into drafts
    Parser,
    /// Ideas that could not be written to the store
    Write,
    /// Snapshots of soft-deleted ideas
    Delete,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Parser => write!(f, "parser"),
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Delete => write!(f, "delete"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "parser" => Some(RecoveryCategory::Parser),
            "write" => Some(RecoveryCategory::Write),
            "delete" => Some(RecoveryCategory::Delete),
            _ => None,
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

pub fn recovery_log_path(board_dir: &Path) -> PathBuf {
    board_dir.join(".recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry formatting
// ---------------------------------------------------------------------------

impl RecoveryEntry {
    /// Format this entry as a markdown block.
    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} [{}] {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            let fence = body_fence(&self.body);
            out.push('\n');
            out.push_str(&format!("{}text\n", fence));
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&fence);
            out.push('\n');
        }

        out.push('\n');
        out.push_str("---\n");
        out
    }

    /// For `ib recovery --json`.
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "category": self.category.to_string(),
            "description": self.description,
            "fields": fields,
            "body": self.body,
        })
    }

}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append an entry. Failures are reported as warnings, never returned.
pub fn log_recovery(board_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(board_dir, entry) {
        log::warn!("could not write to recovery log: {}", e);
    }
}

fn log_recovery_inner(board_dir: &Path, entry: RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(board_dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        let content = std::fs::read_to_string(&path)?;
        let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
        atomic_write(&path, prune_entries_before(&content, &cutoff).as_bytes())?;
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Record import lines that did not become drafts.
pub fn log_ignored_lines(board_dir: &Path, source: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    log_recovery(
        board_dir,
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Parser,
            description: format!("{} line(s) ignored during import", lines.len()),
            fields: vec![("Source".to_string(), source.to_string())],
            body: lines.join("\n"),
        },
    );
}

/// Record a snapshot of an idea that was just soft-deleted.
pub fn log_idea_deletion(board_dir: &Path, record: &IdeaRecord) {
    let body = serde_json::to_string_pretty(record).unwrap_or_default();
    log_recovery(
        board_dir,
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Delete,
            description: format!("idea {} deleted", record.id),
            fields: vec![
                ("Idea".to_string(), record.id.clone()),
                ("Title".to_string(), record.title.clone()),
            ],
            body,
        },
    );
}

/// Record an idea payload that could not be saved.
pub fn log_failed_write(board_dir: &Path, description: &str, error: &str, payload: String) {
    log_recovery(
        board_dir,
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Write,
            description: description.to_string(),
            fields: vec![("Error".to_string(), error.to_string())],
            body: payload,
        },
    );
}

// ---------------------------------------------------------------------------
// Reading entries
// ---------------------------------------------------------------------------

/// Read entries, most recent first.
pub fn read_recovery_entries(
    board_dir: &Path,
    limit: Option<usize>,
    since: Option<DateTime<Utc>>,
) -> Vec<RecoveryEntry> {
    let content = match std::fs::read_to_string(recovery_log_path(board_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries = parse_entries(&content);

    if let Some(since_dt) = since {
        entries.retain(|e| e.timestamp >= since_dt);
    }

    // Entries are parsed oldest-first
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries = entries.into_iter().skip(skip).collect();
    }

    entries.reverse();
    entries
}

fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some((timestamp, category, description)) =
            line.strip_prefix("## ").and_then(parse_entry_header)
        else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body_lines: Vec<&str> = Vec::new();
        let mut fence = FenceTracker::default();

        for line in lines.by_ref() {
            match fence.classify(line) {
                FenceLine::Body => body_lines.push(line),
                FenceLine::Open | FenceLine::Close => {}
                FenceLine::Outside => {
                    if line == "---" {
                        break;
                    }
                    if let Some((key, value)) = line.trim().split_once(": ") {
                        fields.push((key.to_string(), value.to_string()));
                    }
                }
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body: body_lines.join("\n"),
        });
    }

    entries
}

// ---------------------------------------------------------------------------
// Body fences
// ---------------------------------------------------------------------------

/// A backtick fence longer than any backtick run in `body`, at least three.
fn body_fence(body: &str) -> String {
    let longest_run = body
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat((longest_run + 1).max(3))
}

enum FenceLine {
    Open,
    Close,
    Body,
    Outside,
}

/// Tracks whether lines sit inside an entry's fenced body. A fence closes
/// only on a line equal to the one that opened it.
#[derive(Default)]
struct FenceTracker {
    open: Option<String>,
}

impl FenceTracker {
    fn classify(&mut self, line: &str) -> FenceLine {
        match &self.open {
            Some(fence) if line == fence => {
                self.open = None;
                FenceLine::Close
            }
            Some(_) => FenceLine::Body,
            None if line.starts_with("```") => {
                let ticks = line.len() - line.trim_start_matches('`').len();
                self.open = Some("`".repeat(ticks));
                FenceLine::Open
            }
            None => FenceLine::Outside,
        }
    }
}

/// Parse `<timestamp> [<category>] <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp_str, rest) = header.split_once(" [")?;
    let (category_str, description) = rest.split_once("] ")?;

    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .ok()?
        .with_timezone(&Utc);
    let category = RecoveryCategory::parse_category(category_str)?;

    Some((timestamp, category, description.to_string()))
}

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

/// Remove entries older than `before` (default: `PRUNE_AGE_DAYS` ago), or all
/// entries. Returns the number removed.
pub fn prune_recovery(
    board_dir: &Path,
    before: Option<DateTime<Utc>>,
    all: bool,
) -> io::Result<usize> {
    let path = recovery_log_path(board_dir);
    if !path.exists() {
        return Ok(0);
    }

    let content = std::fs::read_to_string(&path)?;
    let original_count = parse_entries(&content).len();

    if all {
        atomic_write(&path, FILE_HEADER.as_bytes())?;
        return Ok(original_count);
    }

    let cutoff = before.unwrap_or_else(|| Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS));
    let trimmed = prune_entries_before(&content, &cutoff);
    let new_count = parse_entries(&trimmed).len();

    atomic_write(&path, trimmed.as_bytes())?;
    Ok(original_count - new_count)
}

/// Drop entries with timestamps before `cutoff`, keeping the file header.
fn prune_entries_before(content: &str, cutoff: &DateTime<Utc>) -> String {
    let mut result = String::new();
    let mut current_entry = String::new();
    let mut current_timestamp: Option<DateTime<Utc>> = None;
    let mut in_header = true;
    let mut fence = FenceTracker::default();

    for line in content.lines() {
        if in_header {
            result.push_str(line);
            result.push('\n');
            if line == "---" {
                in_header = false;
            }
            continue;
        }

        let outside_body = matches!(fence.classify(line), FenceLine::Outside);
        if outside_body && let Some(stripped) = line.strip_prefix("## ") {
            if let Some(ts) = current_timestamp
                && ts >= *cutoff
            {
                result.push_str(&current_entry);
            }
            current_entry.clear();
            current_timestamp = parse_entry_header(stripped).map(|(ts, _, _)| ts);
        }
        current_entry.push_str(line);
        current_entry.push('\n');
    }

    if let Some(ts) = current_timestamp
        && ts >= *cutoff
    {
        result.push_str(&current_entry);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn entry_at(ts: DateTime<Utc>, description: &str) -> RecoveryEntry {
        RecoveryEntry {
            timestamp: ts,
            category: RecoveryCategory::Parser,
            description: description.to_string(),
            fields: vec![("Source".to_string(), "notes.txt".to_string())],
            body: "Catatan tambahan\nLain-lain".to_string(),
        }
    }

    #[test]
    fn test_log_and_read_back() {
        let tmp = TempDir::new().unwrap();
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        log_recovery(tmp.path(), entry_at(ts, "first"));
        log_recovery(tmp.path(), entry_at(ts, "second"));

        let content = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert!(content.starts_with("<!-- ideaboard recovery log"));
        assert_eq!(content.matches("<!--").count(), 1);

        let entries = read_recovery_entries(tmp.path(), None, None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "second");
        assert_eq!(entries[1].timestamp, ts);
        assert_eq!(entries[1].category, RecoveryCategory::Parser);
        assert_eq!(entries[1].fields, vec![("Source".to_string(), "notes.txt".to_string())]);
        assert_eq!(entries[1].body, "Catatan tambahan\nLain-lain");
    }

    #[test]
    fn test_read_with_limit() {
        let tmp = TempDir::new().unwrap();
        for i in 0..5 {
            log_recovery(tmp.path(), entry_at(Utc::now(), &format!("entry {}", i)));
        }
        let entries = read_recovery_entries(tmp.path(), Some(2), None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "entry 4");
        assert_eq!(entries[1].description, "entry 3");
    }

    #[test]
    fn test_read_missing_log_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_recovery_entries(tmp.path(), None, None).is_empty());
    }

    #[test]
    fn test_prune_before_cutoff() {
        let tmp = TempDir::new().unwrap();
        let old = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        log_recovery(tmp.path(), entry_at(old, "old"));
        log_recovery(tmp.path(), entry_at(Utc::now(), "new"));

        let removed = prune_recovery(tmp.path(), None, false).unwrap();
        assert_eq!(removed, 1);
        let entries = read_recovery_entries(tmp.path(), None, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "new");
    }

    #[test]
    fn test_prune_all_keeps_header() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), entry_at(Utc::now(), "x"));
        assert_eq!(prune_recovery(tmp.path(), None, true).unwrap(), 1);
        let content = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert_eq!(content, FILE_HEADER);
    }

    #[test]
    fn test_log_ignored_lines_skips_empty() {
        let tmp = TempDir::new().unwrap();
        log_ignored_lines(tmp.path(), "stdin", &[]);
        assert!(!recovery_log_path(tmp.path()).exists());

        log_ignored_lines(tmp.path(), "stdin", &["Catatan".to_string()]);
        let entries = read_recovery_entries(tmp.path(), None, None);
        assert_eq!(entries[0].description, "1 line(s) ignored during import");
        assert_eq!(entries[0].body, "Catatan");
    }

    #[test]
    fn test_prune_keeps_headings_and_fences_in_bodies() {
        let tmp = TempDir::new().unwrap();
        let ignored = vec![
            "## Agenda".to_string(),
            "```".to_string(),
            "Catatan".to_string(),
            "---".to_string(),
        ];
        log_ignored_lines(tmp.path(), "notes.md", &ignored);
        log_failed_write(tmp.path(), "idea could not be added", "disk full", "{\"title\": \"x\"}".to_string());

        let cutoff = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(prune_recovery(tmp.path(), Some(cutoff), false).unwrap(), 0);

        let entries = read_recovery_entries(tmp.path(), None, None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, RecoveryCategory::Write);
        assert_eq!(entries[0].body, "{\"title\": \"x\"}");
        assert_eq!(entries[1].category, RecoveryCategory::Parser);
        assert_eq!(entries[1].fields, vec![("Source".to_string(), "notes.md".to_string())]);
        assert_eq!(entries[1].body, ignored.join("\n"));
    }

    #[test]
    fn test_prune_drops_only_old_entry_with_heading_body() {
        let tmp = TempDir::new().unwrap();
        let old = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let mut with_heading = entry_at(old, "old");
        with_heading.body = "## Agenda\n```\nrapat".to_string();
        log_recovery(tmp.path(), with_heading);
        log_recovery(tmp.path(), entry_at(Utc::now(), "new"));

        assert_eq!(prune_recovery(tmp.path(), None, false).unwrap(), 1);
        let entries = read_recovery_entries(tmp.path(), None, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "new");
        assert_eq!(entries[0].body, "Catatan tambahan\nLain-lain");
    }

    #[test]
    fn test_body_fence_outgrows_backtick_runs() {
        assert_eq!(body_fence("plain"), "```");
        assert_eq!(body_fence("```"), "````");
        assert_eq!(body_fence("a ````` b"), "``````");
    }

    #[test]
    fn test_to_json_shape() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let json = entry_at(ts, "x").to_json();
        assert_eq!(json["timestamp"], "2026-01-02T03:04:05Z");
        assert_eq!(json["category"], "parser");
        assert_eq!(json["fields"]["Source"], "notes.txt");
    }
}
