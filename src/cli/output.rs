use serde::Serialize;

use crate::model::idea::{IdeaDraft, IdeaRecord};
use crate::model::session::Session;
use crate::parse::idea_parser::ParseResult;
use crate::util::unicode::fit_to_width;

/// Characters of the id shown in list output
const SHORT_ID_LEN: usize = 8;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct SessionJson<'a> {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<&'a Session>,
}

#[derive(Serialize)]
pub struct ImportJson<'a> {
    pub imported: &'a [IdeaRecord],
    pub ignored: &'a [String],
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((i, _)) => &id[..i],
        None => id,
    }
}

/// One-line summary used by `ib list`.
pub fn format_idea_line(idea: &IdeaRecord) -> String {
    let who = if idea.idea_date.is_empty() {
        idea.proposer_name.clone()
    } else {
        format!("{}, {}", idea.proposer_name, idea.idea_date)
    };
    format!(
        "{}  {}  {}  {}  {} ({})",
        fit_to_width(short_id(&idea.id), SHORT_ID_LEN),
        fit_to_width(idea.priority.label(), 6),
        fit_to_width(idea.category.label(), 14),
        fit_to_width(idea.status.label(), 11),
        idea.title,
        who
    )
}

/// Full card used by `ib show`.
pub fn format_idea_detail(idea: &IdeaRecord) -> String {
    let mut out = String::new();
    out.push_str(&idea.title);
    out.push('\n');
    out.push_str(&format!("  id:        {}\n", idea.id));
    out.push_str(&format!("  proposer:  {}\n", idea.proposer_name));
    out.push_str(&format!("  category:  {}\n", idea.category));
    out.push_str(&format!("  priority:  {}\n", idea.priority));
    out.push_str(&format!("  status:    {}\n", idea.status));
    out.push_str(&format!("  date:      {}\n", idea.idea_date));
    if idea.start_date.is_some() || idea.end_date.is_some() {
        out.push_str(&format!(
            "  schedule:  {} / {}\n",
            idea.start_date.as_deref().unwrap_or("-"),
            idea.end_date.as_deref().unwrap_or("-")
        ));
    }
    if let Some(edited) = idea.edited_at {
        out.push_str(&format!(
            "  edited:    {}\n",
            edited.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        ));
    }
    if !idea.description.is_empty() {
        out.push('\n');
        for line in idea.description.lines() {
            out.push_str(&format!("  {}\n", line));
        }
    }
    if !idea.impact.is_empty() {
        out.push_str(&format!("\n  impact: {}\n", idea.impact));
    }
    out
}

fn format_draft(index: usize, draft: &IdeaDraft) -> String {
    format!(
        "{:>3}. [{}, {}] {}",
        index + 1,
        draft.category,
        draft.priority,
        draft.title
    )
}

/// Preview printed by `ib parse` and `ib import --dry-run`.
pub fn format_parse_result(result: &ParseResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("date:     {}\n", result.idea_date));
    if result.proposer_name.is_empty() {
        out.push_str("proposer: (none found, pass --proposer)\n");
    } else {
        out.push_str(&format!("proposer: {}\n", result.proposer_name));
    }
    out.push_str(&format!("ideas ({}):\n", result.drafts.len()));
    for (i, draft) in result.drafts.iter().enumerate() {
        out.push_str(&format_draft(i, draft));
        out.push('\n');
    }
    if !result.ignored.is_empty() {
        out.push_str(&format!("ignored lines ({}):\n", result.ignored.len()));
        for line in &result.ignored {
            out.push_str(&format!("  {}\n", line));
        }
    }
    out
}
