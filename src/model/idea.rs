use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of benefit an idea promises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Cost Saving")]
    CostSaving,
    #[serde(rename = "Revenue Growth")]
    RevenueGrowth,
    #[serde(rename = "Both")]
    Both,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::CostSaving, Category::RevenueGrowth, Category::Both];

    /// Human-readable label, also the serialized form
    pub fn label(self) -> &'static str {
        match self {
            Category::CostSaving => "Cost Saving",
            Category::RevenueGrowth => "Revenue Growth",
            Category::Both => "Both",
        }
    }

    /// Short kebab-case name accepted on the command line
    pub fn key(self) -> &'static str {
        match self {
            Category::CostSaving => "cost-saving",
            Category::RevenueGrowth => "revenue-growth",
            Category::Both => "both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Progress of an idea once it is on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::NotStarted, Status::InProgress, Status::Done];

    pub fn label(self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Status::NotStarted => "not-started",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }
}

/// Error for enum values given on the command line or in files
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! impl_label_enum {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            /// Accepts the label (`Cost Saving`) or the key (`cost-saving`),
            /// ignoring ASCII case.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(s) || v.key().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: $ty::ALL
                            .iter()
                            .map(|v| v.key())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

impl_label_enum!(Category, "category");
impl_label_enum!(Priority, "priority");
impl_label_enum!(Status, "status");

/// An unsaved idea produced by the raw-text parser, awaiting review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaDraft {
    /// First 50 characters of the idea text (with `...` when cut)
    pub title: String,
    /// The full idea text
    pub description: String,
    pub category: Category,
    pub priority: Priority,
}

/// A fully specified idea that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIdea {
    pub proposer_name: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub idea_date: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub impact: String,
}

/// A persisted idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaRecord {
    pub id: String,
    pub proposer_name: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    /// Calendar date as entered (`22 Dec 2025`, `2025-12-22`, ...)
    #[serde(default)]
    pub idea_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub impact: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
    /// Soft-deletion marker. Deleted records stay in storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl IdeaRecord {
    /// Build a record from a new idea, as the store does on insert
    pub fn from_new(id: String, idea: NewIdea, created_at: DateTime<Utc>) -> Self {
        IdeaRecord {
            id,
            proposer_name: idea.proposer_name,
            title: idea.title,
            description: idea.description,
            category: idea.category,
            priority: idea.priority,
            status: idea.status,
            idea_date: idea.idea_date,
            start_date: idea.start_date,
            end_date: idea.end_date,
            impact: idea.impact,
            created_at,
            edited_at: None,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Apply a partial update. `None` fields are left alone.
    pub fn apply(&mut self, patch: IdeaPatch) {
        if let Some(v) = patch.proposer_name {
            self.proposer_name = v;
        }
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.priority {
            self.priority = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.idea_date {
            self.idea_date = v;
        }
        if let Some(v) = patch.start_date {
            self.start_date = v;
        }
        if let Some(v) = patch.end_date {
            self.end_date = v;
        }
        if let Some(v) = patch.impact {
            self.impact = v;
        }
        if let Some(v) = patch.edited_at {
            self.edited_at = Some(v);
        }
        if let Some(v) = patch.deleted_at {
            self.deleted_at = Some(v);
        }
    }
}

/// Partial field update for a stored idea.
///
/// `start_date` and `end_date` are doubly optional: `Some(None)` clears the
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaPatch {
    pub proposer_name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub idea_date: Option<String>,
    pub start_date: Option<Option<String>>,
    pub end_date: Option<Option<String>>,
    pub impact: Option<String>,
    pub edited_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl IdeaPatch {
    /// True when the patch changes no user-editable field
    pub fn is_empty(&self) -> bool {
        self.proposer_name.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.idea_date.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.impact.is_none()
    }
}
