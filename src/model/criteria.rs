use chrono::NaiveDate;

use super::idea::{Category, Priority, Status};

/// User-selected constraints on the visible idea list.
///
/// Every selector is optional; `None` means the field is not constrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against title, description and proposer
    pub query: String,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    /// Exact (case-sensitive) proposer name
    pub proposer: Option<String>,
    /// Inclusive lower bound on the idea date
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the idea date
    pub date_to: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn has_date_bounds(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }
}
