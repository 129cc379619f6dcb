use crate::model::criteria::FilterCriteria;
use crate::model::idea::IdeaRecord;
use crate::parse::date::parse_idea_date;

/// Return the records that pass every criterion, in their original order.
///
/// Soft-deleted records never pass.
pub fn filter_ideas<'a>(records: &'a [IdeaRecord], criteria: &FilterCriteria) -> Vec<&'a IdeaRecord> {
    let query = criteria.query.to_lowercase();
    records
        .iter()
        .filter(|r| matches_with_query(r, criteria, &query))
        .collect()
}

/// Whether a single record passes `criteria`.
pub fn matches(record: &IdeaRecord, criteria: &FilterCriteria) -> bool {
    matches_with_query(record, criteria, &criteria.query.to_lowercase())
}

fn matches_with_query(record: &IdeaRecord, criteria: &FilterCriteria, query: &str) -> bool {
    if record.is_deleted() {
        return false;
    }
    if !within_date_range(record, criteria) {
        return false;
    }
    if criteria.category.is_some_and(|c| c != record.category) {
        return false;
    }
    if criteria.priority.is_some_and(|p| p != record.priority) {
        return false;
    }
    if criteria.status.is_some_and(|s| s != record.status) {
        return false;
    }
    if let Some(proposer) = &criteria.proposer
        && *proposer != record.proposer_name
    {
        return false;
    }
    matches_query(record, query)
}

/// Records whose date is missing or unreadable are never excluded by date.
fn within_date_range(record: &IdeaRecord, criteria: &FilterCriteria) -> bool {
    if !criteria.has_date_bounds() {
        return true;
    }
    let Some(date) = parse_idea_date(&record.idea_date) else {
        return true;
    };
    if let Some(from) = criteria.date_from
        && date < from
    {
        return false;
    }
    if let Some(to) = criteria.date_to
        && date > to
    {
        return false;
    }
    true
}

/// `query` must already be lowercase.
fn matches_query(record: &IdeaRecord, query: &str) -> bool {
    query.is_empty()
        || record.title.to_lowercase().contains(query)
        || record.description.to_lowercase().contains(query)
        || record.proposer_name.to_lowercase().contains(query)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
