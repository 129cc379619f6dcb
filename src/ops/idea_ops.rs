use chrono::{DateTime, Utc};

use crate::io::store::{IdeaStore, StoreError};
use crate::model::criteria::FilterCriteria;
use crate::model::idea::{IdeaPatch, IdeaRecord, NewIdea};
use crate::ops::filter::filter_ideas;

/// Error type for looking up an idea by id
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("idea not found: {0}")]
    NotFound(String),
    #[error("id prefix '{prefix}' is ambiguous ({count} ideas match)")]
    Ambiguous { prefix: String, count: usize },
}

pub fn create_idea(store: &mut impl IdeaStore, idea: NewIdea) -> Result<IdeaRecord, StoreError> {
    let record = store.insert(idea)?;
    log::info!("created idea {}", record.id);
    Ok(record)
}

/// Apply a user edit and stamp `edited_at`.
pub fn edit_idea(
    store: &mut impl IdeaStore,
    id: &str,
    mut patch: IdeaPatch,
    now: DateTime<Utc>,
) -> Result<IdeaRecord, StoreError> {
    patch.edited_at = Some(now);
    let record = store.update(id, patch)?;
    log::info!("edited idea {}", record.id);
    Ok(record)
}

pub fn delete_idea(store: &mut impl IdeaStore, id: &str, now: DateTime<Utc>) -> Result<IdeaRecord, StoreError> {
    let record = store.soft_delete(id, now)?;
    log::info!("soft-deleted idea {}", record.id);
    Ok(record)
}

/// The board as the user sees it: newest first, filtered, deleted ideas hidden.
pub fn visible_ideas(store: &impl IdeaStore, criteria: &FilterCriteria) -> Result<Vec<IdeaRecord>, StoreError> {
    let records = store.list_all()?;
    Ok(filter_ideas(&records, criteria).into_iter().cloned().collect())
}

/// Find a live (not deleted) idea by full id or unique id prefix.
pub fn find_idea<'a>(records: &'a [IdeaRecord], id: &str) -> Result<&'a IdeaRecord, LookupError> {
    let live = || records.iter().filter(|r| !r.is_deleted());
    if let Some(exact) = live().find(|r| r.id == id) {
        return Ok(exact);
    }
    let candidates: Vec<&IdeaRecord> = if id.is_empty() {
        Vec::new()
    } else {
        live().filter(|r| r.id.starts_with(id)).collect()
    };
    match candidates.as_slice() {
        [one] => Ok(*one),
        [] => Err(LookupError::NotFound(id.to_string())),
        many => Err(LookupError::Ambiguous {
            prefix: id.to_string(),
            count: many.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use crate::model::idea::{Category, Priority, Status};
    use chrono::TimeZone;

    fn new_idea(title: &str, priority: Priority) -> NewIdea {
        NewIdea {
            proposer_name: "Bu Sari".into(),
            title: title.into(),
            description: title.into(),
            category: Category::Both,
            priority,
            status: Status::NotStarted,
            idea_date: "2026-01-05".into(),
            start_date: None,
            end_date: None,
            impact: String::new(),
        }
    }

    fn record_with_id(id: &str) -> IdeaRecord {
        IdeaRecord::from_new(id.into(), new_idea(id, Priority::Low), Utc::now())
    }

    #[test]
    fn test_edit_sets_edited_at() {
        let mut store = MemoryStore::new();
        let rec = create_idea(&mut store, new_idea("a", Priority::Low)).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let edited = edit_idea(
            &mut store,
            &rec.id,
            IdeaPatch {
                title: Some("renamed".into()),
                ..Default::default()
            },
            now,
        )
        .unwrap();
        assert_eq!(edited.title, "renamed");
        assert_eq!(edited.edited_at, Some(now));
    }

    #[test]
    fn test_deleted_ideas_hidden_from_visible_list() {
        let mut store = MemoryStore::new();
        let a = create_idea(&mut store, new_idea("a", Priority::High)).unwrap();
        create_idea(&mut store, new_idea("b", Priority::Low)).unwrap();
        delete_idea(&mut store, &a.id, Utc::now()).unwrap();

        let visible = visible_ideas(&store, &FilterCriteria::default()).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "b");
        // Still stored
        assert_eq!(store.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_twice_fails() {
        let mut store = MemoryStore::new();
        let a = create_idea(&mut store, new_idea("a", Priority::High)).unwrap();
        let first = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        delete_idea(&mut store, &a.id, first).unwrap();

        let err = delete_idea(&mut store, &a.id, Utc::now()).unwrap_err();
        assert!(matches!(err, StoreError::Deleted(_)));
        assert_eq!(store.list_all().unwrap()[0].deleted_at, Some(first));
    }

    #[test]
    fn test_find_by_prefix() {
        let records = vec![record_with_id("abc123"), record_with_id("abd456")];
        assert_eq!(find_idea(&records, "abc").unwrap().id, "abc123");
        assert_eq!(find_idea(&records, "abd456").unwrap().id, "abd456");
        assert!(matches!(
            find_idea(&records, "ab"),
            Err(LookupError::Ambiguous { count: 2, .. })
        ));
        assert!(matches!(find_idea(&records, "zz"), Err(LookupError::NotFound(_))));
        assert!(matches!(find_idea(&records, ""), Err(LookupError::NotFound(_))));
    }

    #[test]
    fn test_find_skips_deleted() {
        let mut deleted = record_with_id("abc123");
        deleted.deleted_at = Some(Utc::now());
        let records = vec![deleted];
        assert!(matches!(find_idea(&records, "abc123"), Err(LookupError::NotFound(_))));
    }
}
