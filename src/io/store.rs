use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::io::lock::{FileLock, LockError};
use crate::io::recovery::atomic_write;
use crate::model::idea::{IdeaPatch, IdeaRecord, NewIdea};

/// File holding the record collection, inside the board dir
pub const IDEAS_FILE: &str = "ideas.json";

/// Error type for idea storage
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("idea not found: {0}")]
    NotFound(String),
    #[error("idea {0} is deleted")]
    Deleted(String),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize ideas: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// The record collection behind the board.
pub trait IdeaStore {
    /// Every record, including soft-deleted ones, newest first.
    fn list_all(&self) -> Result<Vec<IdeaRecord>, StoreError>;

    /// Store a new idea, assigning its id and creation time.
    fn insert(&mut self, idea: NewIdea) -> Result<IdeaRecord, StoreError>;

    /// Apply a partial update to the record with `id`.
    fn update(&mut self, id: &str, patch: IdeaPatch) -> Result<IdeaRecord, StoreError>;

    /// Mark a record deleted. The record stays in the collection.
    fn soft_delete(&mut self, id: &str, at: DateTime<Utc>) -> Result<IdeaRecord, StoreError> {
        self.update(
            id,
            IdeaPatch {
                deleted_at: Some(at),
                ..Default::default()
            },
        )
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Newest first. The sort is stable, so equal timestamps keep insertion order.
fn sort_newest_first(records: &mut [IdeaRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Deleted records are read-only, so a second delete or a late edit fails.
fn update_in(records: &mut [IdeaRecord], id: &str, patch: IdeaPatch) -> Result<IdeaRecord, StoreError> {
    let record = records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    if record.is_deleted() {
        return Err(StoreError::Deleted(id.to_string()));
    }
    record.apply(patch);
    Ok(record.clone())
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Stores the collection as a JSON array in `ideas.json` inside the board dir.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    board_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(board_dir: &Path) -> Self {
        JsonFileStore {
            board_dir: board_dir.to_path_buf(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.board_dir.join(IDEAS_FILE)
    }

    fn read(&self) -> Result<Vec<IdeaRecord>, StoreError> {
        let path = self.path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|e| StoreError::Corrupt { path, source: e })
    }

    fn write(&self, records: &[IdeaRecord]) -> Result<(), StoreError> {
        let mut content = serde_json::to_string_pretty(records)?;
        content.push('\n');
        atomic_write(&self.path(), content.as_bytes())?;
        log::debug!("wrote {} idea(s) to {}", records.len(), self.path().display());
        Ok(())
    }

    /// Read, modify and write the collection under the board lock.
    fn modify<T>(
        &self,
        f: impl FnOnce(&mut Vec<IdeaRecord>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _lock = FileLock::acquire_default(&self.board_dir)?;
        let mut records = self.read()?;
        let out = f(&mut records)?;
        self.write(&records)?;
        Ok(out)
    }
}

impl IdeaStore for JsonFileStore {
    fn list_all(&self) -> Result<Vec<IdeaRecord>, StoreError> {
        let mut records = self.read()?;
        sort_newest_first(&mut records);
        log::debug!("read {} idea(s) from {}", records.len(), self.path().display());
        Ok(records)
    }

    fn insert(&mut self, idea: NewIdea) -> Result<IdeaRecord, StoreError> {
        self.modify(|records| {
            let record = IdeaRecord::from_new(new_id(), idea, Utc::now());
            records.push(record.clone());
            Ok(record)
        })
    }

    fn update(&mut self, id: &str, patch: IdeaPatch) -> Result<IdeaRecord, StoreError> {
        self.modify(|records| update_in(records, id, patch))
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Keeps the collection in memory. Used by tests and embedding callers.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<IdeaRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing records (ids and timestamps are kept).
    pub fn with_records(records: Vec<IdeaRecord>) -> Self {
        MemoryStore { records }
    }
}

impl IdeaStore for MemoryStore {
    fn list_all(&self) -> Result<Vec<IdeaRecord>, StoreError> {
        let mut records = self.records.clone();
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn insert(&mut self, idea: NewIdea) -> Result<IdeaRecord, StoreError> {
        let record = IdeaRecord::from_new(new_id(), idea, Utc::now());
        self.records.push(record.clone());
        Ok(record)
    }

    fn update(&mut self, id: &str, patch: IdeaPatch) -> Result<IdeaRecord, StoreError> {
        update_in(&mut self.records, id, patch)
    }
}
