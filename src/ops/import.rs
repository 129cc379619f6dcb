use crate::io::store::{IdeaStore, StoreError};
use crate::model::idea::{IdeaRecord, NewIdea};
use crate::ops::draft::expand_drafts;
use crate::parse::idea_parser::{ParseResult, parse_raw_ideas};

/// Error type for import operations
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("no ideas found (ideas are lines starting with '-' or '•')")]
    NoIdeas,
    #[error("no proposer name found in the notes; pass --proposer")]
    MissingProposer,
    #[error("import stopped after {} idea(s): {source}", .saved.len())]
    Store {
        source: StoreError,
        saved: Vec<IdeaRecord>,
        unsaved: Vec<NewIdea>,
    },
}

/// Values the user supplies in place of (or in addition to) what the parser found.
#[derive(Debug, Clone, Default)]
pub struct ImportOverrides {
    pub proposer_name: Option<String>,
    pub idea_date: Option<String>,
}

/// A parse result checked and expanded into storable ideas
#[derive(Debug, Clone)]
pub struct PreparedImport {
    pub parsed: ParseResult,
    pub ideas: Vec<NewIdea>,
}

#[derive(Debug)]
pub struct ImportResult {
    pub records: Vec<IdeaRecord>,
    /// Lines that did not become ideas
    pub ignored: Vec<String>,
}

/// Parse notes and apply overrides without touching the store.
pub fn prepare_import(
    raw_text: &str,
    default_date: &str,
    overrides: &ImportOverrides,
) -> Result<PreparedImport, ImportError> {
    let mut parsed = parse_raw_ideas(raw_text, default_date);

    if let Some(name) = &overrides.proposer_name {
        parsed.proposer_name = name.trim().to_string();
    }
    if let Some(date) = &overrides.idea_date {
        parsed.idea_date = date.trim().to_string();
    }

    if parsed.drafts.is_empty() {
        return Err(ImportError::NoIdeas);
    }
    if parsed.proposer_name.is_empty() {
        return Err(ImportError::MissingProposer);
    }

    let ideas = expand_drafts(&parsed.drafts, &parsed.proposer_name, &parsed.idea_date);
    Ok(PreparedImport { parsed, ideas })
}

/// Parse notes and insert one idea per bullet.
///
/// Stops at the first failed insert; the error carries what was saved and
/// what was not.
pub fn import_ideas(
    store: &mut impl IdeaStore,
    raw_text: &str,
    default_date: &str,
    overrides: &ImportOverrides,
) -> Result<ImportResult, ImportError> {
    let PreparedImport { parsed, ideas } = prepare_import(raw_text, default_date, overrides)?;

    let mut records = Vec::with_capacity(ideas.len());
    let mut pending = ideas.into_iter();
    while let Some(idea) = pending.next() {
        match store.insert(idea.clone()) {
            Ok(record) => records.push(record),
            Err(source) => {
                let mut unsaved = vec![idea];
                unsaved.extend(pending);
                return Err(ImportError::Store {
                    source,
                    saved: records,
                    unsaved,
                });
            }
        }
    }

    log::info!(
        "imported {} idea(s) from {} ({} line(s) ignored)",
        records.len(),
        parsed.proposer_name,
        parsed.ignored.len()
    );
    Ok(ImportResult {
        records,
        ignored: parsed.ignored,
    })
}
