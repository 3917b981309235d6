//! Read-only view over the notes of a vault
//!
//! This module contains the document model the rest of the crate consumes:
//! - `fields`: bracket-aware inline field scanning (`Key:: value`, `[key:: value]`)
//! - `index`: the on-disk `Vault` index implementing `DocumentQuery`
//! - `period`: calendar labels for day, week, month and quarter notes
//!
//! Field values are modeled as a tagged union (`FieldValue`) so callers pattern
//! match on the link / link-list shape instead of probing values at runtime.

pub mod fields;
mod index;
pub mod period;

use chrono::NaiveDate;
use std::collections::BTreeMap;

pub use index::Vault;

/// A resolved reference to another note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Vault-relative path of the target, always ending in `.md`
    pub path: String,
    /// Alias written after `|`, if any
    pub display: Option<String>,
}

impl Link {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            display: None,
        }
    }

    /// File stem of the target (`Areas/Health.md` -> `Health`)
    pub fn stem(&self) -> &str {
        file_stem(&self.path)
    }
}

/// Shape of a field value as written in a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Exactly one wiki-link
    Single(Link),
    /// A comma separated list of wiki-links
    Many(Vec<Link>),
    /// Anything else, kept verbatim
    Other(String),
}

impl FieldValue {
    /// Links carried by the value, in written order
    pub fn links(&self) -> Vec<&Link> {
        match self {
            FieldValue::Single(link) => vec![link],
            FieldValue::Many(links) => links.iter().collect(),
            FieldValue::Other(_) => Vec::new(),
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            FieldValue::Single(link) => Some(link),
            _ => None,
        }
    }
}

/// One task line of a note, as indexed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// Path of the note containing the task
    pub path: String,
    /// Zero-based line index within the note
    pub line: usize,
    /// Raw line text
    pub text: String,
    pub completed: bool,
    /// Bracketed inline fields on the line, keyed by canonical key
    pub fields: BTreeMap<String, FieldValue>,
    /// Trailing `^block-id`, without the caret
    pub block_id: Option<String>,
}

impl TaskRecord {
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(&canonical_key(key))
    }
}

/// A note of the vault with its inline fields and tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: String,
    pub name: String,
    /// Calendar day for daily notes (`YYYY-MM-DD.md`)
    pub day: Option<NaiveDate>,
    pub fields: BTreeMap<String, FieldValue>,
    pub tasks: Vec<TaskRecord>,
}

impl Document {
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(&canonical_key(key))
    }
}

/// Indexed, read-only access to the notes of a vault
///
/// Implementations are snapshots: every call observes the same state.
pub trait DocumentQuery {
    /// Look a note up by its vault-relative path
    fn document(&self, path: &str) -> Option<&Document>;

    /// All notes under `folder`, in path order
    fn documents(&self, folder: &str) -> Vec<&Document>;
}

/// Normalize a field key: trimmed, lowercase, inner whitespace as `-`
pub fn canonical_key(key: &str) -> String {
    key.trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// File stem of a vault path, without folders and `.md`
pub fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.strip_suffix(".md").unwrap_or(name)
}
