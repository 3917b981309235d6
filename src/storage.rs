//! Read/write access to note text
//!
//! `DocumentStore` is the seam between the editing operations and wherever
//! notes live. `FsStore` works on a vault directory (optionally committing
//! every write with git), `MemoryStore` keeps notes in memory.

use crate::git_ops::GitOps;
use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Raw text storage for notes addressed by vault-relative path
pub trait DocumentStore {
    /// Full text of a note
    fn read_document(&self, path: &str) -> impl Future<Output = Result<String>> + Send;

    /// Replace the full text of a note, creating it when missing
    fn write_document(&self, path: &str, text: &str) -> impl Future<Output = Result<()>> + Send;

    /// `Some(path)` when the note exists
    fn resolve_path(&self, path: &str) -> impl Future<Output = Option<String>> + Send;
}

/// Notes stored as files below a vault root
pub struct FsStore {
    root: PathBuf,
    sync_git: bool,
    git_ops: GitOps,
}

impl FsStore {
    /// Create a store for the vault at `root`
    ///
    /// With `sync_git`, pending remote changes are pulled first and every
    /// write is committed.
    pub fn new(root: impl AsRef<Path>, sync_git: bool) -> Self {
        let root = root.as_ref().to_path_buf();
        let git_ops = GitOps::new(&root);

        if sync_git
            && git_ops.is_git_managed()
            && let Err(e) = git_ops.pull()
        {
            warn!(error = %e, "Git pull failed");
        }

        Self {
            root,
            sync_git,
            git_ops,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Push committed changes when git sync is enabled
    pub fn shutdown(&self) -> Result<()> {
        if self.sync_git && self.git_ops.is_git_managed() {
            self.git_ops.push().context("Failed to push changes")?;
        }
        Ok(())
    }
}

impl DocumentStore for FsStore {
    async fn read_document(&self, path: &str) -> Result<String> {
        let full = self.full_path(path);
        tokio::fs::read_to_string(&full)
            .await
            .with_context(|| format!("Failed to read note {}", full.display()))
    }

    async fn write_document(&self, path: &str, text: &str) -> Result<()> {
        let full = self.full_path(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, text)
            .await
            .with_context(|| format!("Failed to write note {}", full.display()))?;
        debug!(path, "Wrote note");

        if self.sync_git {
            self.git_ops
                .commit(&full, &format!("Update {}", path))
                .context("Failed to commit note")?;
        }
        Ok(())
    }

    async fn resolve_path(&self, path: &str) -> Option<String> {
        match tokio::fs::try_exists(self.full_path(path)).await {
            Ok(true) => Some(path.to_string()),
            _ => None,
        }
    }
}

/// Notes kept in memory, keyed by path
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(self, path: &str, text: &str) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&self, path: &str, text: &str) {
        self.lock().insert(path.to_string(), text.to_string());
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.lock().get(path).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still consistent: every write is a single insert
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    async fn read_document(&self, path: &str) -> Result<String> {
        self.get(path)
            .with_context(|| format!("Note {} does not exist", path))
    }

    async fn write_document(&self, path: &str, text: &str) -> Result<()> {
        self.insert(path, text);
        Ok(())
    }

    async fn resolve_path(&self, path: &str) -> Option<String> {
        self.lock().contains_key(path).then(|| path.to_string())
    }
}

/// Replace line `index` of a note with `lines`
///
/// The new lines take the line ending of the replaced one, so CRLF notes
/// stay CRLF.
pub async fn splice_lines<S: DocumentStore>(
    store: &S,
    path: &str,
    index: usize,
    lines: &[String],
) -> Result<()> {
    let text = store.read_document(path).await?;
    let all: Vec<&str> = text.split('\n').collect();
    if index >= all.len() {
        bail!(
            "Line {} is out of range for {} ({} lines)",
            index,
            path,
            all.len()
        );
    }

    let ending = if all[index].ends_with('\r') { "\r" } else { "" };
    let replacement: Vec<String> = lines
        .iter()
        .map(|line| format!("{}{}", line.trim_end_matches('\r'), ending))
        .collect();

    let mut spliced: Vec<&str> = all[..index].to_vec();
    spliced.extend(replacement.iter().map(String::as_str));
    spliced.extend_from_slice(&all[index + 1..]);
    store.write_document(path, &spliced.join("\n")).await
}

/// Append a line to a note, creating the note when missing
pub async fn append_line<S: DocumentStore>(store: &S, path: &str, line: &str) -> Result<()> {
    let text = match store.resolve_path(path).await {
        Some(existing) => {
            let old = store.read_document(&existing).await?;
            if old.is_empty() || old.ends_with('\n') {
                format!("{}{}", old, line)
            } else {
                format!("{}\n{}", old, line)
            }
        }
        None => line.to_string(),
    };
    store.write_document(path, &text).await
}
