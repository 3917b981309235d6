use super::fields::{self, block_id, bracketed_fields, line_field};
use super::period::parse_day;
use super::{Document, DocumentQuery, TaskRecord, canonical_key, file_stem};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::debug;

/// In-memory index of every Markdown note in a vault
///
/// The index is a snapshot: it is built once from the notes' text and never
/// observes later writes. Build a new one to see fresh state.
#[derive(Debug, Default)]
pub struct Vault {
    documents: BTreeMap<String, Document>,
}

impl Vault {
    /// Index every `*.md` file below `root`
    ///
    /// Hidden directories (`.git`, `.obsidian`, ...) are skipped.
    pub fn load(root: &Path) -> Result<Self> {
        let mut sources = Vec::new();
        collect_markdown(root, root, &mut sources)?;
        debug!(root = %root.display(), notes = sources.len(), "indexed vault");
        Ok(Self::from_sources(sources))
    }

    /// Index notes given as `(vault-relative path, text)` pairs
    pub fn from_sources<I, P, T>(sources: I) -> Self
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<String>,
        T: AsRef<str>,
    {
        let mut sources: Vec<(String, T)> =
            sources.into_iter().map(|(p, t)| (p.into(), t)).collect();
        sources.sort_by(|a, b| a.0.cmp(&b.0));
        let resolver = LinkResolver::new(sources.iter().map(|(path, _)| path.as_str()));

        let documents = sources
            .iter()
            .map(|(path, text)| (path.clone(), index_document(path, text.as_ref(), &resolver)))
            .collect();
        Self { documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentQuery for Vault {
    fn document(&self, path: &str) -> Option<&Document> {
        self.documents.get(path)
    }

    fn documents(&self, folder: &str) -> Vec<&Document> {
        let prefix = format!("{}/", folder.trim_end_matches('/'));
        self.documents
            .values()
            .filter(|doc| folder.is_empty() || doc.path.starts_with(&prefix))
            .collect()
    }
}

/// Resolves wiki-link targets to vault paths
struct LinkResolver {
    paths: HashMap<String, String>,
    stems: HashMap<String, String>,
}

impl LinkResolver {
    fn new<'a>(paths: impl Iterator<Item = &'a str>) -> Self {
        let mut by_path = HashMap::new();
        let mut by_stem = HashMap::new();
        for path in paths {
            by_path.insert(path.to_string(), path.to_string());
            // Paths arrive sorted, so the first note with a given stem wins
            by_stem
                .entry(file_stem(path).to_string())
                .or_insert_with(|| path.to_string());
        }
        Self {
            paths: by_path,
            stems: by_stem,
        }
    }

    fn resolve(&self, target: &str) -> String {
        let with_ext = if target.ends_with(".md") {
            target.to_string()
        } else {
            format!("{}.md", target)
        };
        if let Some(path) = self.paths.get(&with_ext) {
            return path.clone();
        }
        self.stems.get(file_stem(&with_ext)).cloned().unwrap_or(with_ext)
    }
}

fn index_document(path: &str, text: &str, resolver: &LinkResolver) -> Document {
    let name = file_stem(path).to_string();
    let mut fields = BTreeMap::new();
    let mut tasks = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        if let Some(status) = task_status(line) {
            let task_fields = bracketed_fields(line)
                .into_iter()
                .map(|(key, value)| {
                    let value = fields::parse_value(&value, |t| resolver.resolve(t));
                    (canonical_key(&key), value)
                })
                .collect();
            tasks.push(TaskRecord {
                path: path.to_string(),
                line: line_no,
                text: line.to_string(),
                completed: status != ' ',
                fields: task_fields,
                block_id: block_id(line).map(str::to_string),
            });
        } else if let Some((key, value)) = line_field(line) {
            fields
                .entry(canonical_key(key))
                .or_insert_with(|| fields::parse_value(value, |t| resolver.resolve(t)));
        }
    }

    Document {
        path: path.to_string(),
        day: parse_day(&name),
        name,
        fields,
        tasks,
    }
}

/// Status character of a `- [?] ` task line
fn task_status(line: &str) -> Option<char> {
    let rest = line.trim_start().strip_prefix("- [")?;
    let mut chars = rest.chars();
    let status = chars.next()?;
    chars.as_str().starts_with("] ").then_some(status)
}

fn collect_markdown(root: &Path, dir: &Path, out: &mut Vec<(String, String)>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if path.is_dir() {
            if !hidden {
                collect_markdown(root, &path, out)?;
            }
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let relative = path
            .strip_prefix(root)
            .context("Note is outside of the vault")?
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read note {}", path.display()))?;
        out.push((relative, text));
    }
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(())
}
