//! Period focus of Areas, Goals and Key Results
//!
//! A note is focused in a period when its focus field (`Focused In:: ...`)
//! links the periodic note named after that period, e.g. `[[2024-W9]]`.

use crate::storage::DocumentStore;
use crate::vault::fields::{line_field, split_wiki_link};
use crate::vault::period::label_spellings;
use crate::vault::{Document, FieldValue, Link, canonical_key};
use anyhow::Result;
use tracing::{debug, warn};

/// Marker in a note's path showing it is complete
const COMPLETE_MARKER: char = '✅';

pub struct FocusResolver {
    field: String,
}

impl FocusResolver {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Whether `document` is focused in the period named `label`
    ///
    /// A focus field of unexpected shape is reported and counts as not
    /// focused.
    pub fn is_focused(&self, document: &Document, label: &str) -> bool {
        match document.field(&self.field) {
            None => false,
            Some(FieldValue::Single(link)) => links_period(link, label),
            Some(FieldValue::Many(links)) => links.iter().any(|l| links_period(l, label)),
            Some(FieldValue::Other(value)) if value.is_empty() => false,
            Some(FieldValue::Other(value)) => {
                warn!(
                    path = %document.path,
                    field = %self.field,
                    value = %value,
                    "Could not determine the type of focus field"
                );
                false
            }
        }
    }

    /// Add or remove `[[label]]` in the focus field of the note at `path`
    pub async fn toggle_focus<S: DocumentStore>(
        &self,
        store: &S,
        path: &str,
        currently_focused: bool,
        label: &str,
    ) -> Result<()> {
        let text = store.read_document(path).await?;
        let updated = rewrite_focus(&text, &self.field, currently_focused, label);
        if updated == text {
            debug!(path, label, "Focus field already up to date");
            return Ok(());
        }
        store.write_document(path, &updated).await?;
        debug!(path, label, focused = !currently_focused, "Toggled focus");
        Ok(())
    }
}

/// Whether a note is complete, shown by a `✅` in its path
pub fn is_complete(document: &Document) -> bool {
    document.path.contains(COMPLETE_MARKER)
}

fn links_period(link: &Link, label: &str) -> bool {
    names_period(&link.path, label)
}

/// Whether a note path or link target names the periodic note `label`
///
/// The target matches when it ends with `<label>.md` for any spelling of the
/// label, so `Journal/2024-W09.md` names the week `2024-W9`.
fn names_period(target: &str, label: &str) -> bool {
    let target = target.strip_suffix(".md").unwrap_or(target);
    label_spellings(label)
        .iter()
        .any(|spelling| target.ends_with(spelling.as_str()))
}

/// Rewrite the focus field line of a note's text
///
/// When `currently_focused`, every entry linking `label` is removed from the
/// comma separated list; otherwise `[[label]]` is appended to it. Other
/// entries are kept as written. A note without a focus line gets one
/// appended.
pub fn rewrite_focus(text: &str, field: &str, currently_focused: bool, label: &str) -> String {
    let key = canonical_key(field);
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();

    let position = lines.iter().position(|line| {
        line_field(line).is_some_and(|(line_key, _)| canonical_key(line_key) == key)
    });

    let Some(index) = position else {
        if currently_focused {
            return text.to_string();
        }
        let entry = format!("{}:: [[{}]]", field, label);
        return if text.is_empty() {
            entry
        } else if text.ends_with('\n') {
            format!("{}{}\n", text, entry)
        } else {
            format!("{}\n{}", text, entry)
        };
    };

    let line = &lines[index];
    let separator = line.find("::").unwrap_or(line.len());
    let head = line[..separator].to_string();
    let value = line[separator..].trim_start_matches(':').trim();

    let new_entry = format!("[[{}]]", label);
    let mut entries: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .collect();
    if currently_focused {
        entries.retain(|entry| !entry_links(entry, label));
    } else if !entries.iter().any(|entry| entry_links(entry, label)) {
        entries.push(&new_entry);
    }

    let rewritten = if entries.is_empty() {
        format!("{}::", head)
    } else {
        format!("{}:: {}", head, entries.join(", "))
    };
    lines[index] = rewritten;
    lines.join("\n")
}

/// Whether a written `[[target]]` entry links the note named `label`
fn entry_links(entry: &str, label: &str) -> bool {
    entry
        .strip_prefix("[[")
        .and_then(|e| e.strip_suffix("]]"))
        .is_some_and(|inner| names_period(split_wiki_link(inner).0, label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::vault::{DocumentQuery, Vault};

    const FIELD: &str = "Focused In";

    fn document(path: &str, text: &str) -> Document {
        let vault = Vault::from_sources([(path, text)]);
        vault.document(path).cloned().unwrap()
    }

    #[test]
    fn test_is_focused_single_and_many() {
        let resolver = FocusResolver::new(FIELD);
        let single = document("Goals/Run.md", "Focused In:: [[2024-03]]");
        assert!(resolver.is_focused(&single, "2024-03"));
        assert!(!resolver.is_focused(&single, "2024-04"));

        let many = document("Goals/Run.md", "Focused In:: [[2024-03]], [[2024-W09]]");
        assert!(resolver.is_focused(&many, "2024-W09"));
        assert!(!resolver.is_focused(&many, "2024-W10"));
    }

    #[test]
    fn test_is_focused_missing_or_malformed() {
        let resolver = FocusResolver::new(FIELD);
        assert!(!resolver.is_focused(&document("a.md", "# nothing"), "2024-03"));
        assert!(!resolver.is_focused(&document("a.md", "Focused In:: March"), "2024-03"));
        assert!(!resolver.is_focused(&document("a.md", "Focused In::"), "2024-03"));
    }

    #[test]
    fn test_week_spellings_name_the_same_period() {
        let resolver = FocusResolver::new(FIELD);
        let padded = document("KRs/Run.md", "Focused In:: [[2024-W09]]");
        let short = document("KRs/Run.md", "Focused In:: [[2024-W9]]");
        assert!(resolver.is_focused(&padded, "2024-W9"));
        assert!(resolver.is_focused(&short, "2024-W9"));
        assert!(resolver.is_focused(&short, "2024-W09"));
        assert!(!resolver.is_focused(&short, "2024-W19"));

        assert_eq!(
            rewrite_focus("Focused In:: [[2024-W09]], [[2024-03]]", FIELD, true, "2024-W9"),
            "Focused In:: [[2024-03]]"
        );
        assert_eq!(
            rewrite_focus("Focused In:: [[2024-W9]]", FIELD, false, "2024-W09"),
            "Focused In:: [[2024-W9]]"
        );
    }

    // Whatever counts as focused is also what unfocusing removes
    #[test]
    fn test_removal_matches_is_focused() {
        let resolver = FocusResolver::new(FIELD);
        let text = "Focused In:: [[Archive-2024-03]], [[2024-Q1]]";
        assert!(resolver.is_focused(&document("Goals/Run.md", text), "2024-03"));

        let removed = rewrite_focus(text, FIELD, true, "2024-03");
        assert_eq!(removed, "Focused In:: [[2024-Q1]]");
        assert!(!resolver.is_focused(&document("Goals/Run.md", &removed), "2024-03"));
    }

    #[test]
    fn test_is_complete() {
        assert!(is_complete(&document("Goals/✅ Run.md", "")));
        assert!(!is_complete(&document("Goals/Run.md", "")));
    }

    #[test]
    fn test_rewrite_focus_add_and_remove() {
        let text = "Area:: [[Health]]\nFocused In:: [[2024-03]]\nbody";

        let added = rewrite_focus(text, FIELD, false, "2024-W09");
        assert_eq!(
            added,
            "Area:: [[Health]]\nFocused In:: [[2024-03]], [[2024-W09]]\nbody"
        );

        let removed = rewrite_focus(&added, FIELD, true, "2024-03");
        assert_eq!(removed, "Area:: [[Health]]\nFocused In:: [[2024-W09]]\nbody");

        let emptied = rewrite_focus(&removed, FIELD, true, "2024-W09");
        assert_eq!(emptied, "Area:: [[Health]]\nFocused In::\nbody");
    }

    #[test]
    fn test_rewrite_focus_keeps_aliases_and_paths() {
        let text = "Focused In:: [[Periodic/2024-03|March]], [[2024-Q1]]";
        assert_eq!(
            rewrite_focus(text, FIELD, true, "2024-03"),
            "Focused In:: [[2024-Q1]]"
        );
        // Adding an entry already present is a no-op
        assert_eq!(rewrite_focus(text, FIELD, false, "2024-Q1"), text);
    }

    #[test]
    fn test_rewrite_focus_creates_field() {
        assert_eq!(
            rewrite_focus("# Run\n", FIELD, false, "2024-03"),
            "# Run\nFocused In:: [[2024-03]]\n"
        );
        assert_eq!(rewrite_focus("", FIELD, false, "2024-03"), "Focused In:: [[2024-03]]");
        assert_eq!(rewrite_focus("# Run", FIELD, true, "2024-03"), "# Run");
    }

    #[tokio::test]
    async fn test_toggle_focus_writes_note() {
        let store = MemoryStore::new().with("Goals/Run.md", "Focused In:: [[2024-03]]");
        let resolver = FocusResolver::new(FIELD);

        resolver
            .toggle_focus(&store, "Goals/Run.md", false, "2024-04")
            .await
            .unwrap();
        assert_eq!(
            store.get("Goals/Run.md").unwrap(),
            "Focused In:: [[2024-03]], [[2024-04]]"
        );

        resolver
            .toggle_focus(&store, "Goals/Run.md", true, "2024-03")
            .await
            .unwrap();
        assert_eq!(store.get("Goals/Run.md").unwrap(), "Focused In:: [[2024-04]]");
    }
}
