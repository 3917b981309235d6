//! Inline field scanning
//!
//! Two field syntaxes are recognized:
//! - full-line fields: `Focused In:: [[2024-Q1]], [[2024-03]]`
//! - bracketed fields inside a line: `[🗓:: [[2024-03-01]]]`
//!
//! Bracketed values may themselves contain brackets (wiki-links), so the
//! closing bracket is found with a depth counter rather than a pattern.

use super::{FieldValue, Link};

const FIELD_SEPARATOR: &str = "::";

/// A `[key:: value]` field found at the start of a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketedField<'a> {
    pub key: &'a str,
    pub value: &'a str,
    /// Bytes consumed, including surrounding whitespace
    pub consumed: usize,
}

/// Scan a bracketed field at the start of `text`, skipping leading whitespace
///
/// Trailing whitespace after the closing bracket is consumed as well.
pub fn scan_bracketed(text: &str) -> Option<BracketedField<'_>> {
    let start = text.len() - text.trim_start().len();
    let rest = &text[start..];
    let body = rest.strip_prefix('[')?;
    if body.starts_with('[') {
        return None;
    }

    let separator = body.find(FIELD_SEPARATOR)?;
    let key = body[..separator].trim();
    if key.is_empty() || key.contains(['[', ']']) {
        return None;
    }

    let value_start = separator + FIELD_SEPARATOR.len();
    let value_end = value_start + closing_bracket(&body[value_start..])?;
    let value = body[value_start..value_end].trim();
    if value.is_empty() {
        return None;
    }

    // `[` + body up to and including the closing `]`
    let field_len = 1 + value_end + 1;
    let after = &rest[field_len..];
    let trailing = after.len() - after.trim_start().len();

    Some(BracketedField {
        key,
        value,
        consumed: start + field_len + trailing,
    })
}

/// Byte offset of the `]` closing the current bracket level
fn closing_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, ch) in text.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' if depth == 0 => return Some(offset),
            ']' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// All bracketed fields of a line, in order
pub fn bracketed_fields(line: &str) -> Vec<(String, String)> {
    let mut result = Vec::new();
    let mut offset = 0;
    while let Some(found) = line[offset..].find('[') {
        let at = offset + found;
        let rest = &line[at..];
        if rest.starts_with("[[") {
            // Skip over wiki-links, they are never fields
            offset = match rest.find("]]") {
                Some(end) => at + end + 2,
                None => break,
            };
            continue;
        }
        match scan_bracketed(rest) {
            Some(field) => {
                result.push((field.key.to_string(), field.value.to_string()));
                offset = at + field.consumed;
            }
            None => offset = at + 1,
        }
    }
    result
}

/// Parse a full-line `Key:: value` field
pub fn line_field(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    let separator = trimmed.find(FIELD_SEPARATOR)?;
    let key = trimmed[..separator].trim();
    if key.is_empty() || key.contains(['[', ']', '`']) || key.starts_with("- ") {
        return None;
    }
    Some((key, trimmed[separator + FIELD_SEPARATOR.len()..].trim()))
}

/// Split `[[target|alias]]` contents into target and alias
///
/// A `#heading` suffix on the target is dropped.
pub fn split_wiki_link(inner: &str) -> (&str, Option<&str>) {
    let (target, alias) = match inner.split_once('|') {
        Some((target, alias)) => (target, Some(alias.trim())),
        None => (inner, None),
    };
    let target = target.split('#').next().unwrap_or(target).trim();
    (target, alias.filter(|a| !a.is_empty()))
}

/// Interpret a raw field value, resolving wiki-link targets with `resolve`
///
/// A value made only of wiki-links separated by commas becomes `Single` or
/// `Many`; any other text is kept as `Other`.
pub fn parse_value(raw: &str, resolve: impl Fn(&str) -> String) -> FieldValue {
    let mut links = Vec::new();
    let mut rest = raw.trim();

    while !rest.is_empty() {
        let Some(body) = rest.strip_prefix("[[") else {
            return FieldValue::Other(raw.trim().to_string());
        };
        let Some(end) = body.find("]]") else {
            return FieldValue::Other(raw.trim().to_string());
        };
        let (target, alias) = split_wiki_link(&body[..end]);
        if target.is_empty() {
            return FieldValue::Other(raw.trim().to_string());
        }
        links.push(Link {
            path: resolve(target),
            display: alias.map(str::to_string),
        });

        rest = body[end + 2..].trim_start();
        if let Some(next) = rest.strip_prefix(',') {
            rest = next.trim_start();
        }
    }

    match links.len() {
        0 => FieldValue::Other(raw.trim().to_string()),
        1 => FieldValue::Single(links.remove(0)),
        _ => FieldValue::Many(links),
    }
}

/// Trailing `^block-id` of a line, if present
pub fn block_id(line: &str) -> Option<&str> {
    let last = line.trim_end().rsplit(char::is_whitespace).next()?;
    let id = last.strip_prefix('^')?;
    (!id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md(target: &str) -> String {
        format!("{}.md", target)
    }

    #[test]
    fn test_scan_bracketed_nested_link() {
        let field = scan_bracketed(" [🗓:: [[2024-03-01]]]  rest").unwrap();
        assert_eq!(field.key, "🗓");
        assert_eq!(field.value, "[[2024-03-01]]");
        assert_eq!(&" [🗓:: [[2024-03-01]]]  rest"[field.consumed..], "rest");
    }

    #[test]
    fn test_scan_bracketed_rejects_links_and_unclosed() {
        assert!(scan_bracketed("[[Link]]").is_none());
        assert!(scan_bracketed("[🗓:: [[2024-03-01]]").is_none());
        assert!(scan_bracketed("[plain text]").is_none());
        assert!(scan_bracketed("[key:: ]").is_none());
    }

    #[test]
    fn test_bracketed_fields_skips_links() {
        let fields = bracketed_fields("- [ ] call [[Bob|him]] [🗓:: [[2024-03-01]]] [🔁:: every day]");
        assert_eq!(
            fields,
            vec![
                ("🗓".to_string(), "[[2024-03-01]]".to_string()),
                ("🔁".to_string(), "every day".to_string()),
            ]
        );
    }

    #[test]
    fn test_line_field() {
        assert_eq!(
            line_field("Focused In:: [[2024-Q1]]"),
            Some(("Focused In", "[[2024-Q1]]"))
        );
        assert_eq!(line_field("no field here"), None);
        assert_eq!(line_field("- [ ] task [a:: b]"), None);
    }

    #[test]
    fn test_parse_value_shapes() {
        assert_eq!(
            parse_value("[[2024-Q1]]", md),
            FieldValue::Single(Link::new("2024-Q1.md"))
        );
        assert_eq!(
            parse_value("[[2024-Q1]], [[2024-Q2|next]]", md),
            FieldValue::Many(vec![
                Link::new("2024-Q1.md"),
                Link {
                    path: "2024-Q2.md".into(),
                    display: Some("next".into())
                },
            ])
        );
        assert_eq!(
            parse_value("soon [[x]]", md),
            FieldValue::Other("soon [[x]]".into())
        );
        assert_eq!(parse_value("true", md), FieldValue::Other("true".into()));
    }

    #[test]
    fn test_block_id() {
        assert_eq!(block_id("- [ ] task ^abc-1"), Some("abc-1"));
        assert_eq!(block_id("- [ ] task"), None);
        assert_eq!(block_id("- [ ] x ^"), None);
    }
}
