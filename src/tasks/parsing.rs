//! Task line tokenizer
//!
//! A task line is split into blocks left to right. At every offset the
//! recognizers are tried in a fixed order: free text up to the next `[`,
//! a wiki-link, a dated field, a recurrence field. Free text is always
//! flushed first, so a `[` only starts a token attempt at a token boundary.

use super::blocks::{
    Block, COMPLETED_MARKER, DUE_MARKER, DateField, Period, RECURRING_MARKER, RecurrenceRule,
};
use crate::vault::TaskRecord;
use crate::vault::fields::{scan_bracketed, split_wiki_link};
use crate::vault::period::parse_day;
use thiserror::Error;

/// Errors produced while tokenizing a task line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line does not start with `- [ ]` / `- [x]`
    #[error("could not parse task checkbox in line `{line}`")]
    Malformed { line: String },

    /// No recognizer matched; `partial` holds the blocks read so far
    #[error("could not parse line `{line}`: stuck at offset {offset} of {}", .line.len())]
    UnparsableToken {
        line: String,
        offset: usize,
        partial: Vec<Block>,
    },
}

/// Tokenize a task line
///
/// When the line was indexed, `record` supplies the note paths its date
/// fields link to.
pub fn parse(line: &str, record: Option<&TaskRecord>) -> Result<Vec<Block>, ParseError> {
    let (checkbox, mut offset) = checkbox(line).ok_or_else(|| ParseError::Malformed {
        line: line.to_string(),
    })?;
    let mut blocks = vec![checkbox];

    while offset < line.len() {
        let rest = &line[offset..];

        if let Some((block, consumed)) = text(rest) {
            if !matches!(&block, Block::Text { content } if content.is_empty()) {
                blocks.push(block);
            }
            offset += consumed;
            continue;
        }

        let token = link(rest)
            .or_else(|| dated_field(rest, record))
            .or_else(|| recurring_field(rest));

        match token {
            Some((block, consumed)) if !has_field(&blocks, &block) => {
                blocks.push(block);
                offset += consumed;
            }
            _ => {
                return Err(ParseError::UnparsableToken {
                    line: line.to_string(),
                    offset,
                    partial: blocks,
                });
            }
        }
    }

    Ok(blocks)
}

/// A line holds at most one field block of each kind
fn has_field(blocks: &[Block], block: &Block) -> bool {
    block.marker().is_some()
        && blocks
            .iter()
            .any(|b| std::mem::discriminant(b) == std::mem::discriminant(block))
}

/// `<indent>- [?] ` prefix
fn checkbox(line: &str) -> Option<(Block, usize)> {
    let body = line.trim_start();
    let indent = line.len() - body.len();

    let rest = body.strip_prefix('-')?;
    let rest = strip_one_whitespace(rest)?;
    let rest = rest.strip_prefix('[')?;
    let mut chars = rest.chars();
    let status = chars.next()?;
    let rest = chars.as_str().strip_prefix(']')?;
    let rest = if rest.is_empty() {
        rest
    } else {
        strip_one_whitespace(rest)?
    };

    let block = Block::Checkbox {
        is_checked: status != ' ',
        indent: line[..indent].chars().count(),
    };
    Some((block, line.len() - rest.len()))
}

fn strip_one_whitespace(text: &str) -> Option<&str> {
    let mut chars = text.chars();
    chars
        .next()
        .filter(|c| c.is_whitespace())
        .map(|_| chars.as_str())
}

/// Free text up to the next `[` or the end of the line
fn text(rest: &str) -> Option<(Block, usize)> {
    let end = rest.find('[').unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let content = rest[..end].trim().to_string();
    Some((Block::Text { content }, end))
}

/// `[[target]]` or `[[target|alias]]`, with surrounding whitespace
fn link(rest: &str) -> Option<(Block, usize)> {
    let start = rest.len() - rest.trim_start().len();
    let body = rest[start..].strip_prefix("[[")?;
    let end = body.find("]]")?;
    let inner = &body[..end];

    let (target, alias) = match inner.split_once('|') {
        Some((target, alias)) => (target, Some(alias)),
        None => (inner, None),
    };
    if target.is_empty() && alias.is_none_or(str::is_empty) {
        return None;
    }

    let after = &body[end + 2..];
    let trailing = after.len() - after.trim_start().len();
    let block = Block::Link {
        target: target.to_string(),
        alias: alias.map(str::to_string),
    };
    Some((block, start + 2 + end + 2 + trailing))
}

/// `[🗓:: [[YYYY-MM-DD]]]` or `[✅:: [[YYYY-MM-DD]]]`
fn dated_field(rest: &str, record: Option<&TaskRecord>) -> Option<(Block, usize)> {
    let field = scan_bracketed(rest)?;
    let marker = normalize_marker(field.key);
    if marker != DUE_MARKER && marker != COMPLETED_MARKER {
        return None;
    }

    let inner = field.value.strip_prefix("[[")?.strip_suffix("]]")?;
    let (target, _) = split_wiki_link(inner);
    let date = parse_day(target)?;

    let source_file_path = record
        .and_then(|r| r.field(marker))
        .and_then(|value| value.as_link())
        .map(|link| link.path.clone());
    let value = DateField {
        date,
        source_file_path,
    };

    let block = if marker == DUE_MARKER {
        Block::Due(value)
    } else {
        Block::Completed(value)
    };
    Some((block, field.consumed))
}

/// `[🔁:: every <n>? <day|month>s?!?@?]`
fn recurring_field(rest: &str) -> Option<(Block, usize)> {
    let field = scan_bracketed(rest)?;
    if normalize_marker(field.key) != RECURRING_MARKER {
        return None;
    }
    let rule = parse_rule(field.value)?;
    Some((Block::Recurring(rule), field.consumed))
}

/// Emoji markers may carry a trailing variation selector
fn normalize_marker(key: &str) -> &str {
    key.trim().trim_end_matches('\u{fe0f}')
}

/// Parse a recurrence value such as `every day`, `every 3 months!@`
pub fn parse_rule(value: &str) -> Option<RecurrenceRule> {
    let after_every = value.trim().strip_prefix("every")?;

    let rest = after_every.trim_start();
    let leading_space = rest.len() < after_every.len();
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let count = if digits == 0 {
        1
    } else {
        rest[..digits].parse().ok()?
    };
    if count == 0 {
        return None;
    }

    let after_count = &rest[digits..];
    let rest = after_count.trim_start();
    // The unit is separated by whitespace, from the count or from `every`
    let separated = if digits > 0 {
        rest.len() < after_count.len()
    } else {
        leading_space
    };
    if !separated {
        return None;
    }

    let (period, rest) = if let Some(rest) = rest.strip_prefix("day") {
        (Period::Day, rest)
    } else if let Some(rest) = rest.strip_prefix("month") {
        (Period::Month, rest)
    } else {
        return None;
    };
    let rest = rest.strip_prefix('s').unwrap_or(rest);
    let (strict, rest) = match rest.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    let (log_in_place, rest) = match rest.strip_prefix('@') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    // Trailing words would be lost when the rule is rendered again
    if !rest.trim().is_empty() {
        return None;
    }

    Some(RecurrenceRule {
        period,
        count,
        strict,
        log_in_place,
    })
}
