//! Task line serialization, the inverse of `parsing`

use super::blocks::{Block, RecurrenceRule};
use crate::vault::period::day_label;
use std::fmt;

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count > 1 {
            write!(f, "every {} {}s", self.count, self.period.as_str())?;
        } else {
            write!(f, "every {}", self.period.as_str())?;
        }
        if self.strict {
            f.write_str("!")?;
        }
        if self.log_in_place {
            f.write_str("@")?;
        }
        Ok(())
    }
}

/// Render one block on its own
///
/// Field blocks carry a leading space, the checkbox a trailing one.
pub fn render_block(block: &Block) -> String {
    match block {
        Block::Checkbox { is_checked, indent } => {
            format!(
                "{}- [{}] ",
                " ".repeat(*indent),
                if *is_checked { 'x' } else { ' ' }
            )
        }
        Block::Text { content } => content.clone(),
        Block::Link {
            target,
            alias: Some(alias),
        } => format!("[[{}|{}]]", target, alias),
        Block::Link { target, alias: None } => format!("[[{}]]", target),
        Block::Due(field) | Block::Completed(field) => {
            let marker = block.marker().unwrap_or_default();
            format!(" [{}:: [[{}]]]", marker, day_label(field.date))
        }
        Block::Recurring(rule) => {
            let marker = block.marker().unwrap_or_default();
            format!(" [{}:: {}]", marker, rule)
        }
    }
}

/// Render a block sequence as a task line
///
/// Blocks are joined with a single space; no separator is added where a
/// block already supplies whitespace at the boundary.
pub fn render(blocks: &[Block]) -> String {
    let mut line = String::new();
    for block in blocks {
        let piece = render_block(block);
        if piece.is_empty() {
            continue;
        }
        let needs_space = !line.is_empty()
            && !line.ends_with(char::is_whitespace)
            && !piece.starts_with(char::is_whitespace);
        if needs_space {
            line.push(' ');
        }
        line.push_str(&piece);
    }
    line.trim_end().to_string()
}
