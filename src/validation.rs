//! Validation of MCP tool arguments
//!
//! Every function returns an `INVALID_PARAMS` error whose message is shown
//! to the client.

use crate::vault::period::{DAY_FORMAT, parse_month, parse_quarter, parse_week};
use chrono::NaiveDate;
use mcp_attr::Result as McpResult;

fn invalid_params(message: String) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message, true)
}

/// Parse a `YYYY-MM-DD` date argument
///
/// # Arguments
/// * `date_str` - Date string in YYYY-MM-DD format
///
/// # Returns
/// Result containing the parsed NaiveDate or an `INVALID_PARAMS` error
pub fn parse_date(date_str: &str) -> McpResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), DAY_FORMAT).map_err(|_| {
        invalid_params(format!(
            "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2024-03-01')",
            date_str
        ))
    })
}

/// Normalize a note argument into a vault-relative path
///
/// Backslashes become `/`, a leading `/` is dropped and `.md` is appended
/// when missing. Paths leaving the vault are rejected.
///
/// # Arguments
/// * `note` - Note path as given by the client, with or without `.md`
///
/// # Returns
/// Result containing the path relative to the vault root
pub fn normalize_note_path(note: &str) -> McpResult<String> {
    // Accept Windows separators and absolute-looking paths
    let path = note.trim().replace('\\', "/");
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return Err(invalid_params("Note path is empty".to_string()));
    }
    if path.split('/').any(|part| part == ".." || part.is_empty()) {
        return Err(invalid_params(format!(
            "Invalid note path '{}'. Use a path relative to the vault root (e.g., 'Journal/2024-03-01.md')",
            note
        )));
    }
    if path.ends_with(".md") {
        Ok(path.to_string())
    } else {
        Ok(format!("{}.md", path))
    }
}

/// Validate a period label: `YYYY-Www`, `YYYY-MM` or `YYYY-Qn`
///
/// # Arguments
/// * `label` - Period label, surrounding whitespace is ignored
///
/// # Returns
/// Result containing the trimmed label
pub fn parse_period(label: &str) -> McpResult<String> {
    let label = label.trim();
    if parse_week(label).is_some() || parse_month(label).is_some() || parse_quarter(label).is_some()
    {
        Ok(label.to_string())
    } else {
        Err(invalid_params(format!(
            "Invalid period '{}'. Use a week (2024-W9), month (2024-03) or quarter (2024-Q1)",
            label
        )))
    }
}

/// Convert a 1-based line number argument into a line index
///
/// # Arguments
/// * `line` - Line number as shown in editors, starting at 1
///
/// # Returns
/// Result containing the zero-based line index
pub fn parse_line_number(line: u32) -> McpResult<usize> {
    match line {
        0 => Err(invalid_params(
            "Line numbers start at 1 (the first line of the note)".to_string(),
        )),
        n => Ok(n as usize - 1),
    }
}
