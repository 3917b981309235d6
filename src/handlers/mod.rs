//! MCP tool handlers for the focus server
//!
//! Each handler validates its arguments, performs the operation and formats
//! the response. Handlers editing notes hold `edit_lock` for the whole
//! read-modify-write.

pub mod focus;
pub mod graph;
pub mod parse_task;
pub mod schedule_task;
pub mod toggle_task;
