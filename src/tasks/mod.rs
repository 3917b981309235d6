//! Task lines: tokenizing, rendering, recurrence and editing
//!
//! - `blocks`: the block model of a task line
//! - `parsing`: line text to blocks
//! - `rendering`: blocks back to line text
//! - `recurrence`: next occurrence dates and history logging
//! - `task`: the `Task` entity and its toggle
//! - `edit`: read-modify-write of single task lines in a note

pub mod blocks;
pub mod edit;
pub mod parsing;
pub mod recurrence;
pub mod rendering;
pub mod task;

pub use blocks::{Block, DateField, Period, RecurrenceRule};
pub use parsing::{ParseError, parse};
pub use rendering::render;
pub use task::{Task, TaskOrigin, Toggle, ToggleContext};
