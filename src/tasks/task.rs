use super::blocks::{Block, DateField, RecurrenceRule};
use super::parsing::{ParseError, parse};
use super::recurrence::{self, next_occurrence};
use super::rendering::render;
use crate::storage::DocumentStore;
use crate::vault::TaskRecord;
use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Where a task line lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOrigin {
    pub path: String,
    /// Zero-based line index
    pub line: usize,
}

/// Inputs of a toggle that come from outside the task
#[derive(Debug, Clone, Copy)]
pub struct ToggleContext<'a> {
    /// Date stamped on completion and used as anchor by lenient rules
    pub today: NaiveDate,
    /// Shared log note receiving completed occurrences
    pub log_path: &'a str,
}

/// What a toggle did
#[derive(Debug, Clone, PartialEq)]
pub enum Toggle {
    /// The task itself was flipped in place
    Flipped,
    /// A recurring task was completed in place and `next` is its next
    /// occurrence. With `logged_in_place` the originating note already holds
    /// both lines.
    Recurred { next: Task, logged_in_place: bool },
    /// Nothing changed
    Unchanged,
}

impl Toggle {
    /// The task to show where the toggled one was
    pub fn current<'a>(&'a self, original: &'a Task) -> &'a Task {
        match self {
            Toggle::Recurred { next, .. } => next,
            Toggle::Flipped | Toggle::Unchanged => original,
        }
    }
}

/// A parsed task line
///
/// The first block is always the checkbox; due, completion and recurrence
/// blocks appear at most once each.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    blocks: Vec<Block>,
    origin: Option<TaskOrigin>,
}

impl Task {
    /// Parse a task line; an indexed `record` also supplies the line's origin
    pub fn from_line(line: &str, record: Option<&TaskRecord>) -> Result<Self, ParseError> {
        let blocks = parse(line, record)?;
        Ok(Self {
            blocks,
            origin: record.map(|r| TaskOrigin {
                path: r.path.clone(),
                line: r.line,
            }),
        })
    }

    /// Build a task from blocks, `None` unless the first block is a checkbox
    pub fn from_blocks(blocks: Vec<Block>) -> Option<Self> {
        matches!(blocks.first(), Some(Block::Checkbox { .. })).then_some(Self {
            blocks,
            origin: None,
        })
    }

    pub fn with_origin(mut self, origin: TaskOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn origin(&self) -> Option<&TaskOrigin> {
        self.origin.as_ref()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_checked(&self) -> bool {
        matches!(
            self.blocks.first(),
            Some(Block::Checkbox {
                is_checked: true,
                ..
            })
        )
    }

    pub fn due(&self) -> Option<&DateField> {
        self.blocks.iter().find_map(|b| match b {
            Block::Due(field) => Some(field),
            _ => None,
        })
    }

    pub fn completed(&self) -> Option<&DateField> {
        self.blocks.iter().find_map(|b| match b {
            Block::Completed(field) => Some(field),
            _ => None,
        })
    }

    pub fn recurrence(&self) -> Option<&RecurrenceRule> {
        self.blocks.iter().find_map(|b| match b {
            Block::Recurring(rule) => Some(rule),
            _ => None,
        })
    }

    pub fn render(&self) -> String {
        render(&self.blocks)
    }

    /// Line text without the checkbox
    pub fn text(&self) -> String {
        render(&self.blocks[1..]).trim().to_string()
    }

    pub fn next_due_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        let rule = self.recurrence()?;
        next_occurrence(rule, self.due().map(|d| d.date), today)
    }

    /// Copy of the task with its due date replaced, added or removed
    pub fn with_due(&self, date: Option<NaiveDate>) -> Task {
        let mut task = self.clone();
        let position = task.blocks.iter().position(|b| matches!(b, Block::Due(_)));
        match (position, date) {
            (Some(index), Some(date)) => task.blocks[index] = Block::Due(DateField::new(date)),
            (Some(index), None) => {
                task.blocks.remove(index);
            }
            (None, Some(date)) => task.blocks.push(Block::Due(DateField::new(date))),
            (None, None) => {}
        }
        task
    }

    /// Flip the checkbox, stamping or clearing the completion date
    fn flip(&mut self, today: NaiveDate) {
        let checked = self.is_checked();
        if let Some(Block::Checkbox { is_checked, .. }) = self.blocks.first_mut() {
            *is_checked = !checked;
        }
        if checked {
            self.blocks.retain(|b| !matches!(b, Block::Completed(_)));
        } else if self.completed().is_none() {
            self.blocks.push(Block::Completed(DateField::new(today)));
        }
    }

    /// Toggle the checkbox
    ///
    /// Non-recurring tasks, and recurring ones being reopened, are flipped in
    /// place. Completing a recurring task also flips it in place, derives its
    /// next occurrence and records the completed line: appended to the shared
    /// log, or, for `@` rules, written together with the next occurrence over
    /// the originating line.
    ///
    /// Without a computable next date the task is left untouched.
    pub async fn toggle<S: DocumentStore>(
        &mut self,
        store: &S,
        ctx: &ToggleContext<'_>,
    ) -> Result<Toggle> {
        let rule = match self.recurrence().copied() {
            Some(rule) if !self.is_checked() => rule,
            _ => {
                self.flip(ctx.today);
                return Ok(Toggle::Flipped);
            }
        };

        let next_due = match (self.due(), self.next_due_date(ctx.today)) {
            (Some(_), Some(next_due)) => next_due,
            _ => {
                warn!(line = %self.render(), "Cannot compute next occurrence, leaving task unchanged");
                return Ok(Toggle::Unchanged);
            }
        };

        let next = self.with_due(Some(next_due));
        let mut completed = self.clone();
        completed.flip(ctx.today);

        let logged_in_place = match (&self.origin, rule.log_in_place) {
            (Some(origin), true) => {
                recurrence::log_in_place(store, origin, &next, &completed).await?;
                true
            }
            (None, true) => {
                warn!(line = %self.render(), "Task has no known origin, logging to the shared log");
                recurrence::log_completed(store, ctx.log_path, &completed).await?;
                false
            }
            (_, false) => {
                recurrence::log_completed(store, ctx.log_path, &completed).await?;
                false
            }
        };
        debug!(next_due = %next_due, logged_in_place, "Recurring task completed");

        *self = completed;
        Ok(Toggle::Recurred {
            next,
            logged_in_place,
        })
    }
}
