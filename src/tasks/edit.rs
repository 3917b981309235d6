//! Editing task lines inside notes

use super::task::{Task, TaskOrigin, Toggle, ToggleContext};
use crate::storage::{DocumentStore, splice_lines};
use crate::vault::TaskRecord;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::debug;

/// Read line `line` of a note and parse it as a task
async fn read_task<S: DocumentStore>(
    store: &S,
    path: &str,
    line: usize,
    record: Option<&TaskRecord>,
) -> Result<Task> {
    let text = store.read_document(path).await?;
    let raw = text
        .split('\n')
        .nth(line)
        .with_context(|| format!("Line {} is out of range for {}", line, path))?;
    let task = Task::from_line(raw.trim_end_matches('\r'), record)
        .with_context(|| format!("Line {} of {} is not a task", line, path))?;
    Ok(task.with_origin(TaskOrigin {
        path: path.to_string(),
        line,
    }))
}

/// Toggle the task at line `line` of a note and write the result back
///
/// Returns the task now shown at that line: the next occurrence for a
/// completed recurring task, the toggled task otherwise.
pub async fn toggle_line<S: DocumentStore>(
    store: &S,
    path: &str,
    line: usize,
    record: Option<&TaskRecord>,
    ctx: &ToggleContext<'_>,
) -> Result<Task> {
    let mut task = read_task(store, path, line, record).await?;
    let outcome = task.toggle(store, ctx).await?;

    match &outcome {
        // The toggle already wrote both lines over the original one
        Toggle::Recurred {
            next,
            logged_in_place: true,
        } => Ok(next.clone()),
        Toggle::Unchanged => Ok(task),
        Toggle::Flipped | Toggle::Recurred { .. } => {
            let current = outcome.current(&task).clone();
            splice_lines(store, path, line, &[current.render()]).await?;
            debug!(path, line, "Toggled task");
            Ok(current)
        }
    }
}

/// Set or clear the due date of the task at line `line` of a note
pub async fn reschedule<S: DocumentStore>(
    store: &S,
    path: &str,
    line: usize,
    record: Option<&TaskRecord>,
    date: Option<NaiveDate>,
) -> Result<Task> {
    let task = read_task(store, path, line, record).await?.with_due(date);
    splice_lines(store, path, line, &[task.render()]).await?;
    debug!(path, line, due = ?date, "Rescheduled task");
    Ok(task)
}
