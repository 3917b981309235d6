//! Schedule task handler for the focus MCP server

use crate::FocusServerHandler;
use crate::storage::DocumentStore;
use crate::tasks::edit;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl FocusServerHandler {
    /// Sets or clears the due date of a task line.
    ///
    /// # Arguments
    /// * `note` - Note holding the task, relative to the vault
    /// * `line` - 1-based line number of the task
    /// * `date` - New due date (YYYY-MM-DD), `None` to clear it
    ///
    /// # Returns
    /// The rewritten task line
    pub async fn handle_schedule_task(
        &self,
        note: String,
        line: u32,
        date: Option<String>,
    ) -> McpResult<String> {
        let path = validation::normalize_note_path(&note)?;
        let index = validation::parse_line_number(line)?;
        // Validate everything before taking the lock
        let date = date.as_deref().map(validation::parse_date).transpose()?;

        let _guard = self.edit_lock.lock().await;

        if self.store.resolve_path(&path).await.is_none() {
            bail_public!(_, "Note '{}' not found", path);
        }

        match edit::reschedule(&self.store, &path, index, None, date).await {
            Ok(task) => Ok(format!("{} line {}: {}", path, line, task.render())),
            Err(e) => bail_public!(_, "Failed to schedule line {} of {}: {:#}", line, path, e),
        }
    }
}
