//! Toggle task handler for the focus MCP server

use crate::FocusServerHandler;
use crate::storage::DocumentStore;
use crate::tasks::{ToggleContext, edit};
use crate::validation;
use crate::vault::DocumentQuery;
use mcp_attr::{Result as McpResult, bail_public};
use tracing::warn;

impl FocusServerHandler {
    /// Completes or reopens a task line, recurring it when needed.
    ///
    /// # Arguments
    /// * `note` - Note holding the task, relative to the vault
    /// * `line` - 1-based line number of the task
    ///
    /// # Returns
    /// The line now shown at `line`: the toggled task, or the next
    /// occurrence of a completed recurring task
    pub async fn handle_toggle_task(&self, note: String, line: u32) -> McpResult<String> {
        let path = validation::normalize_note_path(&note)?;
        let index = validation::parse_line_number(line)?;

        let _guard = self.edit_lock.lock().await;

        if self.store.resolve_path(&path).await.is_none() {
            bail_public!(_, "Note '{}' not found", path);
        }

        // The indexed record carries the notes the task's date fields link to
        let record = match self.load_vault() {
            Ok(vault) => vault
                .document(&path)
                .and_then(|doc| doc.tasks.iter().find(|t| t.line == index).cloned()),
            Err(e) => {
                warn!(error = %e, "Failed to index vault, toggling without task record");
                None
            }
        };

        // Completion is stamped with the local date
        let ctx = ToggleContext {
            today: Self::today(),
            log_path: &self.config.recurring_log,
        };

        match edit::toggle_line(&self.store, &path, index, record.as_ref(), &ctx).await {
            Ok(task) => Ok(format!("{} line {}: {}", path, line, task.render())),
            Err(e) => bail_public!(_, "Failed to toggle line {} of {}: {:#}", line, path, e),
        }
    }
}
