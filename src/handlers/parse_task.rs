//! Parse task handler for the focus MCP server

use crate::FocusServerHandler;
use crate::formatting;
use crate::tasks::Task;
use mcp_attr::{Result as McpResult, bail_public};

impl FocusServerHandler {
    /// Tokenizes a task line and describes its blocks.
    ///
    /// # Arguments
    /// * `line` - Task line starting with `- [ ]` or `- [x]`
    pub async fn handle_parse_task(&self, line: String) -> McpResult<String> {
        match Task::from_line(&line, None) {
            Ok(task) => Ok(formatting::format_task(&task)),
            Err(e) => bail_public!(_, "{}", e),
        }
    }
}
