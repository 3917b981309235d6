//! Graph handler for the focus MCP server

use crate::FocusServerHandler;
use crate::formatting;
use crate::graph::{GraphBuilder, view};
use crate::validation;
use mcp_attr::{Result as McpResult, bail, bail_public};
use tracing::warn;

impl FocusServerHandler {
    /// Builds the graph of a periodic note and renders it as an outline.
    ///
    /// # Arguments
    /// * `note` - Daily, weekly or monthly note relative to the vault
    /// * `only_focused` - Narrow the graph to the nodes focused in the period
    ///
    /// # Returns
    /// The graph as an indented outline, highest order first
    pub async fn handle_graph(&self, note: String, only_focused: bool) -> McpResult<String> {
        let path = validation::normalize_note_path(&note)?;

        // Fresh index: the graph reflects the notes as they are now
        let vault = match self.load_vault() {
            Ok(v) => v,
            Err(e) => bail!("Failed to index vault: {}", e),
        };

        let graph = match GraphBuilder::new(&vault, &self.config).try_build(&path) {
            Ok(g) => g,
            Err(e) => {
                warn!(error = %e, "Cannot build focus graph");
                bail_public!(_, "{}. Use a note named like 2024-03-01, 2024-W9 or 2024-03.", e);
            }
        };

        // Apply the period's dedupe and filters, then star focused nodes
        let focus = self.focus_resolver();
        let graph = view::focus_view(graph, &vault, &focus, only_focused);
        Ok(formatting::format_graph(&graph, |path| {
            view::is_node_focused(&graph, &vault, &focus, path)
        }))
    }
}
