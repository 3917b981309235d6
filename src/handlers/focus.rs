//! Focus handlers for the focus MCP server

use crate::FocusServerHandler;
use crate::graph::{GraphBuilder, view};
use crate::validation;
use crate::vault::DocumentQuery;
use mcp_attr::{Result as McpResult, bail, bail_public};

impl FocusServerHandler {
    /// Adds or removes a period in a note's focus field.
    ///
    /// # Arguments
    /// * `note` - Area, Goal or Key Result note relative to the vault
    /// * `period` - Week, month or quarter label
    ///
    /// # Returns
    /// Whether the note is now focused in the period
    pub async fn handle_toggle_focus(&self, note: String, period: String) -> McpResult<String> {
        let path = validation::normalize_note_path(&note)?;
        let label = validation::parse_period(&period)?;

        let _guard = self.edit_lock.lock().await;

        let vault = match self.load_vault() {
            Ok(v) => v,
            Err(e) => bail!("Failed to index vault: {}", e),
        };
        let Some(document) = vault.document(&path) else {
            bail_public!(_, "Note '{}' not found", path);
        };

        // The current state decides between adding and removing
        let focus = self.focus_resolver();
        let focused = focus.is_focused(document, &label);
        if let Err(e) = focus.toggle_focus(&self.store, &path, focused, &label).await {
            bail!("Failed to update focus of {}: {}", path, e);
        }

        if focused {
            Ok(format!("{} is no longer focused in {}", path, label))
        } else {
            Ok(format!("{} is now focused in {}", path, label))
        }
    }

    /// Stars or unstars a node of a periodic note's graph.
    ///
    /// # Arguments
    /// * `anchor` - Daily, weekly or monthly note the graph is built for
    /// * `node` - Note of the Area, Goal or Key Result to toggle
    ///
    /// # Returns
    /// Whether the node is now focused in the anchor's period
    pub async fn handle_focus_node(&self, anchor: String, node: String) -> McpResult<String> {
        let anchor = validation::normalize_note_path(&anchor)?;
        let node = validation::normalize_note_path(&node)?;

        let _guard = self.edit_lock.lock().await;

        let vault = match self.load_vault() {
            Ok(v) => v,
            Err(e) => bail!("Failed to index vault: {}", e),
        };
        let graph = match GraphBuilder::new(&vault, &self.config).try_build(&anchor) {
            Ok(g) => g,
            Err(e) => bail_public!(_, "{}", e),
        };

        let focus = self.focus_resolver();
        let label = graph.period_kind.label(graph.date);
        match view::toggle_node_focus(&graph, &vault, &self.store, &focus, &node).await {
            Ok(true) => Ok(format!("★ {} is now focused in {}", node, label)),
            Ok(false) => Ok(format!("{} is no longer focused in {}", node, label)),
            Err(e) => bail_public!(_, "{:#}", e),
        }
    }
}
