//! Focus MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server over a vault of
//! Markdown notes organized as Areas, Goals and Key Results. For any daily,
//! weekly or monthly note it derives the focus graph of that period, and it
//! edits the task lines of the vault, including recurring tasks.
//!
//! # Architecture
//!
//! - **MCP Layer**: `FocusServerHandler` - tool surface and argument validation
//! - **Domain Layer**: `graph`, `tasks` and `focus` - graph derivation, task
//!   line parsing, recurrence and focus fields
//! - **Persistence Layer**: `vault` (read-only index) and `storage` (note
//!   text, with optional git sync)
//!
//! # Example
//!
//! ```no_run
//! use focus_mcp::FocusServerHandler;
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = FocusServerHandler::new("vault", false, None)?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod focus;
pub mod formatting;
mod git_ops;
pub mod graph;
mod handlers;
pub mod storage;
pub mod tasks;
pub mod validation;
pub mod vault;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use config::VaultConfig;
pub use focus::FocusResolver;
pub use graph::{Graph, GraphBuilder, PeriodKind};
pub use storage::{DocumentStore, FsStore, MemoryStore};
pub use tasks::{Task, Toggle, ToggleContext};
pub use vault::{DocumentQuery, Vault};

/// MCP Server handler for a focus vault
///
/// Graphs are derived from a fresh index of the vault on every call. Edits
/// go through the vault directory and are optionally committed with git.
pub struct FocusServerHandler {
    pub(crate) config: VaultConfig,
    pub(crate) store: FsStore,
    /// Serializes read-modify-write edits of notes
    pub(crate) edit_lock: tokio::sync::Mutex<()>,
}

impl FocusServerHandler {
    /// Create a new handler for the vault at `vault_root`
    ///
    /// # Arguments
    /// * `vault_root` - Directory holding the Markdown notes
    /// * `sync_git` - Commit every edited note and push on shutdown
    /// * `config_path` - Layout configuration, `<vault>/.focus.toml` by default
    pub fn new(
        vault_root: impl AsRef<Path>,
        sync_git: bool,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        let root = vault_root.as_ref().to_path_buf();
        if !root.is_dir() {
            anyhow::bail!("Vault {} is not a directory", root.display());
        }
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.join(config::CONFIG_FILE_NAME));
        let config = VaultConfig::load(&config_path)?;
        info!(vault = %root.display(), config = %config_path.display(), sync_git, "Opened vault");

        Ok(Self {
            config,
            store: FsStore::new(root, sync_git),
            edit_lock: tokio::sync::Mutex::new(()),
        })
    }

    pub fn root(&self) -> PathBuf {
        self.store.root().to_path_buf()
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Index the vault as it is on disk now
    pub(crate) fn load_vault(&self) -> Result<Vault> {
        Vault::load(self.store.root())
    }

    pub(crate) fn focus_resolver(&self) -> FocusResolver {
        FocusResolver::new(self.config.focus_field.clone())
    }

    pub(crate) fn today() -> NaiveDate {
        Local::now().date_naive()
    }
}

impl Drop for FocusServerHandler {
    fn drop(&mut self) {
        // Push to git on shutdown if sync is enabled
        if let Err(e) = self.store.shutdown() {
            warn!(error = %e, "Shutdown git sync failed");
        }
    }
}

/// Focus server for a vault of Areas, Goals and Key Results.
///
/// Areas are focused per quarter, Goals per month and Key Results per week by
/// linking the period's note in their `Focused In::` field. Periodic notes are
/// named `2024-03-01` (daily), `2024-W9` (weekly) and `2024-03` (monthly).
///
/// Task lines look like:
/// `- [ ] text [[links]] [🗓:: [[2024-03-01]]] [✅:: [[2024-03-01]]] [🔁:: every 2 days!@]`
/// where `!` counts recurrences from the due date and `@` keeps the history
/// in the note instead of the recurring log.
#[mcp_server]
impl McpServer for FocusServerHandler {
    /// **Focus graph**: Areas → Goals → Key Results → open tasks for a periodic note.
    /// **Order**: highest priority first; Key Results with tasks due by the note's date rank on top.
    /// **★**: focused nodes (daily: a task is due; weekly/monthly: focused in the period).
    #[tool]
    async fn graph(
        &self,
        /// Periodic note path relative to the vault (e.g., "Journal/2024-03-01.md")
        note: String,
        /// Only show focused nodes
        only_focused: Option<bool>,
    ) -> McpResult<String> {
        self.handle_graph(note, only_focused.unwrap_or(false)).await
    }

    /// **Toggle task**: Complete or reopen the task at a line of a note.
    /// **Recurring**: completing a 🔁 task logs the done line and reschedules the task.
    #[tool]
    async fn toggle_task(
        &self,
        /// Note path relative to the vault
        note: String,
        /// Line number of the task, starting at 1
        line: u32,
    ) -> McpResult<String> {
        self.handle_toggle_task(note, line).await
    }

    /// **Toggle focus**: Add or remove a period in a note's `Focused In::` field.
    #[tool]
    async fn toggle_focus(
        &self,
        /// Note path relative to the vault
        note: String,
        /// Period: week (2024-W9), month (2024-03) or quarter (2024-Q1)
        period: String,
    ) -> McpResult<String> {
        self.handle_toggle_focus(note, period).await
    }

    /// **Focus node**: Star or unstar a node of a periodic note's graph.
    /// **Daily**: schedules the Key Result's next open task for the day, or unschedules its task due today.
    /// **Weekly/Monthly**: toggles the node's focus in that week or month.
    #[tool]
    async fn focus_node(
        &self,
        /// Periodic note the graph belongs to
        anchor: String,
        /// Note path of the Area, Goal or Key Result
        node: String,
    ) -> McpResult<String> {
        self.handle_focus_node(anchor, node).await
    }

    /// **Schedule task**: Set or clear the 🗓 due date of the task at a line of a note.
    #[tool]
    async fn schedule_task(
        &self,
        /// Note path relative to the vault
        note: String,
        /// Line number of the task, starting at 1
        line: u32,
        /// Due date YYYY-MM-DD; omit to clear it
        date: Option<String>,
    ) -> McpResult<String> {
        self.handle_schedule_task(note, line, date).await
    }

    /// **Parse task**: Show how a task line is read, block by block.
    #[tool]
    async fn parse_task(
        &self,
        /// Task line (e.g., "- [ ] water [🗓:: [[2024-03-01]]] [🔁:: every 3 days!]")
        line: String,
    ) -> McpResult<String> {
        self.handle_parse_task(line).await
    }
}
