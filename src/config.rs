//! Vault layout configuration
//!
//! Read from a TOML file (by default `.focus.toml` at the vault root). Every
//! key is optional:
//!
//! ```toml
//! areas_folder = "💿 Databases/🏰 Areas Of Competence"
//! goals_folder = "💿 Databases/🚀 Goals"
//! key_results_folder = "💿 Databases/💎 Key Results"
//! recurring_log = "🗄 Recurring Log.md"
//! focus_field = "Focused In"
//! area_field = "Area"
//! goal_field = "Goal"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = ".focus.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Folder holding one note per Area
    pub areas_folder: String,
    /// Folder holding one note per Goal
    pub goals_folder: String,
    /// Folder holding one note per Key Result
    pub key_results_folder: String,
    /// Note receiving completed occurrences of recurring tasks
    pub recurring_log: String,
    /// Field listing the periods a note is focused in
    pub focus_field: String,
    /// Field of a Goal linking its parent Area(s)
    pub area_field: String,
    /// Field of a Key Result linking its parent Goal(s)
    pub goal_field: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            areas_folder: "💿 Databases/🏰 Areas Of Competence".to_string(),
            goals_folder: "💿 Databases/🚀 Goals".to_string(),
            key_results_folder: "💿 Databases/💎 Key Results".to_string(),
            recurring_log: "🗄 Recurring Log.md".to_string(),
            focus_field: "Focused In".to_string(),
            area_field: "Area".to_string(),
            goal_field: "Goal".to_string(),
        }
    }
}

impl VaultConfig {
    /// Load the configuration, falling back to defaults when the file is missing
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }
}
