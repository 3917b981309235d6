//! Common test utilities for integration tests
#![allow(dead_code)]

use focus_mcp::{FocusServerHandler, FsStore, Vault};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const AREAS: &str = "💿 Databases/🏰 Areas Of Competence";
pub const GOALS: &str = "💿 Databases/🚀 Goals";
pub const KEY_RESULTS: &str = "💿 Databases/💎 Key Results";
pub const RECURRING_LOG: &str = "🗄 Recurring Log.md";

pub fn area(name: &str) -> String {
    format!("{}/{}.md", AREAS, name)
}

pub fn goal(name: &str) -> String {
    format!("{}/{}.md", GOALS, name)
}

pub fn key_result(name: &str) -> String {
    format!("{}/{}.md", KEY_RESULTS, name)
}

/// A vault directory that is removed when dropped
pub struct TestVault {
    pub dir: TempDir,
}

impl TestVault {
    pub fn new(notes: &[(String, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        for (path, text) in notes {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, text).unwrap();
        }
        Self { dir }
    }

    /// Two Areas, three Goals and three Key Results around the week of 2024-03-01
    ///
    /// "Work-life balance" belongs to both Areas.
    pub fn sample() -> Self {
        Self::new(&sample_notes())
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn read(&self, note: &str) -> String {
        fs::read_to_string(self.dir.path().join(note)).unwrap()
    }

    pub fn write(&self, note: &str, text: &str) {
        let full = self.dir.path().join(note);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, text).unwrap();
    }

    pub fn index(&self) -> Vault {
        Vault::load(self.dir.path()).unwrap()
    }

    pub fn store(&self) -> FsStore {
        FsStore::new(self.dir.path(), false)
    }

    pub fn handler(&self) -> FocusServerHandler {
        FocusServerHandler::new(self.dir.path(), false, None).unwrap()
    }
}

pub fn sample_notes() -> Vec<(String, &'static str)> {
    vec![
        (area("Career"), "Focused In:: [[2024-Q1]]"),
        (area("Health"), "Focused In:: [[2024-Q1]]"),
        (area("Music"), "Focused In:: [[2023-Q4]]"),
        (
            goal("Get promoted"),
            "Area:: [[Career]]\nFocused In:: [[2024-02]]",
        ),
        (
            goal("Run a marathon"),
            "Area:: [[Health]]\nFocused In:: [[2024-02]], [[2024-03]]",
        ),
        (
            goal("Work-life balance"),
            "Area:: [[Health]], [[Career]]\nFocused In:: [[2024-02]]",
        ),
        (
            goal("✅ Learn to swim"),
            "Area:: [[Health]]\nFocused In:: [[2024-02]]",
        ),
        (
            key_result("Leave at six"),
            "Goal:: [[Work-life balance]]\nFocused In:: [[2024-W9]]\n- [ ] leave on time [🗓:: [[2024-02-28]]] [🔁:: every day]",
        ),
        (
            key_result("Run 30k per week"),
            "Goal:: [[Run a marathon]]\nFocused In:: [[2024-W9]]\n\n- [ ] long run [🗓:: [[2024-03-01]]]\n- [ ] intervals\n- [x] buy shoes [✅:: [[2024-02-20]]]",
        ),
        (
            key_result("Ship feature"),
            "Goal:: [[Get promoted]]\nFocused In:: [[2024-W9]]\n- [ ] write design doc [🗓:: [[2024-03-04]]]",
        ),
        ("Journal/2024-02-28.md".to_string(), "# Wednesday"),
        ("Journal/2024-03-01.md".to_string(), "# Friday"),
        ("Journal/2024-03-04.md".to_string(), "# Monday"),
        ("Journal/2024-W9.md".to_string(), "# Week 9"),
        ("Journal/2024-02.md".to_string(), "# February"),
        ("Journal/Ideas.md".to_string(), "- [ ] learn rust"),
    ]
}
