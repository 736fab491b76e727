//! Project-rooted bead manager.
//!
//! Resolves `<root>/.beads/beads.jsonl` and exposes the CRUD API on top of
//! [`crate::jsonl`]. Every call goes to disk; nothing is cached between calls.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::jsonl;
use crate::model::{Bead, BeadUpdate, Status};

/// Directory holding the store, relative to the project root.
pub const BEADS_DIR: &str = ".beads";

/// Store file name inside [`BEADS_DIR`].
pub const BEADS_FILE: &str = "beads.jsonl";

/// Flat-file bead store rooted at a project directory.
#[derive(Debug, Clone)]
pub struct BeadsManager {
    root: PathBuf,
}

impl BeadsManager {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn beads_dir(&self) -> PathBuf {
        self.root.join(BEADS_DIR)
    }

    /// Full path of the JSONL file.
    #[must_use]
    pub fn beads_path(&self) -> PathBuf {
        self.beads_dir().join(BEADS_FILE)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.beads_dir().is_dir() {
            Ok(())
        } else {
            Err(StoreError::NotInitialized)
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create `.beads/` and an empty store file if they are missing.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory or file cannot be created.
    pub fn init(&self) -> Result<String> {
        let beads_dir = self.beads_dir();
        if !beads_dir.exists() {
            fs::create_dir_all(&beads_dir)?;
        }
        let path = self.beads_path();
        if !path.exists() {
            fs::write(&path, "")?;
        }
        debug!(path = %path.display(), "Initialized flat-file store");
        Ok("Initialized .beads directory.".to_string())
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    /// Read every bead in file order.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized`, `Io`, or `JsonlParse`.
    pub fn get_all(&self) -> Result<Vec<Bead>> {
        self.ensure_initialized()?;
        jsonl::load(&self.beads_path())
    }

    /// Append a new open bead.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized`, `Validation` for an empty title, or `Io`.
    pub fn add(&self, title: &str, description: &str, priority: i32) -> Result<Bead> {
        self.ensure_initialized()?;
        if title.trim().is_empty() {
            return Err(StoreError::validation("title", "cannot be empty"));
        }

        let now = Utc::now();
        let bead = Bead {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            status: Status::Open,
            priority,
            created_at: now,
            updated_at: now,
            labels: Vec::new(),
        };

        jsonl::append(&self.beads_path(), &bead)?;
        debug!(id = %bead.id, "Added bead");
        Ok(bead)
    }

    /// Merge `update` into the bead with `id` and rewrite the file.
    ///
    /// Returns `Ok(None)` when no bead has that id.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized`, `Io`, or `JsonlParse`.
    pub fn update(&self, id: &str, update: &BeadUpdate) -> Result<Option<Bead>> {
        self.ensure_initialized()?;
        let mut beads = self.get_all()?;
        let Some(bead) = beads.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };

        update.apply_to(bead);
        bead.updated_at = Utc::now();
        let updated = bead.clone();

        jsonl::save(&self.beads_path(), &beads)?;
        debug!(id, "Updated bead");
        Ok(Some(updated))
    }
}
