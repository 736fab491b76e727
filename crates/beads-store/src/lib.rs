//! `beads-store` - Legacy flat-file bead store.
//!
//! A small CRUD store that keeps beads in `.beads/beads.jsonl` under a
//! project root. It never talks to the `bd` CLI; records are appended
//! one JSON object per line and rewritten atomically on update.
//!
//! # Quick Start
//!
//! ```no_run
//! use beads_store::{BeadUpdate, BeadsManager, Status};
//!
//! let manager = BeadsManager::new("path/to/project");
//! manager.init().unwrap();
//!
//! let bead = manager.add("Write docs", "Cover the store API", 1).unwrap();
//!
//! manager
//!     .update(&bead.id, &BeadUpdate { status: Some(Status::Closed), ..Default::default() })
//!     .unwrap();
//!
//! let all = manager.get_all().unwrap();
//! ```

pub mod error;
pub mod jsonl;
pub mod manager;
pub mod model;

pub use error::{Result, StoreError};
pub use manager::{BEADS_DIR, BEADS_FILE, BeadsManager};
pub use model::{Bead, BeadUpdate, Status};
