//! JSONL file I/O for beads.
//!
//! Each line in the file is one complete [`Bead`].

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{Result, StoreError};
use crate::model::Bead;

/// Load all beads from a JSONL file.
///
/// A missing file yields an empty list. Blank lines are skipped.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, or `JsonlParse` if any line is invalid.
pub fn load(path: &Path) -> Result<Vec<Bead>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::Io(e)),
    };
    let reader = BufReader::new(file);

    let mut beads = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let bead: Bead = serde_json::from_str(trimmed).map_err(|e| StoreError::JsonlParse {
            line: line_num + 1,
            reason: e.to_string(),
        })?;
        beads.push(bead);
    }

    Ok(beads)
}

/// Append a single bead as a new line.
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened or written.
pub fn append(path: &Path, bead: &Bead) -> Result<()> {
    let json = serde_json::to_string(bead)?;
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{json}")?;
    file.flush()?;
    Ok(())
}

/// Rewrite the whole file with atomic write.
///
/// Uses write-to-temp + rename so readers never see a half-written file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn save(path: &Path, beads: &[Bead]) -> Result<()> {
    let tmp_path = path.with_extension("jsonl.tmp");
    let mut file = fs::File::create(&tmp_path)?;

    for bead in beads {
        let json = serde_json::to_string(bead)?;
        writeln!(file, "{json}")?;
    }

    file.flush()?;
    drop(file);

    fs::rename(&tmp_path, path)?;

    Ok(())
}
