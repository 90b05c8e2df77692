//! Small filesystem helpers.

use anyhow::Result;
use std::path::Path;

/// Create a directory (and any parents) if it does not exist.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
