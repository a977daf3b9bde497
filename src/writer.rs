//! Output writer.
//!
//! This module writes the flat STM32 image to disk.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::extractor::Extraction;

/// Writes `extraction.output` to `dir/extraction.file_name` and returns the path.
pub fn write_output(dir: &Path, extraction: &Extraction) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join(&extraction.file_name);
    std::fs::write(&path, &extraction.output)
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::debug!("wrote {} bytes to {}", extraction.output.len(), path.display());
    Ok(path)
}
