//! Input resolution.
//!
//! A container can be given directly or as a directory holding an unpacked
//! release archive, in which case the first file with the container's known
//! name is used.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::container::PayloadKind;

/// Resolves `path` to the container file for `kind`.
pub fn resolve(path: &Path, kind: PayloadKind) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        bail!("{} does not exist", path.display());
    }

    let pattern = path.join("**").join(kind.file_name());
    let pattern = pattern
        .to_str()
        .with_context(|| format!("non UTF-8 path {}", path.display()))?;
    let mut matches = glob::glob(pattern).context("invalid search pattern")?;
    match matches.next() {
        Some(found) => {
            let found = found.context("failed to read release directory")?;
            tracing::info!("Using {} {}", kind, found.display());
            Ok(found)
        }
        None => bail!("no {} found under {}", kind.file_name(), path.display()),
    }
}
