//! Writing rendered artifacts to disk

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::codegen::Artifact;
use crate::error::Result;

/// What happened to an artifact on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was written (new or overwritten)
    Created(PathBuf),
    /// The file already existed and `force` was off
    Skipped(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Created(path) | WriteOutcome::Skipped(path) => path,
        }
    }
}

/// Write `artifact` into `dir`, creating the directory if needed.
///
/// An existing file is left untouched unless `force` is set.
pub fn write_artifact(dir: &Path, artifact: &Artifact, force: bool) -> Result<WriteOutcome> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.file_name);

    if path.exists() && !force {
        warn!("Skipped: {} (already exists)", path.display());
        return Ok(WriteOutcome::Skipped(path));
    }

    debug!("Writing {} {} -> {}", artifact.kind, artifact.table, path.display());
    fs::write(&path, &artifact.contents)?;
    Ok(WriteOutcome::Created(path))
}
