//! Unpacking of the downloaded result archive.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use zip::ZipArchive;

use crate::error::{PipelineError, Result};

/// Extract every entry of `zip_path` into `dest_dir`, overwriting existing
/// files. Returns the number of files written.
///
/// Entries whose names would resolve outside `dest_dir` abort the unpack.
pub fn unpack_all(zip_path: &Path, dest_dir: &Path) -> Result<usize> {
    let file = File::open(zip_path).map_err(|e| PipelineError::io(zip_path, e))?;
    let mut archive = ZipArchive::new(file)?;

    fs::create_dir_all(dest_dir).map_err(|e| PipelineError::io(dest_dir, e))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| PipelineError::UnsafeArchiveEntry(entry.name().to_string()))?;
        let target = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| PipelineError::io(&target, e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        let mut out = File::create(&target).map_err(|e| PipelineError::io(&target, e))?;
        let bytes = io::copy(&mut entry, &mut out).map_err(|e| PipelineError::io(&target, e))?;
        tracing::debug!(entry = %target.display(), bytes, "Unpacked archive entry");
        written += 1;
    }

    Ok(written)
}
