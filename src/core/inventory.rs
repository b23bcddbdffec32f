//! Directory scan producing the set of files to upload.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use super::fingerprint::fingerprint_file;
use super::models::UploadCandidate;

/// Recursively enumerate every regular file under `dir`, in discovery order,
/// computing each file's content hash.
///
/// An empty result is valid; deciding whether that is an error belongs to
/// the caller. The expected layout is a flat directory holding the two
/// device files, but subdirectories are descended if present.
pub fn collect(dir: &Path) -> Result<Vec<UploadCandidate>> {
    let mut candidates = Vec::new();
    scan_into(dir, &mut candidates)?;
    Ok(candidates)
}

fn scan_into(dir: &Path, candidates: &mut Vec<UploadCandidate>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("failed to stat {}", path.display()))?;

        if file_type.is_dir() {
            scan_into(&path, candidates)?;
        } else if file_type.is_file() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let content_hash = fingerprint_file(&path)?;
            debug!(file = %path.display(), hash = %content_hash, "Inventoried file");
            candidates.push(UploadCandidate {
                name,
                path,
                content_hash,
            });
        }
    }
    Ok(())
}
