//! Local archiving of the device files.
//!
//! Copies the SD card's data files into a dated archive tree
//! (`<archive_dir>/YYYY/MM/DD/`) and refreshes the upload data dir, so a
//! pipeline run always sees the latest capture while history stays on disk.

use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::ArchiveConfig;

/// Files the therapy device writes to its SD card.
pub const DEVICE_FILES: &[&str] = &["config.pcfg", "therapy.pdat"];

/// Copy today's device files into the archive and the data dir.
///
/// Returns the archived paths. Missing source files are an error; a partial
/// card is not worth uploading.
pub fn archive_device_files(archive: &ArchiveConfig, data_dir: &Path) -> Result<Vec<PathBuf>> {
    let now = Local::now();
    let dated_dir = archive
        .archive_dir
        .join(now.format("%Y").to_string())
        .join(now.format("%m").to_string())
        .join(now.format("%d").to_string());

    std::fs::create_dir_all(&dated_dir)
        .with_context(|| format!("failed to create archive directory {}", dated_dir.display()))?;
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let mut archived = Vec::new();
    for name in DEVICE_FILES {
        let source = archive.mount_path.join(name);
        let archive_dest = dated_dir.join(name);
        std::fs::copy(&source, &archive_dest).with_context(|| {
            format!(
                "failed to copy {} to {}",
                source.display(),
                archive_dest.display()
            )
        })?;
        std::fs::copy(&source, data_dir.join(name))
            .with_context(|| format!("failed to copy {} to data dir", source.display()))?;
        info!(file = %name, dest = %archive_dest.display(), "Archived device file");
        archived.push(archive_dest);
    }
    Ok(archived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn copies_into_dated_folder_and_data_dir() {
        let temp = tempdir().unwrap();
        let mount = temp.path().join("mount");
        let archive_dir = temp.path().join("archive");
        let data_dir = temp.path().join("data");

        fs::create_dir_all(&mount).unwrap();
        fs::write(mount.join("config.pcfg"), b"cfg").unwrap();
        fs::write(mount.join("therapy.pdat"), b"dat").unwrap();

        let config = ArchiveConfig {
            mount_path: mount,
            archive_dir: archive_dir.clone(),
        };
        let archived = archive_device_files(&config, &data_dir).unwrap();

        let now = Local::now();
        let dated = archive_dir
            .join(now.format("%Y").to_string())
            .join(now.format("%m").to_string())
            .join(now.format("%d").to_string());

        assert_eq!(archived.len(), 2);
        assert_eq!(fs::read(dated.join("config.pcfg")).unwrap(), b"cfg");
        assert_eq!(fs::read(dated.join("therapy.pdat")).unwrap(), b"dat");
        assert_eq!(fs::read(data_dir.join("config.pcfg")).unwrap(), b"cfg");
        assert_eq!(fs::read(data_dir.join("therapy.pdat")).unwrap(), b"dat");
    }

    #[test]
    fn missing_source_file_is_an_error() {
        let temp = tempdir().unwrap();
        let mount = temp.path().join("mount");
        fs::create_dir_all(&mount).unwrap();
        // only one of the two files present
        fs::write(mount.join("config.pcfg"), b"cfg").unwrap();

        let config = ArchiveConfig {
            mount_path: mount,
            archive_dir: temp.path().join("archive"),
        };
        let result = archive_device_files(&config, &temp.path().join("data"));
        assert!(result.is_err());
    }
}
