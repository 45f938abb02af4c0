//! Archive extraction
//!
//! Unpacks release archives (.zip, .tar.gz, .tar.zst) into a destination
//! directory. Entry paths and link targets are validated before unpacking
//! so a hostile archive cannot write or link outside the destination.

use std::io::Read;
use std::path::{Component, Path};

use crate::error::ArchiveError;

/// Supported archive formats, detected from the filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// ZIP archive
    Zip,
    /// Gzip-compressed tarball
    TarGz,
    /// Zstandard-compressed tarball
    TarZst,
}

impl ArchiveFormat {
    /// Detect the format from a filename
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if lower.ends_with(".tar.zst") {
            Some(Self::TarZst)
        } else {
            None
        }
    }
}

/// Detect the archive format of a file from its path
pub fn detect_format(path: &Path) -> Result<ArchiveFormat, ArchiveError> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    ArchiveFormat::from_filename(filename).ok_or_else(|| ArchiveError::UnsupportedFormat {
        filename: filename.to_string(),
    })
}

/// Extract an archive into a destination directory
///
/// The format is detected from the archive filename. The destination is
/// created if it does not exist. Returns the number of files extracted.
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<usize, ArchiveError> {
    let format = detect_format(archive_path)?;

    // The tar unpacker resolves entry destinations against the canonical
    // destination path, which must exist before the first entry
    create_dir(dest_dir)?;

    let extracted = match format {
        ArchiveFormat::Zip => extract_zip(archive_path, dest_dir)?,
        ArchiveFormat::TarGz => {
            let file = open_archive(archive_path)?;
            extract_tar(flate2::read::GzDecoder::new(file), archive_path, dest_dir)?
        }
        ArchiveFormat::TarZst => {
            let file = open_archive(archive_path)?;
            let decoder = zstd::Decoder::new(file).map_err(|e| ArchiveError::IoError {
                path: archive_path.to_path_buf(),
                error: e.to_string(),
            })?;
            extract_tar(decoder, archive_path, dest_dir)?
        }
    };

    if extracted == 0 {
        return Err(ArchiveError::EmptyArchive {
            path: archive_path.to_path_buf(),
        });
    }

    Ok(extracted)
}

fn open_archive(path: &Path) -> Result<std::fs::File, ArchiveError> {
    std::fs::File::open(path).map_err(|e| ArchiveError::IoError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Extract a ZIP archive
fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<usize, ArchiveError> {
    let file = open_archive(archive_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| ArchiveError::IoError {
        path: archive_path.to_path_buf(),
        error: e.to_string(),
    })?;

    let mut extracted = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| ArchiveError::IoError {
            path: archive_path.to_path_buf(),
            error: e.to_string(),
        })?;

        // enclosed_name rejects absolute paths and traversal components
        let Some(entry_path) = entry.enclosed_name() else {
            return Err(ArchiveError::PathTraversal {
                entry: entry.name().to_string(),
            });
        };

        let dest_path = dest_dir.join(&entry_path);

        if entry.is_dir() {
            create_dir(&dest_path)?;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            create_dir(parent)?;
        }

        let mut out_file = std::fs::File::create(&dest_path).map_err(|e| ArchiveError::IoError {
            path: dest_path.clone(),
            error: e.to_string(),
        })?;
        std::io::copy(&mut entry, &mut out_file).map_err(|e| ArchiveError::IoError {
            path: dest_path.clone(),
            error: e.to_string(),
        })?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(&dest_path, std::fs::Permissions::from_mode(mode));
        }

        extracted += 1;
    }

    Ok(extracted)
}

/// Extract a tar stream (already wrapped in the right decompressor)
fn extract_tar<R: Read>(
    reader: R,
    archive_path: &Path,
    dest_dir: &Path,
) -> Result<usize, ArchiveError> {
    let mut archive = tar::Archive::new(reader);
    let mut extracted = 0;

    let entries = archive.entries().map_err(|e| ArchiveError::IoError {
        path: archive_path.to_path_buf(),
        error: e.to_string(),
    })?;

    for entry_result in entries {
        let mut entry = entry_result.map_err(|e| ArchiveError::IoError {
            path: archive_path.to_path_buf(),
            error: e.to_string(),
        })?;

        let entry_path = entry
            .path()
            .map_err(|e| ArchiveError::IoError {
                path: archive_path.to_path_buf(),
                error: e.to_string(),
            })?
            .into_owned();

        validate_entry_path(&entry_path)?;

        // Symlink and hardlink entries are materialized verbatim, so their
        // targets need the same containment check as entry paths
        if let Some(target) = entry.link_name().map_err(|e| ArchiveError::IoError {
            path: archive_path.to_path_buf(),
            error: e.to_string(),
        })? {
            validate_link_target(&entry_path, &target)?;
        }

        let is_file = entry.header().entry_type().is_file();

        // unpack_in re-validates the resolved destination, so a write routed
        // through a symlink unpacked earlier in the stream cannot land
        // outside dest_dir
        let unpacked = entry.unpack_in(dest_dir).map_err(|e| ArchiveError::IoError {
            path: dest_dir.join(&entry_path),
            error: e.to_string(),
        })?;

        if unpacked && is_file {
            extracted += 1;
        }
    }

    Ok(extracted)
}

fn create_dir(path: &Path) -> Result<(), ArchiveError> {
    std::fs::create_dir_all(path).map_err(|e| ArchiveError::IoError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Validate that an archive entry path cannot escape the destination
/// directory via `..` components or absolute paths
fn validate_entry_path(path: &Path) -> Result<(), ArchiveError> {
    if path.is_absolute() {
        return Err(ArchiveError::PathTraversal {
            entry: path.display().to_string(),
        });
    }
    for component in path.components() {
        if matches!(component, Component::ParentDir) {
            return Err(ArchiveError::PathTraversal {
                entry: path.display().to_string(),
            });
        }
    }
    Ok(())
}

/// Validate that a link entry's target stays inside the destination
/// directory once resolved relative to the link's own location
fn validate_link_target(entry_path: &Path, target: &Path) -> Result<(), ArchiveError> {
    let traversal = || ArchiveError::PathTraversal {
        entry: format!("{} -> {}", entry_path.display(), target.display()),
    };

    if target.is_absolute() {
        return Err(traversal());
    }

    let base = entry_path.parent().unwrap_or(Path::new(""));
    let mut depth: i32 = 0;
    for component in base.join(target).components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return Err(traversal());
                }
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return Err(traversal()),
        }
    }

    Ok(())
}
