//! Media tool provisioning logic
//!
//! This module contains the business logic for provisioning the external
//! media tool: download the pinned release archive into the staging
//! directory, extract it, locate the primary executable wherever the
//! release nests it, and stage it (plus its companion, when present)
//! into the destination directory.
//!
//! The destination is only touched once the primary executable has been
//! found, so a bad archive never leaves a half-staged directory behind.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{defaults, urls};
use crate::core::manifest::Manifest;
use crate::error::ProvisionError;
use crate::infra::download::{DownloadManager, ProgressCallback};
use crate::infra::{archive, filesystem};

/// Command-line overrides for provisioning
#[derive(Debug, Clone, Default)]
pub struct ProvisionOptions {
    /// Override the release URL template
    pub url: Option<String>,
    /// Override the pinned release version
    pub version: Option<String>,
    /// Override the destination directory
    pub dest: Option<String>,
    /// Keep the staging directory after a failed run
    pub keep_temp: bool,
}

/// Fully resolved provisioning settings (manifest + CLI overrides)
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionSettings {
    /// Release URL template with a `{version}` placeholder
    pub url_template: String,
    /// Pinned release version
    pub version: String,
    /// Destination directory, relative to the project root
    pub dest: String,
    /// Primary executable name (without platform suffix)
    pub primary: String,
    /// Companion executable name, if one should be staged
    pub secondary: Option<String>,
    /// Expected archive checksum
    pub sha256: Option<String>,
    /// Keep the staging directory after a failed run
    pub keep_temp: bool,
}

impl ProvisionSettings {
    /// Resolve settings from the manifest with CLI options taking precedence
    pub fn resolve(manifest: &Manifest, options: &ProvisionOptions) -> Self {
        let provision = &manifest.provision;

        let secondary = match provision.secondary.trim() {
            "" => None,
            name => Some(name.to_string()),
        };

        Self {
            url_template: options.url.clone().unwrap_or_else(|| provision.url.clone()),
            version: options
                .version
                .clone()
                .unwrap_or_else(|| provision.version.clone()),
            dest: options.dest.clone().unwrap_or_else(|| provision.dest.clone()),
            primary: provision.primary.clone(),
            secondary,
            sha256: provision.sha256.clone(),
            keep_temp: options.keep_temp || provision.keep_temp,
        }
    }

    /// The release URL with the version pin applied
    pub fn release_url(&self) -> String {
        urls::resolve_release_url(&self.url_template, &self.version)
    }
}

/// Result of a provisioning run
#[derive(Debug)]
pub struct ProvisionReport {
    /// Staged primary executable
    pub primary: PathBuf,
    /// Staged companion executable, when it was present in the archive
    pub secondary: Option<PathBuf>,
    /// Release version that was provisioned
    pub version: String,
    /// Size of the downloaded archive in bytes
    pub archive_size: u64,
    /// SHA256 of the downloaded archive
    pub archive_checksum: String,
    /// Whether the staging directory was removed afterwards
    pub staging_removed: bool,
}

/// Provision the media tool into the project
///
/// Safe to re-run: a second invocation downloads and stages again,
/// overwriting the previously staged binaries in place.
pub async fn provision(
    project_path: &Path,
    settings: &ProvisionSettings,
    progress: Option<ProgressCallback>,
) -> Result<ProvisionReport, ProvisionError> {
    let staging_dir = project_path.join(defaults::STAGING_DIR);

    match provision_inner(project_path, &staging_dir, settings, progress).await {
        Ok(mut report) => {
            filesystem::remove_dir_all(&staging_dir)?;
            report.staging_removed = true;
            Ok(report)
        }
        Err(e) => {
            if settings.keep_temp {
                tracing::info!(
                    path = %staging_dir.display(),
                    "keeping staging directory for inspection"
                );
            } else {
                let _ = std::fs::remove_dir_all(&staging_dir);
            }
            Err(e)
        }
    }
}

async fn provision_inner(
    project_path: &Path,
    staging_dir: &Path,
    settings: &ProvisionSettings,
    progress: Option<ProgressCallback>,
) -> Result<ProvisionReport, ProvisionError> {
    let url = settings.release_url();
    let archive_path = staging_dir.join(archive_filename(&url));
    let extract_dir = staging_dir.join(defaults::EXTRACT_SUBDIR);

    // Fresh extraction directory; a previous failed run may have left one
    filesystem::remove_dir_all(&extract_dir)?;
    filesystem::create_dir_all(&extract_dir)?;

    tracing::info!(%url, version = %settings.version, "downloading release archive");
    let manager = DownloadManager::new();
    let downloaded = match &settings.sha256 {
        Some(expected) => {
            manager
                .download_verified(&url, &archive_path, expected, progress)
                .await?
        }
        None => manager.download(&url, &archive_path, progress).await?,
    };

    let extracted = archive::extract_archive(&archive_path, &extract_dir)?;
    tracing::debug!(files = extracted, "archive extracted");

    // Locate the primary executable before touching the destination; a
    // release without it must leave the project untouched
    let binary_name = platform_binary_name(&settings.primary);
    let found = find_binary(&extract_dir, &binary_name).ok_or(ProvisionError::BinaryMissing {
        name: binary_name.clone(),
    })?;

    let dest_dir = project_path.join(&settings.dest);
    filesystem::create_dir_all(&dest_dir)?;

    let primary_dest = dest_dir.join(&binary_name);
    filesystem::copy_file(&found, &primary_dest).map_err(|e| ProvisionError::StageFailed {
        name: binary_name.clone(),
        dest: primary_dest.clone(),
        error: e.to_string(),
    })?;
    tracing::info!(binary = %binary_name, dest = %primary_dest.display(), "staged primary binary");

    // The companion ships next to the primary; stage it when present
    let mut secondary_dest = None;
    if let Some(secondary) = &settings.secondary {
        let secondary_name = platform_binary_name(secondary);
        let source = found.parent().map(|dir| dir.join(&secondary_name));
        match source {
            Some(src) if src.is_file() => {
                let dest = dest_dir.join(&secondary_name);
                match filesystem::copy_file(&src, &dest) {
                    Ok(()) => {
                        tracing::info!(binary = %secondary_name, "staged companion binary");
                        secondary_dest = Some(dest);
                    }
                    Err(e) => {
                        tracing::warn!(
                            binary = %secondary_name,
                            error = %e,
                            "failed to stage companion binary"
                        );
                    }
                }
            }
            _ => {
                tracing::warn!(
                    binary = %secondary_name,
                    "companion binary not present in archive"
                );
            }
        }
    }

    Ok(ProvisionReport {
        primary: primary_dest,
        secondary: secondary_dest,
        version: settings.version.clone(),
        archive_size: downloaded.size,
        archive_checksum: downloaded.checksum,
        staging_removed: false,
    })
}

/// Append the platform executable suffix unless the name already has it
pub fn platform_binary_name(name: &str) -> String {
    let suffix = std::env::consts::EXE_SUFFIX;
    if suffix.is_empty() || name.ends_with(suffix) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}

/// Find a file with the given name anywhere under `root`
///
/// The walk visits siblings in filename order so the first match is
/// deterministic for a given archive layout.
pub fn find_binary(root: &Path, name: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| {
            entry.file_type().is_file() && entry.file_name() == std::ffi::OsStr::new(name)
        })
        .map(walkdir::DirEntry::into_path)
}

/// Derive the archive filename from its URL
fn archive_filename(url: &str) -> String {
    url.rsplit('/')
        .next()
        .map(|name| name.split('?').next().unwrap_or(name))
        .filter(|name| !name.is_empty())
        .map(String::from)
        .unwrap_or_else(|| "release-archive".to_string())
}
