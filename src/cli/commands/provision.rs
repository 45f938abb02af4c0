//! CLI implementation for `packmule provision` command
//!
//! This module handles the CLI interface for staging the media tool.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{self, is_json, is_verbose, print_detail, print_success, print_warning};
use crate::core::manifest::Manifest;
use crate::core::provision::{provision, ProvisionOptions, ProvisionSettings};
use crate::infra::download::ProgressCallback;
use crate::infra::guard::RunGuard;

/// Execute the provision command
pub async fn execute(path: &Path, options: ProvisionOptions) -> Result<()> {
    // Check if manifest exists
    let manifest_path = path.join("packmule.toml");
    if !manifest_path.exists() {
        anyhow::bail!(
            "No packmule.toml found in {}. Run 'packmule init' first.",
            path.display()
        );
    }

    let manifest = Manifest::load(&manifest_path)?;
    let settings = ProvisionSettings::resolve(&manifest, &options);

    // One provisioning or bundling run per project at a time
    let _guard = RunGuard::acquire(path)?;

    let bar = output::create_download_bar(0);
    let progress_bar = bar.clone();
    let progress: ProgressCallback = Box::new(move |downloaded, total| {
        if progress_bar.length() != Some(total) {
            progress_bar.set_length(total);
        }
        progress_bar.set_position(downloaded);
    });

    let report = provision(path, &settings, Some(progress))
        .await
        .with_context(|| format!("Failed to provision '{}'", settings.primary))?;
    bar.finish_and_clear();

    if is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "tool": settings.primary,
                "version": report.version,
                "primary": report.primary.display().to_string(),
                "secondary": report.secondary.as_ref().map(|p| p.display().to_string()),
                "archive_size": report.archive_size,
                "archive_sha256": report.archive_checksum,
            }))?
        );
        return Ok(());
    }

    let rel = |staged: &std::path::PathBuf| {
        staged
            .strip_prefix(path)
            .unwrap_or(staged)
            .display()
            .to_string()
    };

    print_success(&format!(
        "Provisioned {} {}",
        settings.primary, report.version
    ));
    print_detail(&format!("Staged {}", rel(&report.primary)));
    if let Some(secondary) = &report.secondary {
        print_detail(&format!("Staged {}", rel(secondary)));
    } else if settings.secondary.is_some() {
        print_warning("Companion binary was not found in the archive");
    }

    if is_verbose() {
        print_detail(&format!("Archive size: {} bytes", report.archive_size));
        print_detail(&format!("Archive sha256: {}", report.archive_checksum));
    }

    Ok(())
}
