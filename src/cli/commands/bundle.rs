//! CLI implementation for `packmule bundle` command
//!
//! This module handles the CLI interface for packaging the application.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{self, is_json, print_detail, print_success};
use crate::core::bundle::{bundle, BundleOptions, BundleSettings};
use crate::core::manifest::Manifest;
use crate::infra::guard::RunGuard;

/// Execute the bundle command
pub async fn execute(path: &Path, options: BundleOptions) -> Result<()> {
    // Check if manifest exists
    let manifest_path = path.join("packmule.toml");
    if !manifest_path.exists() {
        anyhow::bail!(
            "No packmule.toml found in {}. Run 'packmule init' first.",
            path.display()
        );
    }

    let manifest = Manifest::load(&manifest_path)?;
    let settings = BundleSettings::resolve(&manifest, &options);

    // One provisioning or bundling run per project at a time
    let _guard = RunGuard::acquire(path)?;

    let spinner = output::create_spinner(&format!("Packaging {} with PyInstaller...", settings.name));
    let result = bundle(path, &settings).await;
    spinner.finish_and_clear();

    let report = result.with_context(|| format!("Failed to bundle '{}'", settings.name))?;

    if is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "artifact": report.artifact.display().to_string(),
                "size": report.size,
                "tool": report.tool,
                "installed_tool": report.installed_tool,
                "elapsed_secs": report.elapsed.as_secs_f64(),
            }))?
        );
        return Ok(());
    }

    let artifact = report
        .artifact
        .strip_prefix(path)
        .unwrap_or(&report.artifact);

    print_success(&format!(
        "Bundled {} in {:.1}s",
        artifact.display(),
        report.elapsed.as_secs_f64()
    ));
    print_detail(&format!(
        "Size: {:.1} MB",
        report.size as f64 / 1_048_576.0
    ));
    print_detail(&format!("Tool: {}", report.tool));
    if report.installed_tool {
        print_detail("Installed PyInstaller into the user site-packages");
    }

    Ok(())
}
