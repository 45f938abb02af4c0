//! CLI implementation for `packmule clean` command
//!
//! This module handles the CLI interface for removing build output.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{is_json, print_detail, print_success};
use crate::core::bundle::{BundleOptions, BundleSettings};
use crate::core::clean::{clean_project, has_build_artifacts};
use crate::core::manifest::Manifest;

/// Execute the clean command
pub async fn execute(path: &Path) -> Result<()> {
    // Verify we're in a packmule project
    let manifest_path = path.join("packmule.toml");
    if !manifest_path.exists() {
        anyhow::bail!(
            "No packmule.toml found in {}. Run 'packmule init' to create a project.",
            path.display()
        );
    }

    let manifest = Manifest::load(&manifest_path)
        .with_context(|| format!("Failed to load manifest from {}", manifest_path.display()))?;

    // The spec file is named after the bundle artifact
    let bundle_name = BundleSettings::resolve(&manifest, &BundleOptions::default()).name;

    if !has_build_artifacts(path, &bundle_name) {
        if is_json() {
            println!("{}", serde_json::json!({ "removed": [] }));
        } else {
            print_success("Nothing to clean");
        }
        return Ok(());
    }

    let result = clean_project(path, &bundle_name).with_context(|| "Failed to clean build output")?;

    if is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "removed": result.removed,
                "skipped": result.skipped,
            }))?
        );
        return Ok(());
    }

    if result.removed.is_empty() {
        print_success("Nothing to clean");
    } else {
        print_success("Cleaned build output:");
        for entry in &result.removed {
            print_detail(&format!("Removed {entry}"));
        }
    }

    Ok(())
}
