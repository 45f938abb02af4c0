//! CLI implementation for `packmule init` command
//!
//! This module handles the CLI interface for project initialization.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{is_json, print_detail, print_success};
use crate::core::init::{
    append_gitignore_entries, derive_project_name, generate_gitignore_content,
    generate_manifest_content, validate_init, InitOptions,
};

/// Execute the init command
pub async fn execute(path: &Path, force: bool) -> Result<()> {
    let options = InitOptions { force };

    // Validate we can proceed
    validate_init(path, &options).with_context(|| "Failed to validate initialization")?;

    // Generate and write manifest
    let project_name = derive_project_name(path);
    let manifest_content = generate_manifest_content(&project_name);
    let manifest_path = path.join("packmule.toml");

    std::fs::write(&manifest_path, &manifest_content)
        .with_context(|| format!("Failed to write manifest to {}", manifest_path.display()))?;

    // Handle .gitignore
    let gitignore_path = path.join(".gitignore");
    let gitignore_existed = gitignore_path.exists();
    let gitignore_content = if gitignore_existed {
        let existing = std::fs::read_to_string(&gitignore_path)
            .with_context(|| format!("Failed to read {}", gitignore_path.display()))?;
        append_gitignore_entries(&existing)
    } else {
        generate_gitignore_content()
    };

    std::fs::write(&gitignore_path, &gitignore_content)
        .with_context(|| format!("Failed to write {}", gitignore_path.display()))?;

    if is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "project": project_name,
                "manifest": manifest_path.display().to_string(),
                "gitignore_updated": gitignore_existed,
            }))?
        );
        return Ok(());
    }

    print_success(&format!(
        "Initialized packmule project '{project_name}' in {}",
        path.display()
    ));
    print_detail("Created packmule.toml");
    if gitignore_existed {
        print_detail("Updated .gitignore");
    } else {
        print_detail("Created .gitignore");
    }
    print_detail("Next: run 'packmule provision' to stage the media tool");

    Ok(())
}
