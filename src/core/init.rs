//! Project initialization logic
//!
//! This module contains the business logic for initializing packmule in
//! a project directory. It generates the manifest and the .gitignore
//! entries for build output; the command layer does the writing.

use std::path::Path;

use crate::config::defaults;
use crate::core::manifest::Manifest;
use crate::error::InitError;

/// Entries to add to .gitignore
pub const GITIGNORE_ENTRIES: &[&str] = &["build/", "dist/", ".packmule/", ".packmule.lock", "*.spec"];

/// Marker comment for the packmule section in .gitignore
pub const GITIGNORE_MARKER: &str = "# packmule";

/// Options for project initialization
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Overwrite an existing manifest
    pub force: bool,
}

/// Generate the default manifest content with comments
pub fn generate_manifest_content(project_name: &str) -> String {
    let url = crate::config::urls::DEFAULT_RELEASE_URL_TEMPLATE;
    let version = defaults::DEFAULT_RELEASE_VERSION;
    let dest = defaults::DEFAULT_DEST_DIR;
    let entry = defaults::DEFAULT_ENTRY;
    let timeout = defaults::DEFAULT_BUNDLE_TIMEOUT_SECS;

    format!(
        r#"# Packmule Project Configuration

[project]
name = "{project_name}"
version = "0.1.0"
# description = "My desktop application"

[provision]
# Release archive URL; {{version}} is replaced with the pinned version
url = "{url}"
version = "{version}"
# Directory the binaries are staged into, relative to the project
dest = "{dest}"
# Primary executable; provisioning fails if the archive lacks it
primary = "ffmpeg"
# Companion executable, staged when present; set "" to skip it
secondary = "ffprobe"
# Expected archive checksum (recommended for reproducible setups)
# sha256 = "..."

[bundle]
# Entry script handed to PyInstaller
entry = "{entry}"
# Artifact name; defaults to the project name
# name = "{project_name}"
# Build a windowed application (no console window)
windowed = true
# Start each build from a clean PyInstaller cache
clean = true
# Abort the build after this many seconds
timeout_secs = {timeout}
# Interpreter used for module invocation and installs
# python = "python3"
# Extra arguments appended to the PyInstaller command line
# extra_args = ["--icon", "app.ico"]
"#
    )
}

/// Generate .gitignore content for packmule
pub fn generate_gitignore_content() -> String {
    let mut content = String::from(GITIGNORE_MARKER);
    content.push('\n');
    for entry in GITIGNORE_ENTRIES {
        content.push_str(entry);
        content.push('\n');
    }
    content
}

/// Check if .gitignore already has packmule entries
pub fn gitignore_has_packmule_entries(content: &str) -> bool {
    content.contains(GITIGNORE_MARKER)
}

/// Append packmule entries to existing .gitignore content
pub fn append_gitignore_entries(existing: &str) -> String {
    if gitignore_has_packmule_entries(existing) {
        // Already has packmule entries, return as-is (idempotent)
        return existing.to_string();
    }

    let mut result = existing.to_string();
    if !result.is_empty() && !result.ends_with('\n') {
        result.push('\n');
    }
    if !result.is_empty() {
        result.push('\n');
    }
    result.push_str(&generate_gitignore_content());
    result
}

/// Validate initialization can proceed
pub fn validate_init(path: &Path, options: &InitOptions) -> Result<(), InitError> {
    if !path.exists() {
        return Err(InitError::DirectoryNotFound {
            path: path.to_path_buf(),
        });
    }

    let manifest_path = path.join("packmule.toml");
    if manifest_path.exists() && !options.force {
        return Err(InitError::ManifestExists {
            path: manifest_path,
        });
    }

    Ok(())
}

/// Derive project name from directory
pub fn derive_project_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "my-project".to_string())
}

/// Parse the manifest from generated content (for validation)
pub fn parse_manifest(content: &str) -> Result<Manifest, InitError> {
    Manifest::from_toml(content).map_err(|e| InitError::ManifestError {
        error: e.to_string(),
    })
}
