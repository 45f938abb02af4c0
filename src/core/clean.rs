//! Clean logic
//!
//! This module contains the business logic for cleaning build output.
//! It removes the build/, dist/, and .packmule/ directories plus the
//! generated PyInstaller spec file. Provisioned binaries are left
//! alone; re-downloading them is the expensive path.

use std::path::Path;

use crate::config::defaults;
use crate::error::FilesystemError;

/// Directories to remove during clean
pub const CLEAN_DIRECTORIES: &[&str] = &[
    defaults::BUILD_DIR,
    defaults::DIST_DIR,
    defaults::STAGING_DIR,
];

/// Result of clean operation
#[derive(Debug, Default)]
pub struct CleanResult {
    /// Entries that were removed
    pub removed: Vec<String>,
    /// Entries that didn't exist (skipped)
    pub skipped: Vec<String>,
}

/// Clean build output from a project
///
/// Removes the clean directories and the `<bundle_name>.spec` file
/// PyInstaller writes next to the entry script.
///
/// # Arguments
///
/// * `project_path` - Path to the project root
/// * `bundle_name` - Artifact name, used to locate the spec file
///
/// # Returns
///
/// * `Ok(CleanResult)` - Information about what was cleaned
/// * `Err(FilesystemError)` - If removal fails
pub fn clean_project(project_path: &Path, bundle_name: &str) -> Result<CleanResult, FilesystemError> {
    let mut result = CleanResult::default();

    for dir_name in CLEAN_DIRECTORIES {
        let dir_path = project_path.join(dir_name);

        if dir_path.exists() {
            std::fs::remove_dir_all(&dir_path).map_err(|e| FilesystemError::RemoveDir {
                path: dir_path.clone(),
                error: e.to_string(),
            })?;
            result.removed.push((*dir_name).to_string());
        } else {
            result.skipped.push((*dir_name).to_string());
        }
    }

    let spec_name = format!("{bundle_name}.spec");
    let spec_path = project_path.join(&spec_name);
    if spec_path.exists() {
        std::fs::remove_file(&spec_path).map_err(|e| FilesystemError::RemoveFile {
            path: spec_path.clone(),
            error: e.to_string(),
        })?;
        result.removed.push(spec_name);
    } else {
        result.skipped.push(spec_name);
    }

    Ok(result)
}

/// Check if a project has any build output to clean
pub fn has_build_artifacts(project_path: &Path, bundle_name: &str) -> bool {
    CLEAN_DIRECTORIES
        .iter()
        .any(|dir| project_path.join(dir).exists())
        || project_path.join(format!("{bundle_name}.spec")).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_project() -> TempDir {
        TempDir::new().expect("Failed to create temp directory")
    }

    #[test]
    fn test_clean_removes_build_directory() {
        let project = create_test_project();
        let build_dir = project.path().join("build");
        std::fs::create_dir_all(&build_dir).unwrap();
        std::fs::write(build_dir.join("analysis.toc"), "toc").unwrap();

        let result = clean_project(project.path(), "app").unwrap();

        assert!(!build_dir.exists());
        assert!(result.removed.contains(&"build".to_string()));
    }

    #[test]
    fn test_clean_removes_dist_directory() {
        let project = create_test_project();
        let dist_dir = project.path().join("dist");
        std::fs::create_dir_all(&dist_dir).unwrap();
        std::fs::write(dist_dir.join("app"), "binary").unwrap();

        let result = clean_project(project.path(), "app").unwrap();

        assert!(!dist_dir.exists());
        assert!(result.removed.contains(&"dist".to_string()));
    }

    #[test]
    fn test_clean_removes_staging_directory() {
        let project = create_test_project();
        let staging = project.path().join(".packmule");
        std::fs::create_dir_all(staging.join("extract")).unwrap();
        std::fs::write(staging.join("release.zip"), "zip").unwrap();

        let result = clean_project(project.path(), "app").unwrap();

        assert!(!staging.exists());
        assert!(result.removed.contains(&".packmule".to_string()));
    }

    #[test]
    fn test_clean_removes_spec_file() {
        let project = create_test_project();
        std::fs::write(project.path().join("app.spec"), "# spec").unwrap();

        let result = clean_project(project.path(), "app").unwrap();

        assert!(!project.path().join("app.spec").exists());
        assert!(result.removed.contains(&"app.spec".to_string()));
    }

    #[test]
    fn test_clean_leaves_provisioned_binaries() {
        let project = create_test_project();
        let dest = project.path().join("ffmpeg");
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("ffmpeg"), "binary").unwrap();
        std::fs::create_dir_all(project.path().join("dist")).unwrap();

        clean_project(project.path(), "app").unwrap();

        assert!(dest.join("ffmpeg").exists());
    }

    #[test]
    fn test_clean_succeeds_when_no_artifacts() {
        let project = create_test_project();

        let result = clean_project(project.path(), "app").unwrap();

        assert!(result.removed.is_empty());
        assert!(result.skipped.contains(&"build".to_string()));
        assert!(result.skipped.contains(&"dist".to_string()));
        assert!(result.skipped.contains(&".packmule".to_string()));
        assert!(result.skipped.contains(&"app.spec".to_string()));
    }

    #[test]
    fn test_has_build_artifacts_true() {
        let project = create_test_project();
        std::fs::create_dir_all(project.path().join("dist")).unwrap();

        assert!(has_build_artifacts(project.path(), "app"));
    }

    #[test]
    fn test_has_build_artifacts_spec_only() {
        let project = create_test_project();
        std::fs::write(project.path().join("app.spec"), "# spec").unwrap();

        assert!(has_build_artifacts(project.path(), "app"));
    }

    #[test]
    fn test_has_build_artifacts_false() {
        let project = create_test_project();

        assert!(!has_build_artifacts(project.path(), "app"));
    }
}
