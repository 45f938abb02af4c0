//! Integration tests for `packmule init` command
//!
//! Covers manifest scaffolding, .gitignore handling, and the --force
//! overwrite flow.

mod common;

use common::TestProject;
use proptest::prelude::*;
use std::process::Command;

/// Helper to run packmule init command
fn run_init(project: &TestProject, args: &[&str]) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_packmule"));
    cmd.current_dir(project.path());
    cmd.arg("init");
    for arg in args {
        cmd.arg(arg);
    }
    cmd.output().expect("Failed to execute packmule init")
}

/// Helper to check if packmule.toml exists and is valid
fn has_valid_manifest(project: &TestProject) -> bool {
    let manifest_path = project.path().join("packmule.toml");
    if !manifest_path.exists() {
        return false;
    }
    let content = std::fs::read_to_string(&manifest_path).unwrap_or_default();
    toml::from_str::<toml::Value>(&content).is_ok()
}

/// Helper to check if .gitignore has packmule entries
fn has_gitignore_entries(project: &TestProject) -> bool {
    let gitignore_path = project.path().join(".gitignore");
    if !gitignore_path.exists() {
        return false;
    }
    let content = std::fs::read_to_string(&gitignore_path).unwrap_or_default();
    content.contains("build/")
        && content.contains("dist/")
        && content.contains(".packmule/")
        && content.contains("*.spec")
}

// ============================================
// Unit Tests for packmule init
// ============================================

/// Test: Creates packmule.toml in an empty directory
#[test]
fn test_init_creates_manifest_in_empty_directory() {
    let project = TestProject::new();

    let output = run_init(&project, &[]);

    assert!(
        output.status.success(),
        "packmule init should succeed in empty directory: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        has_valid_manifest(&project),
        "packmule.toml should be created and valid"
    );
}

/// Test: Creates .gitignore with packmule entries
#[test]
fn test_init_creates_gitignore() {
    let project = TestProject::new();

    let output = run_init(&project, &[]);

    assert!(
        output.status.success(),
        "packmule init should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        has_gitignore_entries(&project),
        ".gitignore should contain packmule entries"
    );

    // Verify specific entries
    let content = project.read_file(".gitignore");
    assert!(content.contains("build/"), ".gitignore should exclude build/");
    assert!(content.contains("dist/"), ".gitignore should exclude dist/");
    assert!(
        content.contains(".packmule/"),
        ".gitignore should exclude the staging directory"
    );
    assert!(
        content.contains(".packmule.lock"),
        ".gitignore should exclude the lock file"
    );
    assert!(content.contains("*.spec"), ".gitignore should exclude spec files");
}

/// Test: Succeeds in a directory that already has application files
#[test]
fn test_init_succeeds_in_nonempty_directory() {
    let project = TestProject::new();

    project.create_file("main.py", "print('hello')");
    project.create_file("requirements.txt", "requests\n");

    let output = run_init(&project, &[]);

    assert!(
        output.status.success(),
        "packmule init should succeed alongside existing files: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(has_valid_manifest(&project), "packmule.toml should be created");

    // Verify existing files are preserved
    assert_eq!(
        project.read_file("main.py"),
        "print('hello')",
        "Existing file content should be unchanged"
    );
}

/// Test: Fails when packmule.toml exists without --force
#[test]
fn test_init_fails_when_manifest_exists_without_force() {
    let project = TestProject::new();

    let first = run_init(&project, &[]);
    assert!(first.status.success(), "First init should succeed");

    let second = run_init(&project, &[]);

    assert!(
        !second.status.success(),
        "packmule init should fail when packmule.toml already exists"
    );

    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(
        stderr.contains("already exists") || stderr.contains("--force"),
        "Error should mention the existing manifest or --force flag: {stderr}"
    );
}

/// Test: Succeeds with --force when packmule.toml exists
#[test]
fn test_init_succeeds_with_force_over_existing_manifest() {
    let project = TestProject::new();

    project.create_file("packmule.toml", "# stale manifest\n");

    let output = run_init(&project, &["--force"]);

    assert!(
        output.status.success(),
        "packmule init --force should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        has_valid_manifest(&project),
        "packmule.toml should be regenerated"
    );

    let content = project.read_file("packmule.toml");
    assert!(
        !content.contains("stale manifest"),
        "Old manifest content should be replaced"
    );
}

/// Test: Appending to existing .gitignore preserves existing content
#[test]
fn test_init_appends_to_existing_gitignore() {
    let project = TestProject::new();

    let existing_content = "# My custom ignores\n*.log\nnode_modules/\n";
    project.create_file(".gitignore", existing_content);

    let output = run_init(&project, &[]);

    assert!(
        output.status.success(),
        "packmule init should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let content = project.read_file(".gitignore");

    // Verify existing content is preserved
    assert!(
        content.contains("*.log"),
        "Existing .gitignore entries should be preserved"
    );
    assert!(
        content.contains("node_modules/"),
        "Existing .gitignore entries should be preserved"
    );

    // Verify packmule entries are added
    assert!(content.contains("dist/"), "packmule entries should be added");
    assert!(
        content.contains("# packmule"),
        "packmule section marker should be added"
    );
}

/// Test: Appending to existing .gitignore is idempotent
#[test]
fn test_init_gitignore_append_idempotent() {
    let project = TestProject::new();

    // First init
    let output1 = run_init(&project, &[]);
    assert!(output1.status.success(), "First init should succeed");

    let content_after_first = project.read_file(".gitignore");

    // Second init with --force
    let output2 = run_init(&project, &["--force"]);
    assert!(output2.status.success(), "Second init should succeed");

    let content_after_second = project.read_file(".gitignore");

    // Content should be the same (idempotent)
    assert_eq!(
        content_after_first, content_after_second,
        "Running init twice should produce the same .gitignore content"
    );

    // Verify no duplicate entries
    let dist_count = content_after_second.matches("dist/").count();
    assert_eq!(dist_count, 1, "dist/ should appear exactly once, not duplicated");
}

/// Test: Generated manifest has commented examples
#[test]
fn test_init_manifest_has_commented_examples() {
    let project = TestProject::new();

    let output = run_init(&project, &[]);
    assert!(output.status.success(), "packmule init should succeed");

    let content = project.read_file("packmule.toml");

    assert!(
        content.contains('#'),
        "Manifest should contain comments with examples"
    );
}

/// Test: Generated URL template keeps the version placeholder literal
#[test]
fn test_init_manifest_keeps_version_placeholder() {
    let project = TestProject::new();

    let output = run_init(&project, &[]);
    assert!(output.status.success(), "packmule init should succeed");

    let content = project.read_file("packmule.toml");
    assert!(
        content.contains("{version}"),
        "URL template should keep the {{version}} placeholder: {content}"
    );
}

/// Test: Project name is derived from the directory name
#[test]
fn test_init_derives_project_name_from_directory() {
    let project = TestProject::new();
    project.create_dir("video-muncher");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_packmule"));
    cmd.current_dir(project.path().join("video-muncher"));
    cmd.arg("init");
    let output = cmd.output().expect("Failed to execute packmule init");

    assert!(
        output.status.success(),
        "packmule init should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let content = project.read_file("video-muncher/packmule.toml");
    assert!(
        content.contains("name = \"video-muncher\""),
        "Project name should come from the directory name: {content}"
    );
}

/// Test: --json emits a machine-readable summary
#[test]
fn test_init_json_output() {
    let project = TestProject::new();

    let output = run_init(&project, &["--json"]);

    assert!(
        output.status.success(),
        "packmule init --json should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("stdout should be valid JSON");

    assert!(parsed.get("project").is_some(), "JSON should name the project");
    assert!(
        parsed.get("manifest").is_some(),
        "JSON should include the manifest path"
    );
}

// ============================================
// Property-Based Tests
// ============================================

/// Strategy for generating valid project directory states
fn directory_state_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (
            "[a-z][a-z0-9_]{0,10}\\.(txt|md|json)".prop_filter("valid filename", |s| {
                !s.is_empty() && !s.contains("packmule")
            }),
            "[a-zA-Z0-9 ]{1,50}",
        ),
        0..5,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any existing .gitignore content, running packmule init multiple
    /// times should produce the same result (idempotent).
    #[test]
    fn prop_gitignore_append_idempotent(
        existing_entries in prop::collection::vec("[a-z_/]+", 0..10)
    ) {
        let project = TestProject::new();

        // Create initial .gitignore with random entries
        let initial_content = existing_entries.join("\n");
        if !initial_content.is_empty() {
            project.create_file(".gitignore", &initial_content);
        }

        // First init
        let output1 = run_init(&project, &["--force"]);
        prop_assume!(output1.status.success());

        let content_after_first = project.read_file(".gitignore");

        // Second init
        let output2 = run_init(&project, &["--force"]);
        prop_assume!(output2.status.success());

        let content_after_second = project.read_file(".gitignore");

        // Idempotence: content should be identical
        prop_assert_eq!(
            content_after_first,
            content_after_second,
            "Gitignore append should be idempotent"
        );
    }

    /// Init with --force preserves unrelated files
    #[test]
    fn prop_init_force_preserves_files(
        files in directory_state_strategy()
    ) {
        let project = TestProject::new();

        // Create files
        for (name, content) in &files {
            project.create_file(name, content);
        }

        // Run init with --force
        let output = run_init(&project, &["--force"]);
        prop_assume!(output.status.success());

        // Verify all files are preserved
        for (name, content) in &files {
            prop_assert!(
                project.file_exists(name),
                "File {} should be preserved",
                name
            );
            prop_assert_eq!(
                project.read_file(name),
                content.clone(),
                "File {} content should be unchanged",
                name
            );
        }
    }
}
