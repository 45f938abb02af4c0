//! Application bundling logic
//!
//! This module contains the business logic for packaging the Python
//! application into a single-file executable with PyInstaller. It
//! resolves (and if needed installs) the tool, removes any artifact
//! from a previous run, and drives the build under a timeout.
//!
//! The stale artifact is deleted before anything else can fail, so an
//! artifact in dist/ always means the most recent bundle succeeded.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::defaults;
use crate::core::manifest::Manifest;
use crate::error::{BundleError, ToolError};
use crate::infra::toolchain::{self, ToolInvocation};
use crate::infra::filesystem;

/// How many stderr lines to keep from a failed build
const STDERR_TAIL_LINES: usize = 20;

/// Command-line overrides for bundling
#[derive(Debug, Clone, Default)]
pub struct BundleOptions {
    /// Override the entry script
    pub entry: Option<String>,
    /// Override the artifact name
    pub name: Option<String>,
    /// Override the build timeout in seconds
    pub timeout: Option<u64>,
    /// Never install PyInstaller automatically
    pub no_install: bool,
}

/// Fully resolved bundle settings (manifest + CLI overrides)
#[derive(Debug, Clone, PartialEq)]
pub struct BundleSettings {
    /// Entry script handed to PyInstaller, relative to the project
    pub entry: String,
    /// Artifact name
    pub name: String,
    /// Build a windowed (no console) application
    pub windowed: bool,
    /// Start from a clean PyInstaller cache
    pub clean_build: bool,
    /// Abort the build after this many seconds
    pub timeout_secs: u64,
    /// Python interpreter used for module invocation and installs
    pub python: String,
    /// Never install PyInstaller automatically
    pub no_install: bool,
    /// Extra arguments appended to the PyInstaller command line
    pub extra_args: Vec<String>,
}

impl BundleSettings {
    /// Resolve settings from the manifest with CLI options taking precedence
    pub fn resolve(manifest: &Manifest, options: &BundleOptions) -> Self {
        let bundle = &manifest.bundle;

        Self {
            entry: options.entry.clone().unwrap_or_else(|| bundle.entry.clone()),
            name: options
                .name
                .clone()
                .or_else(|| bundle.name.clone())
                .unwrap_or_else(|| manifest.project.name.clone()),
            windowed: bundle.windowed,
            clean_build: bundle.clean,
            timeout_secs: options.timeout.unwrap_or(bundle.timeout_secs),
            python: bundle.python.clone(),
            no_install: options.no_install || bundle.no_install,
            extra_args: bundle.extra_args.clone(),
        }
    }

    /// Artifact filename with the platform executable suffix
    pub fn artifact_name(&self) -> String {
        format!("{}{}", self.name, std::env::consts::EXE_SUFFIX)
    }

    /// Where the artifact lands, relative to the project root
    pub fn artifact_path(&self, project_path: &Path) -> PathBuf {
        project_path
            .join(defaults::DIST_DIR)
            .join(self.artifact_name())
    }
}

/// Result of a bundling run
#[derive(Debug)]
pub struct BundleReport {
    /// Built artifact
    pub artifact: PathBuf,
    /// Artifact size in bytes
    pub size: u64,
    /// The PyInstaller invocation that was used
    pub tool: String,
    /// Whether PyInstaller was installed during this run
    pub installed_tool: bool,
    /// Wall-clock build time
    pub elapsed: Duration,
}

/// Package the application into a single-file executable
pub async fn bundle(
    project_path: &Path,
    settings: &BundleSettings,
) -> Result<BundleReport, BundleError> {
    // Delete the previous artifact before anything can fail, so its
    // presence always signals a fresh successful build
    let artifact = settings.artifact_path(project_path);
    filesystem::remove_file(&artifact)?;

    let entry = project_path.join(&settings.entry);
    if !entry.is_file() {
        return Err(BundleError::EntryMissing { path: entry });
    }

    let (invocation, installed_tool) = resolve_tool(settings).await?;
    tracing::info!(tool = %invocation.describe(), "packaging application");

    let args = build_tool_args(settings);
    let started = Instant::now();
    let timeout = Duration::from_secs(settings.timeout_secs);

    let output = match tokio::time::timeout(
        timeout,
        toolchain::invoke(&invocation, &args, project_path),
    )
    .await
    {
        Ok(result) => result?,
        Err(_) => {
            return Err(BundleError::Timeout {
                seconds: settings.timeout_secs,
            })
        }
    };

    if !output.status.success() {
        return Err(BundleError::Failed {
            status: describe_status(output.status),
            stderr: stderr_tail(&output.stderr),
        });
    }

    if !artifact.is_file() {
        return Err(BundleError::ArtifactMissing { path: artifact });
    }

    let size = std::fs::metadata(&artifact)
        .map_err(|e| BundleError::IoError {
            path: artifact.clone(),
            error: e.to_string(),
        })?
        .len();

    Ok(BundleReport {
        artifact,
        size,
        tool: invocation.describe(),
        installed_tool,
        elapsed: started.elapsed(),
    })
}

/// Resolve PyInstaller, installing it when allowed and needed
async fn resolve_tool(settings: &BundleSettings) -> Result<(ToolInvocation, bool), BundleError> {
    if let Some(invocation) = toolchain::resolve(&settings.python)? {
        return Ok((invocation, false));
    }

    if settings.no_install {
        return Err(ToolError::NotInstalled {
            python: settings.python.clone(),
        }
        .into());
    }

    tracing::info!("PyInstaller not found; installing into user site-packages");
    let timeout = Duration::from_secs(settings.timeout_secs);
    match tokio::time::timeout(timeout, toolchain::install(&settings.python)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(ToolError::InstallFailed {
                python: settings.python.clone(),
                stderr: format!("timed out after {}s", settings.timeout_secs),
            }
            .into())
        }
    }

    let invocation = toolchain::resolve(&settings.python)?.ok_or(ToolError::NotInstalled {
        python: settings.python.clone(),
    })?;
    Ok((invocation, true))
}

/// Build the PyInstaller argument list
///
/// The entry script goes last; everything before it is flags.
fn build_tool_args(settings: &BundleSettings) -> Vec<String> {
    let mut args = vec!["--onefile".to_string()];
    if settings.windowed {
        args.push("--noconsole".to_string());
    }
    if settings.clean_build {
        args.push("--clean".to_string());
    }
    args.push("--name".to_string());
    args.push(settings.name.clone());
    args.push("--distpath".to_string());
    args.push(defaults::DIST_DIR.to_string());
    args.push("--workpath".to_string());
    args.push(defaults::BUILD_DIR.to_string());
    args.push("--specpath".to_string());
    args.push(".".to_string());
    args.extend(settings.extra_args.iter().cloned());
    args.push(settings.entry.clone());
    args
}

/// Describe an exit status for error reporting
fn describe_status(status: std::process::ExitStatus) -> String {
    describe_exit_code(status.code())
}

fn describe_exit_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Keep the tail of a failed build's stderr
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::BundleConfig;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn test_settings() -> BundleSettings {
        BundleSettings {
            entry: "main.py".to_string(),
            name: "app".to_string(),
            windowed: true,
            clean_build: true,
            timeout_secs: 600,
            python: "python3".to_string(),
            no_install: false,
            extra_args: Vec::new(),
        }
    }

    // ============================================
    // Unit Tests
    // ============================================

    #[test]
    fn test_build_tool_args_windowed_clean() {
        let args = build_tool_args(&test_settings());

        assert_eq!(args[0], "--onefile");
        assert!(args.contains(&"--noconsole".to_string()));
        assert!(args.contains(&"--clean".to_string()));
        assert_eq!(args.last(), Some(&"main.py".to_string()));

        let name_pos = args.iter().position(|a| a == "--name").unwrap();
        assert_eq!(args[name_pos + 1], "app");
        let dist_pos = args.iter().position(|a| a == "--distpath").unwrap();
        assert_eq!(args[dist_pos + 1], "dist");
        let work_pos = args.iter().position(|a| a == "--workpath").unwrap();
        assert_eq!(args[work_pos + 1], "build");
        let spec_pos = args.iter().position(|a| a == "--specpath").unwrap();
        assert_eq!(args[spec_pos + 1], ".");
    }

    #[test]
    fn test_build_tool_args_console_variant() {
        let mut settings = test_settings();
        settings.windowed = false;
        settings.clean_build = false;

        let args = build_tool_args(&settings);

        assert!(!args.contains(&"--noconsole".to_string()));
        assert!(!args.contains(&"--clean".to_string()));
    }

    #[test]
    fn test_build_tool_args_extra_args_before_entry() {
        let mut settings = test_settings();
        settings.extra_args = vec!["--icon".to_string(), "app.ico".to_string()];

        let args = build_tool_args(&settings);

        let icon_pos = args.iter().position(|a| a == "--icon").unwrap();
        assert_eq!(args[icon_pos + 1], "app.ico");
        assert_eq!(args.last(), Some(&"main.py".to_string()));
    }

    #[test]
    fn test_settings_resolve_defaults_name_to_project() {
        let mut manifest = Manifest::default();
        manifest.project.name = "video-tool".to_string();

        let settings = BundleSettings::resolve(&manifest, &BundleOptions::default());

        assert_eq!(settings.name, "video-tool");
        assert_eq!(settings.entry, "main.py");
        assert!(settings.windowed);
        assert!(settings.clean_build);
        assert_eq!(settings.timeout_secs, defaults::DEFAULT_BUNDLE_TIMEOUT_SECS);
    }

    #[test]
    fn test_settings_resolve_manifest_name_beats_project() {
        let mut manifest = Manifest::default();
        manifest.project.name = "video-tool".to_string();
        manifest.bundle = BundleConfig {
            name: Some("converter".to_string()),
            ..BundleConfig::default()
        };

        let settings = BundleSettings::resolve(&manifest, &BundleOptions::default());
        assert_eq!(settings.name, "converter");
    }

    #[test]
    fn test_settings_resolve_cli_overrides() {
        let manifest = Manifest::default();
        let options = BundleOptions {
            entry: Some("run.py".to_string()),
            name: Some("custom".to_string()),
            timeout: Some(60),
            no_install: true,
        };

        let settings = BundleSettings::resolve(&manifest, &options);

        assert_eq!(settings.entry, "run.py");
        assert_eq!(settings.name, "custom");
        assert_eq!(settings.timeout_secs, 60);
        assert!(settings.no_install);
    }

    #[test]
    fn test_artifact_path() {
        let settings = test_settings();
        let path = settings.artifact_path(Path::new("/work/project"));

        let expected = format!("app{}", std::env::consts::EXE_SUFFIX);
        assert_eq!(path, Path::new("/work/project/dist").join(expected));
    }

    #[test]
    fn test_describe_exit_code() {
        assert_eq!(describe_exit_code(Some(2)), "exit code 2");
        assert_eq!(describe_exit_code(None), "terminated by signal");
    }

    #[test]
    fn test_stderr_tail_short_input() {
        let text = b"line one\nline two";
        assert_eq!(stderr_tail(text), "line one\nline two");
    }

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let input: Vec<String> = (0..30).map(|i| format!("line {i}")).collect();
        let tail = stderr_tail(input.join("\n").as_bytes());

        let lines: Vec<&str> = tail.lines().collect();
        assert_eq!(lines.len(), STDERR_TAIL_LINES);
        assert_eq!(lines[0], "line 10");
        assert_eq!(lines[19], "line 29");
    }

    // ============================================
    // Orchestration Tests
    // ============================================

    #[tokio::test]
    async fn test_bundle_missing_entry_removes_stale_artifact() {
        let project = TempDir::new().unwrap();
        let settings = test_settings();

        // Leftover from an earlier build; no entry script this time
        let artifact = settings.artifact_path(project.path());
        std::fs::create_dir_all(artifact.parent().unwrap()).unwrap();
        std::fs::write(&artifact, "old build").unwrap();

        let result = bundle(project.path(), &settings).await;

        assert!(matches!(result, Err(BundleError::EntryMissing { .. })));
        assert!(
            !artifact.exists(),
            "a failed run must not leave a stale artifact behind"
        );
    }

    // ============================================
    // Property-Based Tests
    // ============================================

    fn arg_strategy() -> impl Strategy<Value = String> {
        "--[a-z]{2,10}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The entry script is always the final argument
        #[test]
        fn prop_entry_is_last_argument(
            extra in prop::collection::vec(arg_strategy(), 0..5),
            windowed in any::<bool>(),
            clean_build in any::<bool>(),
        ) {
            let mut settings = test_settings();
            settings.extra_args = extra;
            settings.windowed = windowed;
            settings.clean_build = clean_build;

            let args = build_tool_args(&settings);
            prop_assert_eq!(args.last(), Some(&settings.entry));
        }

        /// --noconsole appears exactly when the build is windowed
        #[test]
        fn prop_noconsole_tracks_windowed(windowed in any::<bool>()) {
            let mut settings = test_settings();
            settings.windowed = windowed;

            let args = build_tool_args(&settings);
            prop_assert_eq!(args.contains(&"--noconsole".to_string()), windowed);
        }
    }
}
