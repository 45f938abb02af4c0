//! Doctor command logic
//!
//! Checks the host toolchain and project setup, reporting issues with
//! suggestions.

use std::path::Path;

use crate::config::{defaults, urls};
use crate::core::manifest::{BundleConfig, Manifest, ProvisionConfig};
use crate::infra::toolchain;

/// Result of a single dependency check
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the dependency being checked
    pub name: String,
    /// Whether the check passed
    pub passed: bool,
    /// Version if available
    pub version: Option<String>,
    /// Error message if check failed
    pub error: Option<String>,
    /// Suggestion for fixing the issue
    pub suggestion: Option<String>,
    /// Whether this is a required or optional dependency
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result
    pub fn pass(name: &str, version: Option<String>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            version,
            error: None,
            suggestion: None,
            required,
        }
    }

    /// Create a failing check result
    pub fn fail(name: &str, error: &str, suggestion: Option<&str>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            version: None,
            error: Some(error.to_string()),
            suggestion: suggestion.map(String::from),
            required,
        }
    }
}

/// Overall doctor report
#[derive(Debug, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// Configuration issues found
    pub config_issues: Vec<String>,
}

impl DoctorReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check result
    pub fn add_check(&mut self, result: CheckResult) {
        self.checks.push(result);
    }

    /// Add a configuration issue
    pub fn add_config_issue(&mut self, issue: String) {
        self.config_issues.push(issue);
    }

    /// Check if all required checks passed
    pub fn all_required_passed(&self) -> bool {
        self.checks
            .iter()
            .filter(|c| c.required)
            .all(|c| c.passed)
    }

    /// Check if all checks passed (including optional)
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed) && self.config_issues.is_empty()
    }

    /// Count passed checks
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Count failed checks
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// Get all failed required checks
    pub fn failed_required(&self) -> Vec<&CheckResult> {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .collect()
    }
}

/// Check if a command is available in PATH
pub fn check_command_available(command: &str) -> Option<String> {
    std::process::Command::new(command)
        .arg("--version")
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                // Try to extract version from output
                let combined = format!("{stdout}{stderr}");
                extract_version(&combined)
            } else {
                None
            }
        })
}

/// Extract version string from command output
fn extract_version(output: &str) -> Option<String> {
    // Try to find version patterns like "1.2.3" or "v1.2.3"
    let version_regex = regex::Regex::new(r"v?(\d+\.\d+(?:\.\d+)?(?:-\w+)?)").ok()?;
    version_regex
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Check the Python interpreter availability
pub fn check_python(python: &str) -> CheckResult {
    match check_command_available(python) {
        Some(version) => CheckResult::pass("Python", Some(version), true),
        None => CheckResult::fail(
            "Python",
            &format!("Python interpreter '{python}' not found in PATH"),
            Some(
                format!(
                    "Install Python from {} or set bundle.python in packmule.toml",
                    urls::PYTHON_DOWNLOAD
                )
                .as_str(),
            ),
            true,
        ),
    }
}

/// Check PyInstaller availability (standalone command or module)
pub fn check_bundler(python: &str) -> CheckResult {
    if let Some(path) = toolchain::find_standalone() {
        let version = check_command_available(&path.to_string_lossy());
        return bundler_result(version);
    }

    if let Some(raw) = toolchain::probe_module(python) {
        let version = extract_version(&raw).or(Some(raw));
        return bundler_result(version);
    }

    CheckResult::fail(
        "PyInstaller",
        "PyInstaller not found as a standalone command or Python module",
        Some(
            format!(
                "Run 'packmule bundle' to install it automatically, or install manually: \
                 {python} -m pip install --user pyinstaller (see {})",
                urls::PYINSTALLER_HOMEPAGE
            )
            .as_str(),
        ),
        true,
    )
}

/// Build the PyInstaller check result, flagging outdated versions
fn bundler_result(version: Option<String>) -> CheckResult {
    if let Some(found) = version
        .as_deref()
        .and_then(|v| semver::Version::parse(v).ok())
    {
        if let Ok(min) = semver::Version::parse(defaults::MIN_PYINSTALLER_VERSION) {
            if found < min {
                return CheckResult::fail(
                    "PyInstaller",
                    &format!("PyInstaller {found} is older than the supported minimum {min}"),
                    Some("Upgrade with 'python -m pip install --user --upgrade pyinstaller'"),
                    false,
                );
            }
        }
    }
    CheckResult::pass("PyInstaller", version, true)
}

/// Check whether the provisioned primary binary is staged
pub fn check_staged_primary(project_dir: &Path, provision: &ProvisionConfig) -> CheckResult {
    let binary = crate::core::provision::platform_binary_name(&provision.primary);
    let staged = project_dir.join(&provision.dest).join(&binary);
    let name = format!("{} (provisioned)", provision.primary);

    if staged.is_file() {
        CheckResult::pass(&name, None, false)
    } else {
        CheckResult::fail(
            &name,
            &format!("Not staged at '{}'", staged.display()),
            Some("Run 'packmule provision' to download and stage it"),
            false,
        )
    }
}

/// Check whether the bundle entry script exists
pub fn check_entry_script(project_dir: &Path, bundle: &BundleConfig) -> CheckResult {
    let entry = project_dir.join(&bundle.entry);
    let name = format!("Entry script ({})", bundle.entry);

    if entry.is_file() {
        CheckResult::pass(&name, None, false)
    } else {
        CheckResult::fail(
            &name,
            &format!("Not found at '{}'", entry.display()),
            Some("Create it or point bundle.entry at your application's entry script"),
            false,
        )
    }
}

/// Collect manifest issues for the report
pub fn check_project_config(project_dir: &Path) -> Vec<String> {
    let manifest_path = project_dir.join("packmule.toml");
    if !manifest_path.exists() {
        return vec!["No packmule.toml found. Run 'packmule init' to create one".to_string()];
    }
    match crate::core::manifest::validate_manifest(&manifest_path) {
        Ok(()) => Vec::new(),
        Err(issues) => issues,
    }
}

/// Run all doctor checks
pub fn run_doctor(project_dir: Option<&Path>, manifest: Option<&Manifest>) -> DoctorReport {
    let mut report = DoctorReport::new();

    let python = manifest
        .map(|m| m.bundle.python.as_str())
        .unwrap_or(defaults::DEFAULT_PYTHON);

    // Toolchain checks
    report.add_check(check_python(python));
    report.add_check(check_bundler(python));

    // Project checks need a directory and a parsed manifest
    if let Some(dir) = project_dir {
        if let Some(m) = manifest {
            report.add_check(check_staged_primary(dir, &m.provision));
            report.add_check(check_entry_script(dir, &m.bundle));
        }

        for issue in check_project_config(dir) {
            report.add_config_issue(issue);
        }
    }

    report
}
