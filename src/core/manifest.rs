//! Manifest (packmule.toml) parsing and validation
//!
//! The manifest is the main configuration file for a packmule project.
//! It has three sections: `[project]` metadata, `[provision]` for the
//! media-tool archive, and `[bundle]` for the PyInstaller build.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{defaults, urls};

/// The main project manifest (packmule.toml)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    /// Project configuration
    pub project: ProjectConfig,

    /// Archive provisioning configuration
    #[serde(default)]
    pub provision: ProvisionConfig,

    /// Bundle build configuration
    #[serde(default)]
    pub bundle: BundleConfig,
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Project description
    #[serde(default)]
    pub description: Option<String>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Provisioning configuration for the external media tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProvisionConfig {
    /// Release archive URL template; `{version}` is replaced with the
    /// pinned version
    #[serde(default = "default_release_url")]
    pub url: String,

    /// Pinned release version
    #[serde(default = "default_release_version")]
    pub version: String,

    /// Destination directory for staged binaries, relative to the project
    #[serde(default = "default_dest_dir")]
    pub dest: String,

    /// Primary executable to stage (build fails without it)
    #[serde(default = "default_primary_binary")]
    pub primary: String,

    /// Companion executable to stage when present; empty disables it
    #[serde(default = "default_secondary_binary")]
    pub secondary: String,

    /// Expected SHA256 of the release archive
    #[serde(default)]
    pub sha256: Option<String>,

    /// Keep the staging directory after a failed run
    #[serde(default)]
    pub keep_temp: bool,
}

fn default_release_url() -> String {
    urls::DEFAULT_RELEASE_URL_TEMPLATE.to_string()
}

fn default_release_version() -> String {
    defaults::DEFAULT_RELEASE_VERSION.to_string()
}

fn default_dest_dir() -> String {
    defaults::DEFAULT_DEST_DIR.to_string()
}

fn default_primary_binary() -> String {
    defaults::DEFAULT_PRIMARY_BINARY.to_string()
}

fn default_secondary_binary() -> String {
    defaults::DEFAULT_SECONDARY_BINARY.to_string()
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            url: default_release_url(),
            version: default_release_version(),
            dest: default_dest_dir(),
            primary: default_primary_binary(),
            secondary: default_secondary_binary(),
            sha256: None,
            keep_temp: false,
        }
    }
}

/// Bundle build configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BundleConfig {
    /// Entry script handed to PyInstaller
    #[serde(default = "default_entry")]
    pub entry: String,

    /// Artifact name; defaults to the project name
    #[serde(default)]
    pub name: Option<String>,

    /// Build a windowed (no console) application
    #[serde(default = "default_true")]
    pub windowed: bool,

    /// Start each build from a clean PyInstaller cache
    #[serde(default = "default_true")]
    pub clean: bool,

    /// Abort the build after this many seconds
    #[serde(default = "default_bundle_timeout")]
    pub timeout_secs: u64,

    /// Python interpreter used for module invocation and installs
    #[serde(default = "default_python")]
    pub python: String,

    /// Never install PyInstaller automatically
    #[serde(default)]
    pub no_install: bool,

    /// Extra arguments appended to the PyInstaller command line
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_entry() -> String {
    defaults::DEFAULT_ENTRY.to_string()
}

fn default_true() -> bool {
    true
}

fn default_bundle_timeout() -> u64 {
    defaults::DEFAULT_BUNDLE_TIMEOUT_SECS
}

fn default_python() -> String {
    defaults::DEFAULT_PYTHON.to_string()
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            entry: default_entry(),
            name: None,
            windowed: true,
            clean: true,
            timeout_secs: default_bundle_timeout(),
            python: default_python(),
            no_install: false,
            extra_args: Vec::new(),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            version: default_version(),
            description: None,
        }
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            provision: ProvisionConfig::default(),
            bundle: BundleConfig::default(),
        }
    }
}

impl Manifest {
    /// Load manifest from file path
    pub fn load(path: &std::path::Path) -> Result<Self, crate::error::PackmuleError> {
        if !path.exists() {
            return Err(crate::error::PackmuleError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::PackmuleError::Io { source: e })?;
        Self::from_toml(&content)
            .map_err(|e| crate::error::PackmuleError::ManifestParse { source: e })
    }

    /// Load manifest from TOML string
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize manifest to TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Validate a manifest file and report all errors.
///
/// Checks required fields, URL and checksum shapes, and overall
/// structure, collecting every problem found rather than stopping at
/// the first.
pub fn validate_manifest(path: &std::path::Path) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            errors.push(format!("Failed to read manifest file: {e}"));
            return Err(errors);
        }
    };

    let value: toml::Value = match toml::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            errors.push(format!("Invalid TOML syntax: {e}"));
            return Err(errors);
        }
    };

    // Check for required [project] section
    let Some(project) = value.get("project") else {
        errors.push("Missing required [project] section".to_string());
        return Err(errors);
    };

    if project.get("name").is_none() {
        errors.push("Missing required field 'project.name'".to_string());
    } else if let Some(name) = project.get("name").and_then(|v| v.as_str()) {
        if name.is_empty() {
            errors.push("Field 'project.name' cannot be empty".to_string());
        }
    }

    if let Some(provision) = value.get("provision") {
        if let Some(url) = provision.get("url").and_then(|v| v.as_str()) {
            if url.is_empty() {
                errors.push("Field 'provision.url' cannot be empty".to_string());
            } else if !url.starts_with("http://") && !url.starts_with("https://") {
                errors.push(format!(
                    "Invalid provision.url '{url}': expected an http(s) URL"
                ));
            }
        }

        if let Some(version) = provision.get("version").and_then(|v| v.as_str()) {
            if version.is_empty() {
                errors.push("Field 'provision.version' cannot be empty".to_string());
            }
        }

        if let Some(primary) = provision.get("primary").and_then(|v| v.as_str()) {
            if primary.is_empty() {
                errors.push("Field 'provision.primary' cannot be empty".to_string());
            }
        }

        if let Some(sha256) = provision.get("sha256").and_then(|v| v.as_str()) {
            if !is_valid_sha256(sha256) {
                errors.push(format!(
                    "Invalid provision.sha256 '{sha256}': expected 64 hex characters"
                ));
            }
        }
    }

    if let Some(bundle) = value.get("bundle") {
        if let Some(entry) = bundle.get("entry").and_then(|v| v.as_str()) {
            if entry.is_empty() {
                errors.push("Field 'bundle.entry' cannot be empty".to_string());
            }
        }

        if let Some(timeout) = bundle.get("timeout_secs").and_then(toml::Value::as_integer) {
            if timeout <= 0 {
                errors.push(format!(
                    "Invalid bundle.timeout_secs '{timeout}': must be positive"
                ));
            }
        }
    }

    // Try to parse as Manifest to catch any other structural issues
    if let Err(e) = Manifest::from_toml(&content) {
        let err_str = e.to_string();
        if !errors
            .iter()
            .any(|existing| err_str.contains(&existing[..existing.len().min(20)]))
        {
            errors.push(format!("Manifest structure error: {e}"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check if a string is a plausible SHA256 digest (64 hex chars)
fn is_valid_sha256(digest: &str) -> bool {
    let re = Regex::new(r"^[0-9a-fA-F]{64}$").unwrap();
    re.is_match(digest)
}
