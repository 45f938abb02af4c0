//! Bundling toolchain resolution
//!
//! Locates the PyInstaller toolchain on the host. PyInstaller may be
//! present in two shapes: a standalone `pyinstaller` executable on PATH,
//! or an importable module reachable through `python -m PyInstaller`.
//! This module resolves whichever is available, installs the tool into
//! the user's site-packages when neither is, and runs the resolved
//! invocation.

use std::path::{Path, PathBuf};

use crate::error::ToolError;

/// A concrete way to run PyInstaller on this host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    /// Standalone `pyinstaller` executable found on PATH
    Standalone(PathBuf),
    /// Importable module, run as `<python> -m PyInstaller`
    Module { python: String },
}

impl ToolInvocation {
    /// Build the base command for this invocation (before tool arguments)
    pub fn base_command(&self) -> tokio::process::Command {
        match self {
            ToolInvocation::Standalone(path) => tokio::process::Command::new(path),
            ToolInvocation::Module { python } => {
                let mut cmd = tokio::process::Command::new(python);
                cmd.args(["-m", "PyInstaller"]);
                cmd
            }
        }
    }

    /// Human-readable description for logs and summaries
    pub fn describe(&self) -> String {
        match self {
            ToolInvocation::Standalone(path) => path.display().to_string(),
            ToolInvocation::Module { python } => format!("{python} -m PyInstaller"),
        }
    }
}

/// Find a standalone `pyinstaller` executable on PATH
pub fn find_standalone() -> Option<PathBuf> {
    which::which("pyinstaller").ok()
}

/// Check whether the configured Python interpreter can be spawned
pub fn python_available(python: &str) -> bool {
    std::process::Command::new(python)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Probe for PyInstaller as an importable module
///
/// Returns the reported version string when the module is present.
pub fn probe_module(python: &str) -> Option<String> {
    let output = std::process::Command::new(python)
        .args(["-m", "PyInstaller", "--version"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if version.is_empty() {
        None
    } else {
        Some(version)
    }
}

/// Resolve how to invoke PyInstaller on this host
///
/// Checks for a standalone executable first, then for the importable
/// module. Returns `Ok(None)` when Python works but PyInstaller is not
/// installed in either shape.
///
/// # Errors
///
/// Returns `PythonNotFound` when the configured interpreter itself
/// cannot be spawned.
pub fn resolve(python: &str) -> Result<Option<ToolInvocation>, ToolError> {
    if let Some(path) = find_standalone() {
        tracing::debug!(path = %path.display(), "found standalone pyinstaller");
        return Ok(Some(ToolInvocation::Standalone(path)));
    }

    if !python_available(python) {
        return Err(ToolError::PythonNotFound {
            python: python.to_string(),
        });
    }

    if let Some(version) = probe_module(python) {
        tracing::debug!(%version, "found PyInstaller module");
        return Ok(Some(ToolInvocation::Module {
            python: python.to_string(),
        }));
    }

    Ok(None)
}

/// Install PyInstaller into the user's site-packages
///
/// Runs `<python> -m pip install --user pyinstaller` and captures its
/// output. A non-zero exit is reported as `InstallFailed` with pip's
/// stderr.
pub async fn install(python: &str) -> Result<(), ToolError> {
    let output = tokio::process::Command::new(python)
        .args(["-m", "pip", "install", "--user", "pyinstaller"])
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| ToolError::SpawnFailed {
            command: format!("{python} -m pip"),
            error: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(ToolError::InstallFailed {
            python: python.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Run the resolved PyInstaller invocation with the given arguments
///
/// Captures stdout and stderr; the caller decides what a failure exit
/// means. The child is killed if the future is dropped, so wrapping
/// this in a timeout does not leak the process.
pub async fn invoke(
    invocation: &ToolInvocation,
    args: &[String],
    cwd: &Path,
) -> Result<std::process::Output, ToolError> {
    let mut cmd = invocation.base_command();
    cmd.args(args).current_dir(cwd).kill_on_drop(true);

    cmd.output().await.map_err(|e| ToolError::SpawnFailed {
        command: invocation.describe(),
        error: e.to_string(),
    })
}
