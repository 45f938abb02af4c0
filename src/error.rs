//! Error types for packmule
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Project initialization errors
#[derive(Error, Debug)]
pub enum InitError {
    /// Directory not found
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Manifest already exists
    #[error("Manifest already exists at '{path}'. Use --force to overwrite")]
    ManifestExists { path: PathBuf },

    /// Generated manifest failed to parse
    #[error("Manifest error: {error}")]
    ManifestError { error: String },
}

/// Download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Network error
    #[error("Network error downloading '{url}': {error}")]
    NetworkError { url: String, error: String },

    /// Request exceeded the configured timeout
    #[error("Download of '{url}' timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    /// Server answered with a non-success status
    #[error("Server returned {status} for '{url}'")]
    HttpStatus { url: String, status: u16 },

    /// Checksum verification failed
    #[error("Checksum verification failed for '{file}': expected {expected}, got {actual}")]
    ChecksumFailed {
        file: String,
        expected: String,
        actual: String,
    },

    /// IO error
    #[error("IO error for '{path}': {error}")]
    IoError { path: PathBuf, error: String },

    /// Max retries exceeded
    #[error("Download failed after {retries} retries: {url}")]
    MaxRetriesExceeded { url: String, retries: u32 },
}

/// Archive extraction errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Archive format not recognized from the filename
    #[error("Unsupported archive format: '{filename}' (expected .zip, .tar.gz, or .tar.zst)")]
    UnsupportedFormat { filename: String },

    /// Entry path escapes the extraction directory
    #[error("Archive entry '{entry}' escapes the extraction directory")]
    PathTraversal { entry: String },

    /// Archive contains no entries
    #[error("Archive '{path}' contains no entries")]
    EmptyArchive { path: PathBuf },

    /// IO error while reading or unpacking
    #[error("IO error for '{path}': {error}")]
    IoError { path: PathBuf, error: String },
}

/// Packaging-tool resolution and installation errors
#[derive(Error, Debug)]
pub enum ToolError {
    /// Python interpreter not found on PATH
    #[error("Python interpreter '{python}' not found on PATH")]
    PythonNotFound { python: String },

    /// Packaging tool unavailable as a command or module
    #[error("PyInstaller is not available as a command or as a module of '{python}'")]
    NotInstalled { python: String },

    /// User-scoped installation failed
    #[error("Failed to install PyInstaller via '{python} -m pip': {stderr}")]
    InstallFailed { python: String, stderr: String },

    /// Failed to spawn a tool process
    #[error("Failed to run '{command}': {error}")]
    SpawnFailed { command: String, error: String },
}

/// Provisioning errors
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Archive error
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Required binary absent from the extracted archive
    #[error("Required binary '{name}' not found anywhere in the extracted archive")]
    BinaryMissing { name: String },

    /// Failed to copy a binary into the destination
    #[error("Failed to stage '{name}' into '{dest}': {error}")]
    StageFailed {
        name: String,
        dest: PathBuf,
        error: String,
    },

    /// Filesystem error
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Bundling errors
#[derive(Error, Debug)]
pub enum BundleError {
    /// Entry-point script missing
    #[error("Entry point '{path}' not found")]
    EntryMissing { path: PathBuf },

    /// Tool error
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Packaging subprocess exceeded the configured timeout
    #[error("Packaging timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Packaging subprocess exited with failure
    #[error("Packaging failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    /// Subprocess succeeded but the artifact is missing
    #[error("Packaging reported success but no artifact exists at '{path}'")]
    ArtifactMissing { path: PathBuf },

    /// Filesystem error
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// IO error
    #[error("IO error for '{path}': {error}")]
    IoError { path: PathBuf, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to copy file
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },

    /// Failed to remove file
    #[error("Failed to remove file '{path}': {error}")]
    RemoveFile { path: PathBuf, error: String },
}

/// Run-lock errors
#[derive(Error, Debug)]
pub enum LockError {
    /// Another run holds the lock
    #[error("Another packmule run is in progress (lock held at '{path}')")]
    Busy { path: PathBuf },

    /// IO error while creating or locking the lock file
    #[error("Failed to acquire lock at '{path}': {error}")]
    IoError { path: PathBuf, error: String },
}

/// Top-level packmule error type
#[derive(Error, Debug)]
pub enum PackmuleError {
    /// Manifest not found
    #[error("Manifest not found at '{path}'. Run 'packmule init' to create a project.")]
    ManifestNotFound { path: PathBuf },

    /// Manifest parse error
    #[error("Failed to parse manifest: {source}")]
    ManifestParse { source: toml::de::Error },

    /// Init error
    #[error("Init error: {0}")]
    Init(#[from] InitError),

    /// Download error
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// Archive error
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Tool error
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Provision error
    #[error("Provision error: {0}")]
    Provision(#[from] ProvisionError),

    /// Bundle error
    #[error("Bundle error: {0}")]
    Bundle(#[from] BundleError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(#[from] LockError),

    /// IO error
    #[error("IO error: {source}")]
    Io { source: std::io::Error },
}
