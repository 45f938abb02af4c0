//! Default configuration values

/// Maximum number of download retry attempts
pub const MAX_DOWNLOAD_RETRIES: u32 = 3;

/// Total request timeout for downloads (in seconds)
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// Connection timeout for downloads (in seconds)
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default release version of the processor toolset
pub const DEFAULT_RELEASE_VERSION: &str = "7.0.2";

/// Default name of the required processor binary
pub const DEFAULT_PRIMARY_BINARY: &str = "ffmpeg";

/// Default name of the optional inspector binary
pub const DEFAULT_SECONDARY_BINARY: &str = "ffprobe";

/// Default destination directory for provisioned binaries (project-relative)
pub const DEFAULT_DEST_DIR: &str = "ffmpeg";

/// Staging directory for downloads and extraction (project-relative)
pub const STAGING_DIR: &str = ".packmule";

/// Subdirectory of the staging area where archives are unpacked
pub const EXTRACT_SUBDIR: &str = "extract";

/// Lock file guarding against concurrent runs (project-relative)
pub const LOCK_FILE: &str = ".packmule.lock";

/// Default entry-point script for bundling
pub const DEFAULT_ENTRY: &str = "main.py";

/// Default timeout for the packaging subprocess (in seconds)
pub const DEFAULT_BUNDLE_TIMEOUT_SECS: u64 = 600;

/// Default Python interpreter used to reach pip and the packaging module
pub const DEFAULT_PYTHON: &str = if cfg!(windows) { "python" } else { "python3" };

/// Directory where the packaging tool places the final artifact
pub const DIST_DIR: &str = "dist";

/// Directory where the packaging tool places intermediate build files
pub const BUILD_DIR: &str = "build";

/// Minimum PyInstaller version known to support all flags we pass
pub const MIN_PYINSTALLER_VERSION: &str = "5.0.0";
