//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod bundle;
pub mod clean;
pub mod doctor;
pub mod init;
pub mod provision;

use anyhow::Result;
use clap::Subcommand;

use crate::core::bundle::BundleOptions;
use crate::core::provision::ProvisionOptions;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize packmule in the current project
    Init {
        /// Overwrite an existing packmule.toml
        #[arg(short, long)]
        force: bool,
    },

    /// Download and stage the pinned media tool release
    Provision {
        /// Override the release URL template
        #[arg(long)]
        url: Option<String>,

        /// Pin a different release version for this run
        #[arg(long, value_name = "VERSION")]
        pin: Option<String>,

        /// Destination directory for the staged binaries
        #[arg(long)]
        dest: Option<String>,

        /// Keep the staging directory after a failed run
        #[arg(long)]
        keep_temp: bool,
    },

    /// Bundle the application into a single-file executable
    Bundle {
        /// Entry script handed to PyInstaller
        #[arg(short, long)]
        entry: Option<String>,

        /// Artifact name
        #[arg(short, long)]
        name: Option<String>,

        /// Abort the build after this many seconds
        #[arg(long, value_name = "SECONDS")]
        timeout: Option<u64>,

        /// Fail instead of installing PyInstaller when it is missing
        #[arg(long)]
        no_install: bool,
    },

    /// Remove build output
    Clean,

    /// Check host toolchain and project setup
    Doctor,
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        match self {
            Self::Init { force } => {
                let current_dir = std::env::current_dir()?;
                init::execute(&current_dir, force).await
            }
            Self::Provision {
                url,
                pin,
                dest,
                keep_temp,
            } => {
                let current_dir = std::env::current_dir()?;
                let options = ProvisionOptions {
                    url,
                    version: pin,
                    dest,
                    keep_temp,
                };
                provision::execute(&current_dir, options).await
            }
            Self::Bundle {
                entry,
                name,
                timeout,
                no_install,
            } => {
                let current_dir = std::env::current_dir()?;
                let options = BundleOptions {
                    entry,
                    name,
                    timeout,
                    no_install,
                };
                bundle::execute(&current_dir, options).await
            }
            Self::Clean => {
                let current_dir = std::env::current_dir()?;
                clean::execute(&current_dir).await
            }
            Self::Doctor => {
                let current_dir = std::env::current_dir().ok();
                doctor::execute(current_dir.as_deref()).await
            }
        }
    }
}
