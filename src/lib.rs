//! Packmule - Media tool provisioner and Python app bundler
//!
//! This library provides the core functionality for staging a version-pinned
//! media tool release into a project and packaging the project's Python
//! application into a single-file executable.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Business logic and orchestration
//! - [`infra`] - Infrastructure layer (network, filesystem, processes)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
