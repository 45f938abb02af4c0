//! Core business logic module
//!
//! This module contains all business logic for packmule.
//! I/O primitives live in [`crate::infra`]; the modules here decide
//! what to do with them.
//!
//! # Submodules
//!
//! - [`manifest`] - Manifest (packmule.toml) parsing and validation
//! - [`init`] - Project initialization logic
//! - [`provision`] - Media tool provisioning logic
//! - [`bundle`] - Application bundling logic
//! - [`clean`] - Clean build output logic
//! - [`doctor`] - Host toolchain and project checks

pub mod bundle;
pub mod clean;
pub mod doctor;
pub mod init;
pub mod manifest;
pub mod provision;
