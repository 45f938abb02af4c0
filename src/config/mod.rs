//! Configuration and constants
//!
//! Built-in defaults live here; the project manifest (packmule.toml) and
//! CLI flags override them.

pub mod defaults;
pub mod urls;
