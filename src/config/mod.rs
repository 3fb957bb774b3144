//! Configuration module
//!
//! Handles loading and validating settings from TOML files and environment variables.

pub mod loader;
pub mod types;

pub use loader::{load_settings, load_settings_from_str, validate_settings};
pub use types::*;
