//! Application configuration module.
//!
//! Manages the TOML config file holding the access code, base URL
//! overrides and the preferred fetch strategy.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{ACCESS_CODE_ENV, AppConfig, mask_secret};
pub use paths::resolve_config_path;
