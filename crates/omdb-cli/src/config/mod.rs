//! Application configuration module.
//!
//! Reads the TOML config file holding the access key, endpoint overrides
//! and request timeout.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::{API_KEY_ENV, AppConfig, resolve_apikey, resolve_config_path};
