//! `AppConfig` struct, TOML loading, and config/key resolution.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use url::Url;

/// Environment variable consulted when the config file has no access key.
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

/// File name looked up inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// OMDb client settings.
    #[serde(default)]
    pub omdb: OmdbConfig,
}

/// `[omdb]` table. Every key is optional.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct OmdbConfig {
    /// Access key.
    pub apikey: Option<String>,
    /// Query endpoint override.
    pub base_url: Option<Url>,
    /// Poster image endpoint override.
    pub img_url: Option<Url>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl OmdbConfig {
    /// Returns the configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

/// Picks the access key: config file first, then `OMDB_API_KEY`.
///
/// # Errors
///
/// Returns an error if neither source provides a non-empty key.
pub fn resolve_apikey(from_config: Option<&str>, from_env: Option<String>) -> Result<String> {
    if let Some(key) = from_config.filter(|k| !k.is_empty()) {
        return Ok(String::from(key));
    }
    match from_env.filter(|k| !k.is_empty()) {
        Some(key) => Ok(key),
        None => bail!(
            "no access key: set `apikey` under [omdb] in config.toml or the {API_KEY_ENV} environment variable"
        ),
    }
}

/// Resolves the config file path.
///
/// `dir` wins when given. Otherwise `$XDG_CONFIG_HOME/omdb/config.toml`,
/// then `$HOME/.config/omdb/config.toml`.
///
/// # Errors
///
/// Returns an error if `dir` is `None` and neither variable yields a base
/// directory.
pub fn resolve_config_path(dir: Option<&Path>) -> Result<PathBuf> {
    config_path_from(
        dir,
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

fn config_path_from(
    dir: Option<&Path>,
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }

    // A relative XDG_CONFIG_HOME is invalid and must be ignored.
    let base = match xdg_config_home.map(PathBuf::from).filter(|p| p.is_absolute()) {
        Some(xdg) => xdg,
        None => home
            .filter(|h| !h.is_empty())
            .map(|h| PathBuf::from(h).join(".config"))
            .context("neither XDG_CONFIG_HOME nor HOME is set")?,
    };
    Ok(base.join("omdb").join(CONFIG_FILE))
}
