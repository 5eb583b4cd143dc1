//! Application configuration: TOML file plus environment overrides.
//!
//! Every section has defaults, so an empty file (or no file) is a valid
//! configuration. Provider credentials can come from the file or from
//! `KAKAO_REST_API_KEY`, `NAVER_CLIENT_ID` and `NAVER_CLIENT_SECRET`; the
//! environment wins.

use std::path::{Path, PathBuf};

use place_search::{Backend, Credentials, FilterConfig, MapPageConfig, SearchConfig};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable holding the Kakao REST API key.
pub const ENV_KAKAO_REST_API_KEY: &str = "KAKAO_REST_API_KEY";
/// Environment variable holding the Naver client id.
pub const ENV_NAVER_CLIENT_ID: &str = "NAVER_CLIENT_ID";
/// Environment variable holding the Naver client secret.
pub const ENV_NAVER_CLIENT_SECRET: &str = "NAVER_CLIENT_SECRET";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend queried for places.
    pub backend: Backend,
    /// API host override for the Kakao or Naver backend, e.g. a proxy.
    pub api_base_url: Option<String>,
    /// Default region when none is given on the command line.
    pub region: Option<String>,
    /// Run the expansion keyword queries as well.
    pub deep_search: bool,
    /// Provider credentials.
    pub credentials: Credentials,
    /// Paging, pacing and HTTP settings.
    pub search: SearchConfig,
    /// Rule toggles and word lists.
    pub filters: FilterConfig,
    /// Map page scraper settings.
    pub map_page: MapPageConfig,
    /// Output settings.
    pub export: ExportConfig,
}

/// How results are presented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Include rating, review count and source query columns.
    pub extended_columns: bool,
    /// Print the result table to stdout.
    pub show_table: bool,
    /// Directory CSV files are written to when no explicit path is given.
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            extended_columns: true,
            show_table: true,
            output_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load the file at `path` if it exists, otherwise defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path, e.g. `~/.config/findfood/config.toml`.
    pub fn default_config_path() -> PathBuf {
        crate::app_dirs::config_file()
    }

    /// Apply credential overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply credential overrides from `lookup`. Blank values are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(key) = get(ENV_KAKAO_REST_API_KEY) {
            self.credentials.kakao_rest_api_key = Some(key);
        }
        if let Some(id) = get(ENV_NAVER_CLIENT_ID) {
            self.credentials.naver_client_id = Some(id);
        }
        if let Some(secret) = get(ENV_NAVER_CLIENT_SECRET) {
            self.credentials.naver_client_secret = Some(secret);
        }
    }

    /// Validate the search and filter sections.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.filters.validate()?;
        Ok(())
    }
}
