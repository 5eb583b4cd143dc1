//! Application directory paths for findfood.
//!
//! Uses the [`dirs`] crate for platform-appropriate resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Config | `~/Library/Application Support/findfood/` | `~/.config/findfood/` |
//!
//! `FINDFOOD_CONFIG_DIR` overrides [`config_dir`] for tests and custom
//! deployments.

use std::path::PathBuf;

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/findfood/` by default. Override with
/// the `FINDFOOD_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("FINDFOOD_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("findfood"))
        .unwrap_or_else(|| PathBuf::from("/tmp/findfood-config"))
}

/// Path to `config.toml`.
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_is_inside_config_dir() {
        let file = config_file();
        assert!(file.ends_with("config.toml"));
        assert_eq!(file.parent(), Some(config_dir().as_path()));
    }

    #[test]
    fn config_dir_names_the_app() {
        if std::env::var_os("FINDFOOD_CONFIG_DIR").is_none() {
            assert!(config_dir().to_string_lossy().contains("findfood"));
        }
    }
}
