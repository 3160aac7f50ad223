//! User configuration and XDG paths.
//!
//! Settings live in `$XDG_CONFIG_HOME/biaslens/config.toml`:
//!
//! ```toml
//! theme = "catppuccin-mocha"
//! model = "claude-sonnet-4-5-20250929"
//! api_base_url = "https://api.anthropic.com"
//! ```
//!
//! Every key is optional. The API key is never read from or written to this
//! file: it comes from `ANTHROPIC_API_KEY` or the setup form and stays in memory.

use std::path::{Path, PathBuf};

use biaslens_core::provider::{ApiKey, ClientConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use serde::Deserialize;
use tracing::{info, warn};

/// Environment variable checked for an API key at startup.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Values read from `config.toml`, with defaults for anything missing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Theme name, see [`crate::theme::Theme::from_name`].
    pub theme: String,
    pub model: String,
    pub api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl Settings {
    /// Builds the provider client configuration for `api_key`.
    pub fn client_config(&self, api_key: ApiKey) -> ClientConfig {
        ClientConfig {
            model: self.model.clone(),
            base_url: self.api_base_url.clone(),
            ..ClientConfig::new(api_key)
        }
    }
}

/// Resolves an XDG base directory.
///
/// Prefers `$<var>`; falls back to `~/<home_suffix>` when the env var is
/// absent, and to a relative `<home_suffix>` when `HOME` is unset as well.
fn xdg_dir(var: &str, home_suffix: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(home_suffix))
        })
        .unwrap_or_else(|| PathBuf::from(home_suffix))
}

/// Returns the path to the biaslens config file.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
        .join("biaslens")
        .join("config.toml")
}

/// Returns the directory holding the log file.
pub fn state_dir() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state").join("biaslens")
}

/// Parses the contents of a config file.
pub fn parse_settings(raw: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(raw)
}

/// Loads settings from `path`.
///
/// A missing file yields the defaults. An unreadable or malformed file is a
/// soft failure: it is logged and the defaults are used.
pub fn load_settings(path: &Path) -> Settings {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no config file, using defaults");
            return Settings::default();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read config, using defaults");
            return Settings::default();
        }
    };

    match parse_settings(&raw) {
        Ok(settings) => {
            info!(path = %path.display(), theme = %settings.theme, model = %settings.model, "config loaded");
            settings
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config parse error, using defaults");
            Settings::default()
        }
    }
}

/// Reads the API key from [`API_KEY_ENV`]. Blank values count as absent.
pub fn api_key_from_env() -> Option<ApiKey> {
    std::env::var(API_KEY_ENV).ok().and_then(|raw| ApiKey::new(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_settings(&dir.path().join("config.toml")), Settings::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "theme = \"dark\"").unwrap();

        let settings = load_settings(file.path());
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.api_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn malformed_file_is_a_soft_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "theme = [unterminated").unwrap();
        assert_eq!(load_settings(file.path()), Settings::default());
    }

    #[test]
    fn client_config_carries_model_and_base_url() {
        let settings = parse_settings(
            "model = \"claude-test\"\napi_base_url = \"http://localhost:8080/\"",
        )
        .unwrap();
        let config = settings.client_config(ApiKey::new("sk-test").unwrap());
        assert_eq!(config.model, "claude-test");
        assert_eq!(config.base_url, "http://localhost:8080/");
        assert_eq!(config.api_key.expose(), "sk-test");
    }
}
