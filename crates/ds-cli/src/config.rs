//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Environment variables read without the `DS_` prefix.
const RAW_ENV_KEYS: [&str; 3] = ["GITHUB_TOKEN", "LINEAR_API_KEY", "ANTHROPIC_API_KEY"];

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub personal access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    /// Linear personal API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear_api_key: Option<String>,

    /// Anthropic API key. Not needed with `--skip-llm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,

    /// Claude model used for the narrative.
    pub model: String,

    /// Directory summaries are written to.
    pub output_dir: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redacted(value: Option<&String>) -> &'static str {
            if value.is_some() { "[REDACTED]" } else { "None" }
        }

        f.debug_struct("Config")
            .field("github_token", &redacted(self.github_token.as_ref()))
            .field("linear_api_key", &redacted(self.linear_api_key.as_ref()))
            .field("anthropic_api_key", &redacted(self.anthropic_api_key.as_ref()))
            .field("model", &self.model)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            github_token: None,
            linear_api_key: None,
            anthropic_api_key: None,
            model: ds_llm::DEFAULT_MODEL.to_string(),
            output_dir: data_dir.join("output"),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Conventional unprefixed credentials, then DS_* overrides
        figment = figment
            .merge(Env::raw().only(&RAW_ENV_KEYS))
            .merge(Env::prefixed("DS_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for ds.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ds"))
}

/// Returns the platform-specific data directory for ds.
///
/// On Linux: `~/.local/share/ds`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("ds"))
}
