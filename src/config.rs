use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::serializer::DEFAULT_MARKER;

/// Top level configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PestoConfig {
    /// How documents are rendered
    #[serde(default)]
    pub output: OutputConfig,
    /// How recipe pages are fetched
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Rendering options
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// First line of every document
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Joins the names of multiple authors
    #[serde(default = "default_author_separator")]
    pub author_separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            author_separator: default_author_separator(),
        }
    }
}

/// HTTP options for recipe acquisition
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

// Default value functions
fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_author_separator() -> String {
    " and ".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; Recipe2PestoBot/1.0)".to_string()
}

impl PestoConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE2PESTO__ prefix
    /// 2. recipe2pesto.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE2PESTO__FETCH__TIMEOUT
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables, see [`PestoConfig::load`]
pub fn load_config() -> Result<PestoConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe2pesto").required(false))
        // Use double underscore for nested: RECIPE2PESTO__OUTPUT__MARKER
        .add_source(
            Environment::with_prefix("RECIPE2PESTO")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
