//! Runtime configuration.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! yields a working explorer pointed at the public PokeAPI.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{PokedexError, Result};

/// Default first page of the location listing.
pub const DEFAULT_FIRST_PAGE_URL: &str = "https://pokeapi.co/api/v2/location/";

/// Default interactive prompt.
pub const DEFAULT_PROMPT: &str = "pokedex > ";

/// Explorer configuration (`pokedex.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PokedexConfig {
    /// URL fetched by the first `map`.
    #[serde(default = "default_first_page_url")]
    pub first_page_url: String,
    /// Prompt printed before each input line.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// TCP connect timeout, in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Socket read timeout, in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_first_page_url() -> String {
    DEFAULT_FIRST_PAGE_URL.to_string()
}
fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_read_timeout() -> u64 {
    15
}
fn default_user_agent() -> String {
    concat!("pokedex/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for PokedexConfig {
    fn default() -> Self {
        Self {
            first_page_url: default_first_page_url(),
            prompt: default_prompt(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl PokedexConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PokedexError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the explorer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.first_page_url.starts_with("http://")
            || self.first_page_url.starts_with("https://"))
        {
            return Err(PokedexError::Config(format!(
                "first_page_url must be an http(s) URL: {}",
                self.first_page_url
            )));
        }
        if self.connect_timeout_secs == 0 {
            return Err(PokedexError::Config(
                "connect_timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.read_timeout_secs == 0 {
            return Err(PokedexError::Config(
                "read_timeout_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_pokeapi() {
        let config = PokedexConfig::default();
        assert_eq!(config.first_page_url, "https://pokeapi.co/api/v2/location/");
        assert_eq!(config.prompt, "pokedex > ");
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.read_timeout(), Duration::from_secs(15));
        assert!(config.user_agent.starts_with("pokedex/"));
    }

    #[test]
    fn empty_document_equals_default() {
        let config = PokedexConfig::from_toml_str("").unwrap();
        assert_eq!(config, PokedexConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let toml = r#"
first_page_url = "http://localhost:8080/api/v2/location-area/"
read_timeout_secs = 3
"#;
        let config = PokedexConfig::from_toml_str(toml).unwrap();
        assert_eq!(
            config.first_page_url,
            "http://localhost:8080/api/v2/location-area/"
        );
        assert_eq!(config.read_timeout_secs, 3);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.prompt, "pokedex > ");
    }

    #[test]
    fn rejects_non_http_url() {
        let err = PokedexConfig::from_toml_str(r#"first_page_url = "ftp://pokeapi.co/""#)
            .unwrap_err();
        assert!(matches!(err, PokedexError::Config(_)));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = PokedexConfig::from_toml_str("connect_timeout_secs = 0").unwrap_err();
        assert!(err.to_string().contains("connect_timeout_secs"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = PokedexConfig::from_toml_str("cache = true").unwrap_err();
        assert!(matches!(err, PokedexError::TomlParse(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pokedex.toml");
        std::fs::write(&path, "prompt = \"> \"\n").unwrap();
        let config = PokedexConfig::load(&path).unwrap();
        assert_eq!(config.prompt, "> ");
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PokedexConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, PokedexError::Config(_)));
    }
}
