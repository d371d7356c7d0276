//! Application configuration for travelkb.
//!
//! User config lives at `~/.travelkb/travelkb.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TravelKbError};
use crate::types::default_vocabulary;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "travelkb.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".travelkb";

// ---------------------------------------------------------------------------
// Config structs (matching travelkb.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Upstream endpoints.
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// Crawl policies.
    #[serde(default)]
    pub crawl: CrawlPoliciesConfig,

    /// Activity vocabulary matched against guide-page text, in emission
    /// order. Defaults to the built-in 30-term list.
    #[serde(default = "default_vocabulary")]
    pub vocabulary: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: DefaultsConfig::default(),
            endpoints: EndpointsConfig::default(),
            crawl: CrawlPoliciesConfig::default(),
            vocabulary: default_vocabulary(),
        }
    }
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Origin city whose capital-to-capital distances are computed.
    #[serde(default = "default_origin_city")]
    pub origin_city: String,

    /// Output fact file path.
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Concurrent destination crawls.
    #[serde(default = "default_concurrency")]
    pub crawl_concurrency: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            origin_city: default_origin_city(),
            output_file: default_output_file(),
            crawl_concurrency: default_concurrency(),
        }
    }
}

fn default_origin_city() -> String {
    "Chicago".into()
}
fn default_output_file() -> String {
    "kb.pl".into()
}
fn default_concurrency() -> u32 {
    4
}

/// `[endpoints]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// SPARQL endpoint for the country list and origin lookup.
    #[serde(default = "default_sparql_endpoint")]
    pub sparql: String,

    /// Base URL of the travel-guide wiki; destination pages live at
    /// `<base>/en/<name>`.
    #[serde(default = "default_travel_guide_base")]
    pub travel_guide: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            sparql: default_sparql_endpoint(),
            travel_guide: default_travel_guide_base(),
        }
    }
}

fn default_sparql_endpoint() -> String {
    "https://dbpedia.org/sparql".into()
}
fn default_travel_guide_base() -> String {
    "https://wikitravel.org".into()
}

/// `[crawl]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlPoliciesConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum ms between requests to the guide host.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_ms: u64,
}

impl Default for CrawlPoliciesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            rate_limit_ms: default_rate_limit(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_rate_limit() -> u64 {
    200
}

// ---------------------------------------------------------------------------
// Crawl config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime crawl configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Maximum concurrent destination crawls.
    pub concurrency: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Rate limit in ms between requests to the guide host.
    pub rate_limit_ms: u64,
}

impl From<&AppConfig> for CrawlConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            concurrency: config.defaults.crawl_concurrency,
            timeout_secs: config.crawl.timeout_secs,
            rate_limit_ms: config.crawl.rate_limit_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.travelkb/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| TravelKbError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.travelkb/travelkb.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| TravelKbError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| TravelKbError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| TravelKbError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| TravelKbError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| TravelKbError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("origin_city"));
        assert!(toml_str.contains("wikitravel.org"));
        assert!(toml_str.contains("snorkel"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.origin_city, "Chicago");
        assert_eq!(parsed.defaults.output_file, "kb.pl");
        assert_eq!(parsed.vocabulary.len(), 30);
    }

    #[test]
    fn partial_config_gets_defaults() {
        let toml_str = r#"
[defaults]
origin_city = "Berlin"

[crawl]
rate_limit_ms = 50
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.origin_city, "Berlin");
        assert_eq!(config.defaults.output_file, "kb.pl");
        assert_eq!(config.crawl.rate_limit_ms, 50);
        assert_eq!(config.crawl.timeout_secs, 30);
        assert_eq!(config.vocabulary.len(), 30);
    }

    #[test]
    fn vocabulary_override_replaces_default() {
        let toml_str = r#"
vocabulary = ["beach", "diving"]
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.vocabulary, vec!["beach", "diving"]);
    }

    #[test]
    fn crawl_config_from_app_config() {
        let app = AppConfig::default();
        let crawl = CrawlConfig::from(&app);
        assert_eq!(crawl.concurrency, 4);
        assert_eq!(crawl.timeout_secs, 30);
        assert_eq!(crawl.rate_limit_ms, 200);
    }
}
