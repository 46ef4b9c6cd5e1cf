use crate::error::{FluffError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_PASSTHROUGH_PROXY: &str = "https://corsproxy.io/?";
pub const DEFAULT_WRAPPING_PROXY: &str = "https://api.allorigins.win/get?url=";
pub const DEFAULT_MAX_SOURCE_CHARS: usize = 50_000;

/// Keys accepted by [`AppConfig::get`] and [`AppConfig::set`].
pub const CONFIG_KEYS: &[&str] = &[
    "model",
    "endpoint",
    "passthrough-proxy",
    "wrapping-proxy",
    "max-source-chars",
    "clean-html",
    "request-timeout-secs",
];

/// Configuration for fluffcook, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Generation model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generation service API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Prefix for the passthrough proxy; the encoded target URL is appended
    #[serde(default = "default_passthrough_proxy")]
    pub passthrough_proxy: String,

    /// Prefix for the JSON-wrapping proxy; the encoded target URL is appended
    #[serde(default = "default_wrapping_proxy")]
    pub wrapping_proxy: String,

    /// Upper bound on the source text embedded in a prompt, in characters
    #[serde(default = "default_max_source_chars")]
    pub max_source_chars: usize,

    /// Strip noise elements from scraped HTML before prompting.
    /// When false, raw HTML is truncated and sent as-is.
    #[serde(default = "default_clean_html")]
    pub clean_html: bool,

    /// Optional timeout for every outgoing request. None waits forever.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_passthrough_proxy() -> String {
    DEFAULT_PASSTHROUGH_PROXY.to_string()
}

fn default_wrapping_proxy() -> String {
    DEFAULT_WRAPPING_PROXY.to_string()
}

fn default_max_source_chars() -> usize {
    DEFAULT_MAX_SOURCE_CHARS
}

fn default_clean_html() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            passthrough_proxy: default_passthrough_proxy(),
            wrapping_proxy: default_wrapping_proxy(),
            max_source_chars: default_max_source_chars(),
            clean_html: default_clean_html(),
            request_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(FluffError::Io)?;
        let config: AppConfig =
            serde_json::from_str(&content).map_err(FluffError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(FluffError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(FluffError::Serialization)?;
        fs::write(config_path, content).map_err(FluffError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "model" => Some(self.model.clone()),
            "endpoint" => Some(self.endpoint.clone()),
            "passthrough-proxy" => Some(self.passthrough_proxy.clone()),
            "wrapping-proxy" => Some(self.wrapping_proxy.clone()),
            "max-source-chars" => Some(self.max_source_chars.to_string()),
            "clean-html" => Some(self.clean_html.to_string()),
            "request-timeout-secs" => Some(
                self.request_timeout_secs
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "none".to_string()),
            ),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        match key {
            "model" => self.model = non_empty(key, value)?,
            "endpoint" => self.endpoint = non_empty(key, value)?,
            "passthrough-proxy" => self.passthrough_proxy = non_empty(key, value)?,
            "wrapping-proxy" => self.wrapping_proxy = non_empty(key, value)?,
            "max-source-chars" => {
                self.max_source_chars = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| format!("{} must be a positive integer", key))?
            }
            "clean-html" => {
                self.clean_html = match value {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => return Err(format!("{} must be true or false", key)),
                }
            }
            "request-timeout-secs" => {
                self.request_timeout_secs = match value {
                    "" | "none" | "0" => None,
                    v => Some(
                        v.parse::<u64>()
                            .map_err(|_| format!("{} must be a number of seconds", key))?,
                    ),
                }
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

fn non_empty(key: &str, value: &str) -> std::result::Result<String, String> {
    if value.is_empty() {
        Err(format!("{} cannot be empty", key))
    } else {
        Ok(value.to_string())
    }
}
