//! Application configuration management
//!
//! Configuration is loaded at startup from an optional TOML file and
//! overlaid with environment-provided credentials. Upstream API keys
//! stay optional: the server must start without them and report a
//! configuration error per request, since secrets are provisioned
//! independently of code deployment.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default Gemini API base URL
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini generation model
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Default Groq API base URL
const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default Groq chat model
const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// Default sampling temperature for chat completions
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default completion token cap
const DEFAULT_MAX_TOKENS: u32 = 256;

/// Default upstream request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 90;

/// Default server port
const DEFAULT_PORT: u16 = 8787;

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_groq_base_url")]
    pub base_url: String,
    #[serde(default = "default_groq_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_groq_base_url(),
            model: default_groq_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_groq_base_url() -> String {
    DEFAULT_GROQ_BASE_URL.to_string()
}

fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub groq: GroqConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub request: RequestConfig,
}

/// Runtime application configuration
///
/// Flattened from the TOML tables. Credentials are `Option` so an
/// unprovisioned deployment starts and fails gracefully per call.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key (absent until provisioned)
    pub gemini_api_key: Option<String>,

    /// Gemini API base URL
    pub gemini_base_url: String,

    /// Gemini generation model
    pub gemini_model: String,

    /// Groq API key (absent until provisioned)
    pub groq_api_key: Option<String>,

    /// Groq API base URL
    pub groq_base_url: String,

    /// Groq chat model
    pub groq_model: String,

    /// Sampling temperature sent to Groq (fixed server-side policy)
    pub groq_temperature: f64,

    /// Completion token cap sent to Groq (fixed server-side policy)
    pub groq_max_tokens: u32,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Logging level
    pub log_level: String,

    /// Upstream request timeout in seconds
    pub request_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}

impl Config {
    fn from_toml(config: TomlConfig) -> Self {
        Config {
            gemini_api_key: config.gemini.api_key,
            gemini_base_url: config.gemini.base_url,
            gemini_model: config.gemini.model,
            groq_api_key: config.groq.api_key,
            groq_base_url: config.groq.base_url,
            groq_model: config.groq.model,
            groq_temperature: config.groq.temperature,
            groq_max_tokens: config.groq.max_tokens,
            host: config.server.host,
            port: config.server.port,
            log_level: config.server.log_level,
            request_timeout: config.request.request_timeout,
        }
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;

        let config: TomlConfig =
            toml::from_str(&content).context("Failed to parse TOML configuration")?;

        Ok(Self::from_toml(config))
    }

    /// Load configuration from the environment and config file
    ///
    /// Looks for the file named by `CONFIG_PATH` (default
    /// `config.toml`); a missing file falls back to built-in defaults
    /// while a malformed one is an error. `GEMINI_API_KEY` and
    /// `GROQ_API_KEY` environment variables supply or override the
    /// credentials.
    pub fn from_env() -> Result<Self> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var("GEMINI_API_KEY")
            && !key.is_empty()
        {
            config.gemini_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GROQ_API_KEY")
            && !key.is_empty()
        {
            config.groq_api_key = Some(key);
        }

        Ok(config)
    }

    /// Whether a usable Gemini credential is present
    pub fn gemini_configured(&self) -> bool {
        self.gemini_api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    /// Whether a usable Groq credential is present
    pub fn groq_configured(&self) -> bool {
        self.groq_api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}
