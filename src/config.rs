//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server listens on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Base URL of the price history site
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Total timeout for one outbound request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Static page served at `/`
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Template the `/resolve` fragment is rendered into
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,

    /// Output format for one-shot CLI commands
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_base_url() -> String {
    "https://pricehistory.app".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_index_path() -> PathBuf {
    PathBuf::from("static/index.html")
}

fn default_template_path() -> PathBuf {
    PathBuf::from("static/webpage.html")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            base_url: default_base_url(),
            proxy: None,
            timeout_secs: default_timeout_secs(),
            index_path: default_index_path(),
            template_path: default_template_path(),
            format: OutputFormat::Json,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("pricehistory-proxy").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(bind) = std::env::var("PH_BIND") {
            self.bind = bind;
        }

        if let Ok(base_url) = std::env::var("PH_BASE_URL") {
            self.base_url = base_url;
        }

        if let Ok(proxy) = std::env::var("PH_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(timeout) = std::env::var("PH_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }

        self
    }
}

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}. Use: json, table, markdown", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}
