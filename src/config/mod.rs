//! Configuration management for fca-themes
//!
//! Supports configuration via:
//! 1. Config file (~/.config/fca-themes/config.toml)
//! 2. Environment variables (FCA_USER_ID, FCA_FB_DTSG, etc.)
//! 3. CLI arguments (override file/env settings)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cookie dump of a logged-in browser session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_state_path: Option<PathBuf>,

    /// Session identifiers and security tokens
    pub session: SessionSettings,

    /// GraphQL endpoint and mutation identifiers
    pub graphql: GraphqlSettings,

    /// HTTP transport settings
    pub dispatch: DispatchSettings,
}

/// Session identifiers, tokens and revision flags.
///
/// Everything is optional here; the request context supplies defaults for
/// the revision flags. The literal defaults track a snapshot of the web
/// client and will drift, which is why they can be overridden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Acting-as user (page or secondary profile)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i_user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fb_dtsg: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub jazoest: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lsd: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hs: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsi: Option<String>,

    #[serde(rename = "dyn", skip_serializing_if = "Option::is_none")]
    pub dyn_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub csr: Option<String>,
}

/// GraphQL endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphqlSettings {
    /// GraphQL endpoint URL
    pub url: String,

    /// Persisted query id of the AI theme mutation
    pub ai_theme_doc_id: String,

    /// Relay friendly name of the AI theme mutation
    pub ai_theme_friendly_name: String,

    /// Comma separated QPL flow ids reported with the mutation
    pub qpl_active_flow_ids: String,
}

impl Default for GraphqlSettings {
    fn default() -> Self {
        Self {
            url: "https://web.facebook.com/api/graphql/".to_string(),
            ai_theme_doc_id: "23873748445608673".to_string(),
            ai_theme_friendly_name: "useGenerateAIThemeMutation".to_string(),
            qpl_active_flow_ids: "25308101,25309433,521482085".to_string(),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    pub user_agent: String,
    pub origin: String,
    pub referer: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            origin: "https://web.facebook.com".to_string(),
            referer: "https://web.facebook.com/".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Config {
    /// Get default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fca-themes")
            .join("config.toml")
    }

    /// Load config from default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path())
    }

    /// Load config from specific path
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default().with_env_overrides());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;

        Ok(config.with_env_overrides())
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        let session = &mut self.session;
        for (var, slot) in [
            ("FCA_USER_ID", &mut session.user_id),
            ("FCA_I_USER_ID", &mut session.i_user_id),
            ("FCA_FB_DTSG", &mut session.fb_dtsg),
            ("FCA_JAZOEST", &mut session.jazoest),
            ("FCA_LSD", &mut session.lsd),
        ] {
            if let Ok(value) = std::env::var(var) {
                *slot = Some(value);
            }
        }

        if let Ok(path) = std::env::var("FCA_APP_STATE") {
            self.app_state_path = Some(PathBuf::from(path));
        }
        if let Ok(url) = std::env::var("FCA_GRAPHQL_URL") {
            self.graphql.url = url;
        }

        self
    }

    /// Save config to default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path())
    }

    /// Save config to specific path
    pub fn save_to(&self, path: PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.fb_dtsg.is_none() {
            return Err(ConfigError::MissingRequired(
                "session.fb_dtsg (or FCA_FB_DTSG)".to_string(),
            ));
        }

        if self.session.user_id.is_none() && self.app_state_path.is_none() {
            return Err(ConfigError::MissingRequired(
                "session.user_id or app_state_path (FCA_USER_ID / FCA_APP_STATE)".to_string(),
            ));
        }

        if let Some(path) = &self.app_state_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.clone()));
            }
        }

        Ok(())
    }

    /// Generate example config content
    pub fn example() -> String {
        let example = Config::default();
        toml::to_string_pretty(&example).unwrap_or_default()
    }
}

/// Builder for creating Config programmatically
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn app_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.app_state_path = Some(path.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.config.session.user_id = Some(user_id.into());
        self
    }

    pub fn fb_dtsg(mut self, token: impl Into<String>) -> Self {
        self.config.session.fb_dtsg = Some(token.into());
        self
    }

    pub fn lsd(mut self, token: impl Into<String>) -> Self {
        self.config.session.lsd = Some(token.into());
        self
    }

    pub fn graphql_url(mut self, url: impl Into<String>) -> Self {
        self.config.graphql.url = url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.dispatch.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
