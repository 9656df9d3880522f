//! Classifier configuration.
//!
//! Built once at startup and handed by reference to the model client.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_VAR: &str = "FT_MODEL";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const API_STYLE_VAR: &str = "CLINICAL_CALC_API_STYLE";
pub const TIMEOUT_VAR: &str = "CLINICAL_CALC_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration errors. All are fatal at startup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which provider endpoint shape to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiStyle {
    /// `/chat/completions` with system + user messages
    #[default]
    Chat,
    /// `/completions` with one concatenated prompt
    Legacy,
}

impl FromStr for ApiStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chat" => Ok(ApiStyle::Chat),
            "legacy" | "completion" | "completions" => Ok(ApiStyle::Legacy),
            _ => Err(ConfigError::Invalid {
                key: API_STYLE_VAR,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ApiStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiStyle::Chat => f.write_str("chat"),
            ApiStyle::Legacy => f.write_str("legacy"),
        }
    }
}

/// Settings for the model collaborator.
#[derive(Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Provider API credential
    pub api_key: String,
    /// Fine-tuned model identifier
    pub model: String,
    /// API root, without trailing slash
    pub base_url: String,
    pub api_style: ApiStyle,
    /// None waits for the provider
    pub timeout: Option<Duration>,
}

impl ClassifierConfig {
    /// Create a config with the default endpoint and no timeout.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> ConfigResult<Self> {
        let api_key = api_key.into();
        let model = model.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::Missing(API_KEY_VAR));
        }
        if model.trim().is_empty() {
            return Err(ConfigError::Missing(MODEL_VAR));
        }
        Ok(Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_style: ApiStyle::default(),
            timeout: None,
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_style(mut self, style: ApiStyle) -> Self {
        self.api_style = style;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read settings from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::Missing(API_KEY_VAR))?;
        let model = get(MODEL_VAR).ok_or(ConfigError::Missing(MODEL_VAR))?;
        let mut config = Self::new(api_key, model)?;

        if let Some(url) = get(BASE_URL_VAR) {
            config = config.with_base_url(&url);
        }
        if let Some(style) = get(API_STYLE_VAR) {
            config = config.with_api_style(style.parse()?);
        }
        if let Some(secs) = get(TIMEOUT_VAR) {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::Invalid {
                key: TIMEOUT_VAR,
                value: secs.clone(),
            })?;
            config = config.with_timeout(Some(Duration::from_secs(secs)));
        }

        Ok(config)
    }
}

impl fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_style", &self.api_style)
            .field("timeout", &self.timeout)
            .finish()
    }
}
