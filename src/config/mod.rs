//! Configuration handling for the application.
//!
//! Everything is read from environment variables with development defaults.
//! A variable that is set but does not parse is a [`ConfigError`] rather
//! than a silent fallback.

use std::env;
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::net::SocketAddr;
use std::str::FromStr;

use url::Url;

use crate::analysis::AnalyzerOptions;
use crate::fetcher::FetchSettings;
use crate::llm::LlmSettings;
use crate::llm::openai::{DEFAULT_API_URL, DEFAULT_MODEL};

/// Environment variable names.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_LLM_API_URL: &str = "LLM_API_URL";
pub const ENV_LLM_MODEL: &str = "LLM_MODEL";
pub const ENV_LLM_TEMPERATURE: &str = "LLM_TEMPERATURE";
pub const ENV_LLM_TIMEOUT_SECS: &str = "LLM_TIMEOUT_SECS";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_FOLLOW_ABOUT_PAGES: &str = "FOLLOW_ABOUT_PAGES";
pub const ENV_MAX_ABOUT_PAGES: &str = "MAX_ABOUT_PAGES";
pub const ENV_RATE_LIMIT_MAX_REQUESTS: &str = "RATE_LIMIT_MAX_REQUESTS";
pub const ENV_RATE_LIMIT_WINDOW_SECS: &str = "RATE_LIMIT_WINDOW_SECS";

const DEFAULT_LLM_TEMPERATURE: f32 = 0.5;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_ABOUT_PAGES: usize = 3;
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 30;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: i64 = 60;

/// Application runtime configuration.
#[derive(Clone, PartialEq)]
pub struct Config {
    bind_addr: SocketAddr,
    llm_api_key: Option<String>,
    llm_api_url: String,
    llm_model: String,
    llm_temperature: f32,
    llm_timeout_secs: u64,
    fetch_timeout_secs: u64,
    follow_about_pages: bool,
    max_about_pages: usize,
    rate_limit_max_requests: u32,
    rate_limit_window_secs: i64,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let llm_api_url = string_var(ENV_LLM_API_URL, DEFAULT_API_URL);
        Url::parse(&llm_api_url).map_err(|e| ConfigError::InvalidValue {
            field: ENV_LLM_API_URL,
            reason: e.to_string(),
        })?;

        let llm_temperature = parse_var(ENV_LLM_TEMPERATURE, DEFAULT_LLM_TEMPERATURE)?;
        if !(0.0..=2.0).contains(&llm_temperature) {
            return Err(ConfigError::InvalidValue {
                field: ENV_LLM_TEMPERATURE,
                reason: "must be between 0 and 2".to_string(),
            });
        }

        Ok(Self {
            bind_addr: parse_var(ENV_BIND_ADDR, default_bind_addr())?,
            llm_api_key: env::var(ENV_OPENAI_API_KEY)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            llm_api_url,
            llm_model: string_var(ENV_LLM_MODEL, DEFAULT_MODEL),
            llm_temperature,
            llm_timeout_secs: positive(ENV_LLM_TIMEOUT_SECS, DEFAULT_LLM_TIMEOUT_SECS)?,
            fetch_timeout_secs: positive(ENV_FETCH_TIMEOUT_SECS, DEFAULT_FETCH_TIMEOUT_SECS)?,
            follow_about_pages: parse_var(ENV_FOLLOW_ABOUT_PAGES, false)?,
            max_about_pages: parse_var(ENV_MAX_ABOUT_PAGES, DEFAULT_MAX_ABOUT_PAGES)?,
            rate_limit_max_requests: positive(
                ENV_RATE_LIMIT_MAX_REQUESTS,
                DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            )?,
            rate_limit_window_secs: positive(
                ENV_RATE_LIMIT_WINDOW_SECS,
                DEFAULT_RATE_LIMIT_WINDOW_SECS,
            )?,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    pub fn has_llm_api_key(&self) -> bool {
        self.llm_api_key.is_some()
    }

    pub fn follow_about_pages(&self) -> bool {
        self.follow_about_pages
    }

    pub fn rate_limit_max_requests(&self) -> u32 {
        self.rate_limit_max_requests
    }

    pub fn rate_limit_window_secs(&self) -> i64 {
        self.rate_limit_window_secs
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout_secs: self.fetch_timeout_secs,
            ..FetchSettings::default()
        }
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            api_url: self.llm_api_url.clone(),
            api_key: self.llm_api_key.clone(),
            model: self.llm_model.clone(),
            temperature: self.llm_temperature,
            timeout_secs: self.llm_timeout_secs,
        }
    }

    pub fn analyzer_options(&self) -> AnalyzerOptions {
        AnalyzerOptions {
            follow_about_pages: self.follow_about_pages,
            max_about_pages: self.max_about_pages,
        }
    }

    pub fn with_rate_limit(mut self, max_requests: u32, window_secs: i64) -> Self {
        self.rate_limit_max_requests = max_requests;
        self.rate_limit_window_secs = window_secs;
        self
    }

    /// Overrides `FOLLOW_ABOUT_PAGES`, e.g. from a command-line flag.
    pub fn with_follow_about_pages(mut self, follow: bool) -> Self {
        self.follow_about_pages = follow;
        self
    }
}

impl Default for Config {
    /// Development defaults (mirrors `from_env` with no env overrides).
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            llm_api_key: None,
            llm_api_url: DEFAULT_API_URL.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            llm_temperature: DEFAULT_LLM_TEMPERATURE,
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            follow_about_pages: false,
            max_about_pages: DEFAULT_MAX_ABOUT_PAGES,
            rate_limit_max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            rate_limit_window_secs: DEFAULT_RATE_LIMIT_WINDOW_SECS,
        }
    }
}

// Hand-written so the API key never reaches the logs.
impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "<redacted>"))
            .field("llm_api_url", &self.llm_api_url)
            .field("llm_model", &self.llm_model)
            .field("llm_temperature", &self.llm_temperature)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("follow_about_pages", &self.follow_about_pages)
            .field("max_about_pages", &self.max_about_pages)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .finish()
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn string_var(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    field: name,
                    reason: format!("'{raw}': {e}"),
                })
        }
        _ => Ok(default),
    }
}

fn positive<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: Display,
{
    let value = parse_var(name, default)?;
    if value <= T::default() {
        return Err(ConfigError::InvalidValue {
            field: name,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
