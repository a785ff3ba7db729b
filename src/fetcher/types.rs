use chrono::{DateTime, Utc};
use encoding_rs::Encoding;
use reqwest::StatusCode;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetSource {
    Bom,
    Header,
    Meta,
    Detected,
}

/// Encoding a body was decoded with, and how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    pub encoding: &'static Encoding,
    pub source: CharsetSource,
}

impl Charset {
    pub fn new(encoding: &'static Encoding, source: CharsetSource) -> Self {
        Self { encoding, source }
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }
}

/// A fetched HTML document, decoded to UTF-8.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub url_final: Url,
    pub status: StatusCode,
    pub body_utf8: String,
    pub charset: Charset,
    pub fetched_at: DateTime<Utc>,
}

/// Knobs for the page fetcher.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_redirects: usize,
    pub max_body_size: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            max_redirects: 10,
            max_body_size: 5 * 1024 * 1024,
            user_agent: "SeolensBot/0.1 (+https://seolens.example.com)".to_string(),
        }
    }
}
