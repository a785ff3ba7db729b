use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;
use utoipa::ToSchema;

/// Upper bound on `bodyText`, in characters.
pub const BODY_TEXT_MAX_CHARS: usize = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HeaderLevel {
    H1,
    H2,
    H3,
}

impl HeaderLevel {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "h1" => Some(Self::H1),
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Header {
    #[serde(alias = "type")]
    pub level: HeaderLevel,
    pub text: String,
}

/// SEO-relevant signals extracted from one fetched document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageSignals {
    /// Final URL after redirects.
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub headers: Vec<Header>,
    /// Lower-cased, single-spaced, at most [`BODY_TEXT_MAX_CHARS`] characters.
    pub body_text: String,
    #[schema(value_type = Vec<Object>)]
    pub structured_data: Vec<Value>,
}

/// Signals plus the same-site "about" links found on the page.
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    pub signals: PageSignals,
    pub about_links: Vec<Url>,
}

/// Collapses every whitespace run to one space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lower-cases, collapses whitespace and truncates to [`BODY_TEXT_MAX_CHARS`]
/// on a character boundary.
pub fn normalize_body_text(raw: &str) -> String {
    let collapsed = collapse_whitespace(&raw.to_lowercase());
    truncate_chars(&collapsed, BODY_TEXT_MAX_CHARS)
        .trim_end()
        .to_string()
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
