use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::analysis::{SiteAnalysis, VisibilityRanking};
use crate::extractor::model::normalize_body_text;
use crate::extractor::{Header, PageSignals};

const MAX_URL_LEN: usize = 2048;
const MAX_NICHE_LEN: usize = 200;

fn validate_url_field(url: &str) -> Result<(), String> {
    if url.trim().is_empty() {
        return Err("url is required".to_string());
    }
    if url.len() > MAX_URL_LEN {
        return Err(format!("url longer than {MAX_URL_LEN} characters"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScrapeRequest {
    pub url: String,
}

impl ScrapeRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_url_field(&self.url)
    }
}

/// Signals for a page scraped earlier, plus its niche.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub url: String,
    pub niche: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body_text: String,
}

impl EvaluateRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_url_field(&self.url)?;
        if self.niche.chars().count() > MAX_NICHE_LEN {
            return Err(format!("niche longer than {MAX_NICHE_LEN} characters"));
        }
        Ok(())
    }

    pub fn into_signals(self) -> PageSignals {
        PageSignals {
            url: self.url,
            title: self.title,
            meta_description: self.meta_description,
            headers: self.headers,
            body_text: normalize_body_text(&self.body_text),
            structured_data: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InsightsRequest {
    pub analysis: SiteAnalysis,
    pub ranking: VisibilityRanking,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    pub url: String,
}

impl AnalyzeRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_url_field(&self.url)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error class, e.g. `invalid_url` or `extraction`.
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_required() {
        let request = ScrapeRequest { url: "  ".to_string() };
        assert_eq!(request.validate().unwrap_err(), "url is required");
    }

    #[test]
    fn test_url_too_long() {
        let request = AnalyzeRequest {
            url: format!("https://acme.com/{}", "a".repeat(MAX_URL_LEN)),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_evaluate_request_defaults_and_normalizes() {
        let request: EvaluateRequest = serde_json::from_str(
            r#"{"url": "https://acme.com", "niche": "Fitness", "bodyText": "Big   RACKS", "headers": [{"type": "h1", "text": "Acme"}]}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());

        let signals = request.into_signals();
        assert_eq!(signals.body_text, "big racks");
        assert_eq!(signals.title, "");
        assert_eq!(signals.headers.len(), 1);
    }

    #[test]
    fn test_evaluate_request_niche_too_long() {
        let request = EvaluateRequest {
            url: "https://acme.com".to_string(),
            niche: "n".repeat(MAX_NICHE_LEN + 1),
            title: String::new(),
            meta_description: String::new(),
            headers: vec![],
            body_text: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
