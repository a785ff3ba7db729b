//! Keyword frequency over the normalised body text.

use crate::analysis::model::KeywordDensityEntry;

/// Density at or above this reads as keyword stuffing.
pub const STUFFING_THRESHOLD: f64 = 2.5;

/// Counts exact, case-insensitive occurrences of each keyword among the
/// whitespace-separated tokens of `body_text`.
///
/// Entries come back in keyword order. An empty body or keyword list yields
/// no entries.
pub fn compute_keyword_density(keywords: &[String], body_text: &str) -> Vec<KeywordDensityEntry> {
    let tokens: Vec<String> = body_text
        .split_whitespace()
        .map(|token| token.to_lowercase())
        .collect();
    if tokens.is_empty() || keywords.is_empty() {
        return Vec::new();
    }

    let total = tokens.len() as f64;
    keywords
        .iter()
        .map(|keyword| {
            let needle = keyword.to_lowercase();
            let count = tokens.iter().filter(|token| **token == needle).count();
            KeywordDensityEntry {
                keyword: keyword.clone(),
                count,
                density_as_percent: round2((count as f64 / total * 100.0).min(100.0)),
            }
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityBand {
    Stuffing,
    High,
    UpperGood,
    Optimal,
    LowerGood,
    Low,
    VeryLow,
}

impl DensityBand {
    pub fn classify(density: f64) -> Self {
        match density {
            d if d >= STUFFING_THRESHOLD => Self::Stuffing,
            d if d >= 2.0 => Self::High,
            d if d >= 1.75 => Self::UpperGood,
            d if d >= 1.25 => Self::Optimal,
            d if d >= 1.0 => Self::LowerGood,
            d if d >= 0.5 => Self::Low,
            _ => Self::VeryLow,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Stuffing => "Too high - may be seen as keyword stuffing",
            Self::High => "Getting high - consider reducing slightly",
            Self::UpperGood => "Good, but on the higher side",
            Self::Optimal => "Optimal keyword density",
            Self::LowerGood => "Good, but could be higher",
            Self::Low => "Low - consider increasing usage",
            Self::VeryLow => "Too low - increase keyword usage",
        }
    }
}
