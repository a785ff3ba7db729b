use thiserror::Error;

use crate::fetcher::FetchError;
use crate::llm::LlmError;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("extraction failed: {0}")]
    Extraction(#[from] FetchError),

    #[error("evaluation failed: {0}")]
    Evaluation(#[from] LlmError),

    #[error("analysis cancelled")]
    Cancelled,
}

impl AnalysisError {
    /// Stable machine-readable tag, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::Extraction(_) => "extraction",
            Self::Evaluation(_) => "evaluation",
            Self::Cancelled => "cancelled",
        }
    }
}
