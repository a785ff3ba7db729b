//! Niche detection, topical-relevance scoring and keyword extraction.
//!
//! Each call returns the backend's error untouched. Fallback values are
//! chosen by the pipeline, which records a [`Degradation`] for them.
//!
//! [`Degradation`]: crate::analysis::model::Degradation

use tracing::{debug, instrument};

use crate::analysis::model::TopicalRelevance;
use crate::extractor::PageSignals;
use crate::llm::schema::{RelevanceReply, parse_reply};
use crate::llm::{LlmBackend, LlmError};
use crate::prompts::{self, KEYWORDS_MAX_TOKENS, NICHE_MAX_TOKENS, RELEVANCE_MAX_TOKENS};

pub const KEYWORD_COUNT: usize = 5;

#[instrument(skip_all, fields(url = %signals.url))]
pub async fn detect_niche(llm: &dyn LlmBackend, signals: &PageSignals) -> Result<String, LlmError> {
    let prompt = prompts::niche_prompt(signals);
    let raw = llm
        .complete(&prompt.system, &prompt.user, NICHE_MAX_TOKENS, false)
        .await?;

    let niche = clean_niche(&raw);
    if niche.is_empty() {
        return Err(LlmError::InvalidResponse("empty niche".to_string()));
    }
    debug!(niche = %niche, "Detected niche");
    Ok(niche)
}

/// Drops quoting and trailing punctuation the model tends to add.
fn clean_niche(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim_end_matches('.')
        .trim()
        .to_string()
}

#[instrument(skip_all, fields(url = %signals.url, niche = %niche))]
pub async fn score_topical_relevance(
    llm: &dyn LlmBackend,
    signals: &PageSignals,
    niche: &str,
) -> Result<TopicalRelevance, LlmError> {
    let prompt = prompts::relevance_prompt(signals, niche);
    let raw = llm
        .complete(&prompt.system, &prompt.user, RELEVANCE_MAX_TOKENS, true)
        .await?;
    let reply: RelevanceReply = parse_reply(&raw)?;

    Ok(TopicalRelevance {
        niche: niche.to_string(),
        score: reply.score.round() as u8,
        feedback: reply.feedback.trim().to_string(),
    })
}

#[instrument(skip_all, fields(url = %signals.url))]
pub async fn extract_keywords(
    llm: &dyn LlmBackend,
    signals: &PageSignals,
) -> Result<Vec<String>, LlmError> {
    let prompt = prompts::keywords_prompt(signals);
    let raw = llm
        .complete(&prompt.system, &prompt.user, KEYWORDS_MAX_TOKENS, false)
        .await?;
    Ok(parse_keywords(&raw))
}

/// Splits a comma-separated reply into at most [`KEYWORD_COUNT`] lowercase
/// keywords, skipping blanks and repeats.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::with_capacity(KEYWORD_COUNT);
    for part in raw.split(',') {
        let keyword = part
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '.')
            .trim()
            .to_lowercase();
        if keyword.is_empty() || keywords.contains(&keyword) {
            continue;
        }
        keywords.push(keyword);
        if keywords.len() == KEYWORD_COUNT {
            break;
        }
    }
    keywords
}
