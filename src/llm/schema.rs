//! Shapes the pipeline expects back from the model, with the checks applied
//! before a reply is trusted. A reply that fails to parse or validate is an
//! [`LlmError::InvalidResponse`].

use regex::Regex;
use serde::{Deserialize, de::DeserializeOwned};
use std::sync::LazyLock;

use crate::llm::LlmError;

static CODE_FENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").unwrap());

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Unwraps a reply the model wrapped in a Markdown code fence.
pub fn strip_code_fences(raw: &str) -> &str {
    match CODE_FENCE_REGEX.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => raw.trim(),
    }
}

pub fn parse_reply<T: DeserializeOwned + Validate>(raw: &str) -> Result<T, LlmError> {
    let reply: T = serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| LlmError::InvalidResponse(format!("malformed JSON reply: {e}")))?;
    reply.validate().map_err(LlmError::InvalidResponse)?;
    Ok(reply)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelevanceReply {
    pub score: f64,
    pub feedback: String,
}

impl Validate for RelevanceReply {
    fn validate(&self) -> Result<(), String> {
        if !self.score.is_finite() || !(0.0..=10.0).contains(&self.score) {
            return Err(format!("relevance score {} outside 0-10", self.score));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QuestionsReply {
    Wrapped { questions: Vec<String> },
    Bare(Vec<String>),
}

impl QuestionsReply {
    pub fn into_questions(self) -> Vec<String> {
        match self {
            Self::Wrapped { questions } | Self::Bare(questions) => questions,
        }
    }

    fn questions(&self) -> &[String] {
        match self {
            Self::Wrapped { questions } | Self::Bare(questions) => questions,
        }
    }
}

impl Validate for QuestionsReply {
    fn validate(&self) -> Result<(), String> {
        if self.questions().iter().any(|q| q.trim().is_empty()) {
            return Err("blank question in reply".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnswerEntry {
    pub question: String,
    #[serde(rename = "URLs", alias = "urls")]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnswersReply {
    Wrapped { answers: Vec<AnswerEntry> },
    Bare(Vec<AnswerEntry>),
}

impl AnswersReply {
    pub fn into_answers(self) -> Vec<AnswerEntry> {
        match self {
            Self::Wrapped { answers } | Self::Bare(answers) => answers,
        }
    }
}

impl AnswersReply {
    fn answers(&self) -> &[AnswerEntry] {
        match self {
            Self::Wrapped { answers } | Self::Bare(answers) => answers,
        }
    }
}

/// Entries are paired with questions by position, so the echoed question
/// text is only checked for presence. A count mismatch is tolerated and
/// settled when answers are matched.
impl Validate for AnswersReply {
    fn validate(&self) -> Result<(), String> {
        for (i, entry) in self.answers().iter().enumerate() {
            if entry.question.trim().is_empty() {
                return Err(format!("answer {i} has a blank question"));
            }
            if entry.urls.iter().any(|u| u.trim().is_empty()) {
                return Err(format!("answer {i} has a blank URL"));
            }
        }
        Ok(())
    }
}
