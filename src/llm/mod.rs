//! LLM backend abstraction.
//!
//! Every prompt in the pipeline goes through [`LlmBackend::complete`]. The
//! production implementation is [`OpenAiClient`], which speaks the
//! OpenAI-compatible chat-completions protocol; tests substitute a mock.

pub mod errors;
pub mod openai;
pub mod schema;

pub use errors::LlmError;
pub use openai::{LlmSettings, OpenAiClient};

use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Sends a system + user exchange and returns the raw text of the first choice.
    ///
    /// `expect_json` asks the backend for JSON-formatted output. Callers parse
    /// the returned text themselves; nothing is retried here.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        expect_json: bool,
    ) -> Result<String, LlmError>;
}
