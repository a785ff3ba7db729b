use std::sync::Arc;

use anyhow::Context;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::llm::{LlmBackend, OpenAiClient};
use crate::middleware::rate_limit::RateLimit;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub rate_limit: RateLimit,
    pub llm_model: String,
    pub llm_configured: bool,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let llm = OpenAiClient::new(config.llm_settings()).context("Failed to build LLM client")?;
        let llm_model = llm.model().to_string();
        Self::with_backend(config, Arc::new(llm), llm_model)
    }

    /// Builds state around an arbitrary backend, e.g. a stub in tests.
    pub fn with_backend(
        config: &Config,
        llm: Arc<dyn LlmBackend>,
        llm_model: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let fetcher =
            Fetcher::new(&config.fetch_settings()).context("Failed to build page fetcher")?;
        let analyzer = Analyzer::new(fetcher, llm, config.analyzer_options());

        Ok(Self {
            analyzer: Arc::new(analyzer),
            rate_limit: RateLimit::new(
                config.rate_limit_max_requests(),
                config.rate_limit_window_secs(),
            ),
            llm_model: llm_model.into(),
            llm_configured: config.has_llm_api_key(),
        })
    }
}
