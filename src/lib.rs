//! SEO and LLM-visibility analysis for web pages.
//!
//! A page is fetched ([`fetcher`]), reduced to SEO signals ([`extractor`]),
//! and then examined by a chat-completions model ([`llm`], [`prompts`]):
//! niche, topical relevance, keywords, and whether the model recommends the
//! site when asked questions from that niche. [`analysis`] ties these stages
//! together and turns the results into rule-based strengths and weaknesses.

pub mod analysis;
pub mod api;
pub mod app_state;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod llm;
pub mod middleware;
pub mod prompts;
pub mod telemetry;
