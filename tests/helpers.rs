#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::connect_info::MockConnectInfo};
use std::{net::SocketAddr, sync::Arc};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use seolens::{
    api,
    app_state::AppState,
    config::Config,
    llm::{LlmBackend, LlmError},
    prompts::{
        ANSWERS_MAX_TOKENS, KEYWORDS_MAX_TOKENS, NICHE_MAX_TOKENS, QUESTIONS_MAX_TOKENS,
        RELEVANCE_MAX_TOKENS,
    },
};

pub const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Acme Home Gym Equipment | Racks, Benches and Plates Since 1999</title>
  <meta name="description" content="Acme sells home gym equipment: squat racks, adjustable benches, bumper plates and barbells, shipped free across the country with a lifetime warranty.">
  <script type="application/ld+json">{"@context": "https://schema.org", "@type": "Store", "name": "Acme"}</script>
</head>
<body>
  <h1>Home gym equipment</h1>
  <h2>Squat racks</h2>
  <p>Acme builds gym equipment for home gym owners. Our racks, benches and plates are built to last.</p>
  <script>var tracking = "ignored";</script>
</body>
</html>"#;

/// Backend that answers each prompt by its token budget.
pub struct StubLlm {
    pub site: String,
    pub fail_niche: bool,
    pub fail_questions: bool,
}

impl StubLlm {
    pub fn recommending(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            fail_niche: false,
            fail_questions: false,
        }
    }
}

#[async_trait]
impl LlmBackend for StubLlm {
    async fn complete(
        &self,
        _system: &str,
        _user: &str,
        max_tokens: u32,
        _expect_json: bool,
    ) -> Result<String, LlmError> {
        let reply = match max_tokens {
            NICHE_MAX_TOKENS if self.fail_niche => return Err(LlmError::Timeout),
            NICHE_MAX_TOKENS => "Home gym equipment".to_string(),
            RELEVANCE_MAX_TOKENS => {
                r#"{"score": 8, "feedback": "The page is clearly about home gym gear."}"#.to_string()
            }
            KEYWORDS_MAX_TOKENS => "gym, equipment, racks, home, plates".to_string(),
            QUESTIONS_MAX_TOKENS if self.fail_questions => "Sorry, I can't do that.".to_string(),
            QUESTIONS_MAX_TOKENS => r#"{"questions": [
                "Where can I buy a squat rack?",
                "Best online home gym store?",
                "Who sells bumper plates?",
                "Best adjustable bench brand?"
            ]}"#
            .to_string(),
            ANSWERS_MAX_TOKENS => format!(
                r#"{{"answers": [
                    {{"question": "Where can I buy a squat rack?", "URLs": ["{site}/racks", "https://rogue.com"]}},
                    {{"question": "Best online home gym store?", "URLs": ["https://rogue.com"]}},
                    {{"question": "Who sells bumper plates?", "URLs": ["{site}"]}},
                    {{"question": "Best adjustable bench brand?", "URLs": []}}
                ]}}"#,
                site = self.site
            ),
            other => return Err(LlmError::InvalidResponse(format!("unexpected budget {other}"))),
        };
        Ok(reply)
    }
}

pub async fn serve_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

pub fn test_app_with_config(llm: Arc<dyn LlmBackend>, config: &Config) -> Router {
    let state = AppState::with_backend(config, llm, "stub-model").unwrap();
    api::router(state).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
}

pub fn test_app(llm: Arc<dyn LlmBackend>) -> Router {
    test_app_with_config(llm, &Config::default())
}
