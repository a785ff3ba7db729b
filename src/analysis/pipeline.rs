//! Orchestrates fetch, extraction, topic analysis, visibility evaluation and
//! insight synthesis for one URL.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::analysis::errors::AnalysisError;
use crate::analysis::model::{
    AnalysisReport, Degradation, ReportStatus, SiteAnalysis, TopicalRelevance, VisibilityRanking,
};
use crate::analysis::{density, insights, topic, visibility};
use crate::extractor::{self, ExtractedPage, PageSignals};
use crate::fetcher::Fetcher;
use crate::llm::LlmBackend;

#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    pub follow_about_pages: bool,
    pub max_about_pages: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            follow_about_pages: false,
            max_about_pages: 3,
        }
    }
}

#[derive(Clone)]
pub struct Analyzer {
    fetcher: Fetcher,
    llm: Arc<dyn LlmBackend>,
    options: AnalyzerOptions,
}

/// Accepts absolute http(s) URLs with a host.
pub fn parse_target_url(raw: &str) -> Result<Url, AnalysisError> {
    let invalid = |reason: String| AnalysisError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

async fn until_cancelled<T>(
    cancel: &CancellationToken,
    work: impl Future<Output = Result<T, AnalysisError>>,
) -> Result<T, AnalysisError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AnalysisError::Cancelled),
        result = work => result,
    }
}

impl Analyzer {
    pub fn new(fetcher: Fetcher, llm: Arc<dyn LlmBackend>, options: AnalyzerOptions) -> Self {
        Self {
            fetcher,
            llm,
            options,
        }
    }

    /// Fetches and extracts the page, then runs niche detection (followed by
    /// relevance scoring) concurrently with keyword extraction.
    ///
    /// LLM failures here never fail the call: each is replaced by a fallback
    /// and recorded in `degradations`.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn scrape(&self, url: &str) -> Result<SiteAnalysis, AnalysisError> {
        let target = parse_target_url(url)?;
        let response = self.fetcher.fetch(target.as_str()).await.inspect_err(|e| {
            warn!(error = %e, network = e.is_network(), "Failed to fetch page");
        })?;
        info!(status = %response.status, charset = ?response.charset, "Fetched page");

        let ExtractedPage {
            signals,
            about_links,
        } = extractor::extract(&response);

        let llm = self.llm.as_ref();
        let topic_stage = async {
            let niche = topic::detect_niche(llm, &signals).await;
            let relevance = match &niche {
                Ok(niche) => Some(topic::score_topical_relevance(llm, &signals, niche).await),
                Err(_) => None,
            };
            (niche, relevance)
        };
        let ((niche, relevance), keywords, about_pages) = tokio::join!(
            topic_stage,
            topic::extract_keywords(llm, &signals),
            self.scrape_about_pages(about_links),
        );

        let mut degradations = Vec::new();
        let niche = niche.unwrap_or_else(|e| {
            warn!(error = %e, "Niche detection failed");
            degradations.push(Degradation::NicheFallback);
            String::new()
        });
        let topical_relevance = match relevance {
            Some(Ok(relevance)) => relevance,
            Some(Err(e)) => {
                warn!(error = %e, "Relevance scoring failed");
                degradations.push(Degradation::RelevanceFallback);
                TopicalRelevance::fallback(&e.to_string())
            }
            None => {
                degradations.push(Degradation::RelevanceFallback);
                TopicalRelevance::fallback("no niche detected")
            }
        };
        let keywords = match keywords {
            Ok(keywords) if !keywords.is_empty() => keywords,
            Ok(_) => {
                warn!("Keyword extraction returned no keywords");
                degradations.push(Degradation::KeywordsUnavailable);
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Keyword extraction failed");
                degradations.push(Degradation::KeywordsUnavailable);
                Vec::new()
            }
        };
        let keyword_density = density::compute_keyword_density(&keywords, &signals.body_text);

        info!(
            niche = %niche,
            relevance = topical_relevance.score,
            keywords = keywords.len(),
            about_pages = about_pages.len(),
            degraded = !degradations.is_empty(),
            "Scraped page"
        );

        Ok(SiteAnalysis {
            page: signals,
            niche,
            topical_relevance,
            keyword_density,
            about_pages,
            degradations,
        })
    }

    /// Fetches up to `max_about_pages` links in parallel. Pages that fail are
    /// skipped; the rest keep their link order.
    async fn scrape_about_pages(&self, links: Vec<Url>) -> Vec<PageSignals> {
        if !self.options.follow_about_pages || links.is_empty() {
            return Vec::new();
        }

        let mut tasks = JoinSet::new();
        for (index, link) in links
            .into_iter()
            .take(self.options.max_about_pages)
            .enumerate()
        {
            let fetcher = self.fetcher.clone();
            let span = info_span!("about_page", url = %link);
            tasks.spawn(
                async move {
                    let result = fetcher
                        .fetch(link.as_str())
                        .await
                        .map(|response| extractor::extract(&response).signals);
                    (index, link, result)
                }
                .instrument(span),
            );
        }

        let mut pages = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(signals))) => pages.push((index, signals)),
                Ok((_, link, Err(e))) => warn!(url = %link, error = %e, "Skipping about page"),
                Err(e) => warn!(error = %e, "About page task failed"),
            }
        }
        pages.sort_by_key(|(index, _)| *index);
        pages.into_iter().map(|(_, signals)| signals).collect()
    }

    #[instrument(skip_all, fields(url = %url, niche = %niche))]
    pub async fn evaluate(
        &self,
        url: &str,
        niche: &str,
        signals: &PageSignals,
    ) -> Result<VisibilityRanking, AnalysisError> {
        let target = parse_target_url(url)?;
        let ranking =
            visibility::evaluate_visibility(self.llm.as_ref(), target.as_str(), niche, signals)
                .await?;
        info!(
            score = ranking.ranking.score,
            questions = ranking.ranking.questions.len(),
            "Evaluated visibility"
        );
        Ok(ranking)
    }

    /// Runs every stage for `url`.
    ///
    /// Extraction failure fails the whole run. Evaluation failure does not:
    /// the report keeps the signals and carries `evaluation_error` instead of
    /// a ranking and insights.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn analyze(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, AnalysisError> {
        let analysis = until_cancelled(cancel, self.scrape(url)).await?;

        let evaluated =
            until_cancelled(cancel, self.evaluate(url, &analysis.niche, &analysis.page)).await;
        let (ranking, evaluation_error) = match evaluated {
            Ok(ranking) => (Some(ranking), None),
            Err(AnalysisError::Cancelled) => return Err(AnalysisError::Cancelled),
            Err(e) => {
                warn!(error = %e, "Visibility evaluation failed, reporting signals only");
                (None, Some(e.to_string()))
            }
        };

        let insights = ranking
            .as_ref()
            .map(|ranking| insights::synthesize(&analysis, ranking));
        let status = match (&ranking, analysis.degradations.is_empty()) {
            (None, _) => ReportStatus::EvaluationFailed,
            (Some(_), false) => ReportStatus::Degraded,
            (Some(_), true) => ReportStatus::Complete,
        };

        Ok(AnalysisReport {
            id: Uuid::new_v4(),
            url: url.trim().to_string(),
            analyzed_at: chrono::Utc::now(),
            status,
            analysis,
            ranking,
            evaluation_error,
            insights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchSettings;
    use crate::llm::{LlmError, MockLlmBackend};
    use crate::prompts::{
        ANSWERS_MAX_TOKENS, KEYWORDS_MAX_TOKENS, NICHE_MAX_TOKENS, QUESTIONS_MAX_TOKENS,
        RELEVANCE_MAX_TOKENS,
    };
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html><head>
        <title>Acme Home Gym Equipment</title>
        <meta name="description" content="Racks, benches and plates for home gyms">
        <script type="application/ld+json">{"@type": "Organization", "name": "Acme"}</script>
        </head><body>
        <h1>Home gym equipment</h1>
        <p>Acme sells gym equipment and racks for every home gym.</p>
        <a href="/about">About us</a>
        </body></html>"#;

    async fn serve_page(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html; charset=utf-8"))
            .mount(server)
            .await;
    }

    /// A backend that answers each prompt by its token budget.
    fn scripted_llm(site: String, niche_ok: bool, questions_ok: bool) -> MockLlmBackend {
        let mut llm = MockLlmBackend::new();
        llm.expect_complete().returning(move |_, _, max_tokens, _| {
            let reply = match max_tokens {
                NICHE_MAX_TOKENS if niche_ok => "Home gym equipment".to_string(),
                NICHE_MAX_TOKENS => return Err(LlmError::Timeout),
                RELEVANCE_MAX_TOKENS => r#"{"score": 8, "feedback": "Focused"}"#.to_string(),
                KEYWORDS_MAX_TOKENS => "gym, equipment, racks".to_string(),
                QUESTIONS_MAX_TOKENS if questions_ok => {
                    r#"{"questions": ["Best home gym store?", "Where to buy racks?"]}"#.to_string()
                }
                QUESTIONS_MAX_TOKENS => "I cannot help with that".to_string(),
                ANSWERS_MAX_TOKENS => format!(
                    r#"{{"answers": [
                        {{"question": "Best home gym store?", "URLs": ["{site}/shop"]}},
                        {{"question": "Where to buy racks?", "URLs": ["https://rogue.com"]}}
                    ]}}"#
                ),
                other => panic!("unexpected max_tokens {other}"),
            };
            Ok(reply)
        });
        llm
    }

    fn analyzer(llm: MockLlmBackend, options: AnalyzerOptions) -> Analyzer {
        let fetcher = Fetcher::new(&FetchSettings::default()).unwrap();
        Analyzer::new(fetcher, Arc::new(llm), options)
    }

    #[test]
    fn test_parse_target_url() {
        assert!(parse_target_url("https://acme.com").is_ok());
        assert!(matches!(
            parse_target_url("ftp://acme.com"),
            Err(AnalysisError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_target_url("acme"),
            Err(AnalysisError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_scrape_collects_signals_and_topic() {
        let server = MockServer::start().await;
        serve_page(&server).await;
        let analyzer = analyzer(scripted_llm(server.uri(), true, true), AnalyzerOptions::default());

        let analysis = analyzer.scrape(&server.uri()).await.unwrap();

        assert_eq!(analysis.page.title, "Acme Home Gym Equipment");
        assert_eq!(analysis.page.structured_data.len(), 1);
        assert_eq!(analysis.niche, "Home gym equipment");
        assert_eq!(analysis.topical_relevance.score, 8);
        assert_eq!(analysis.keyword_density.len(), 3);
        assert_eq!(analysis.keyword_density[0].keyword, "gym");
        assert!(analysis.keyword_density[0].count >= 2);
        assert!(analysis.degradations.is_empty());
        assert!(analysis.about_pages.is_empty());
    }

    #[tokio::test]
    async fn test_scrape_degrades_on_niche_failure() {
        let server = MockServer::start().await;
        serve_page(&server).await;
        let analyzer = analyzer(scripted_llm(server.uri(), false, true), AnalyzerOptions::default());

        let analysis = analyzer.scrape(&server.uri()).await.unwrap();

        assert_eq!(analysis.niche, "");
        assert_eq!(analysis.topical_relevance.score, 0);
        assert_eq!(
            analysis.degradations,
            vec![Degradation::NicheFallback, Degradation::RelevanceFallback]
        );
        assert_eq!(analysis.keyword_density.len(), 3);
    }

    #[tokio::test]
    async fn test_scrape_follows_about_pages() {
        let server = MockServer::start().await;
        serve_page(&server).await;
        Mock::given(method("GET"))
            .and(path("/about"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<html><head><title>About Acme</title></head><body>Family owned</body></html>",
                "text/html",
            ))
            .mount(&server)
            .await;
        let options = AnalyzerOptions {
            follow_about_pages: true,
            max_about_pages: 3,
        };
        let analyzer = analyzer(scripted_llm(server.uri(), true, true), options);

        let analysis = analyzer.scrape(&server.uri()).await.unwrap();

        assert_eq!(analysis.about_pages.len(), 1);
        assert_eq!(analysis.about_pages[0].title, "About Acme");
    }

    #[tokio::test]
    async fn test_scrape_fetch_failure_is_extraction_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let mut llm = MockLlmBackend::new();
        llm.expect_complete().never();
        let analyzer = analyzer(llm, AnalyzerOptions::default());

        let err = analyzer.scrape(&server.uri()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_analyze_full_report() {
        let server = MockServer::start().await;
        serve_page(&server).await;
        let analyzer = analyzer(scripted_llm(server.uri(), true, true), AnalyzerOptions::default());

        let report = analyzer
            .analyze(&server.uri(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.status, ReportStatus::Complete);
        let ranking = report.ranking.unwrap();
        assert_eq!(ranking.ranking.score, 50);
        assert!(ranking.ranking.questions[0].found_url_match);
        let insights = report.insights.unwrap();
        assert_eq!(insights.strengths.len() + insights.weaknesses.len(), 7);
        assert!(report.evaluation_error.is_none());
    }

    #[tokio::test]
    async fn test_analyze_keeps_signals_when_evaluation_fails() {
        let server = MockServer::start().await;
        serve_page(&server).await;
        let analyzer = analyzer(scripted_llm(server.uri(), true, false), AnalyzerOptions::default());

        let report = analyzer
            .analyze(&server.uri(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.status, ReportStatus::EvaluationFailed);
        assert!(report.ranking.is_none());
        assert!(report.insights.is_none());
        assert!(report.evaluation_error.unwrap().starts_with("evaluation failed"));
        assert_eq!(report.analysis.page.title, "Acme Home Gym Equipment");
    }

    #[tokio::test]
    async fn test_analyze_cancelled() {
        let server = MockServer::start().await;
        serve_page(&server).await;
        let analyzer = analyzer(scripted_llm(server.uri(), true, true), AnalyzerOptions::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = analyzer.analyze(&server.uri(), &cancel).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Cancelled));
    }
}
