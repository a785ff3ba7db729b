use axum::{Json, extract::State};
use tokio_util::sync::CancellationToken;

use crate::analysis::{self, AnalysisReport, Insights, SiteAnalysis, VisibilityRanking};
use crate::api::dtos::{
    AnalyzeRequest, ErrorResponse, EvaluateRequest, InsightsRequest, ScrapeRequest,
};
use crate::api::errors::ApiError;
use crate::api::extract::ApiJson;
use crate::app_state::AppState;

#[utoipa::path(
    post,
    path = "/v1/scrape",
    tag = "analysis",
    request_body = ScrapeRequest,
    responses(
        (status = 200, description = "Page signals with niche, relevance and keyword density", body = SiteAnalysis),
        (status = 400, description = "Invalid URL", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 502, description = "Page could not be fetched", body = ErrorResponse)
    )
)]
pub async fn scrape(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ScrapeRequest>,
) -> Result<Json<SiteAnalysis>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let analysis = state.analyzer.scrape(&payload.url).await?;
    Ok(Json(analysis))
}

#[utoipa::path(
    post,
    path = "/v1/evaluate",
    tag = "analysis",
    request_body = EvaluateRequest,
    responses(
        (status = 200, description = "LLM visibility ranking", body = VisibilityRanking),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 502, description = "LLM backend failed or replied with unusable output", body = ErrorResponse)
    )
)]
pub async fn evaluate(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<EvaluateRequest>,
) -> Result<Json<VisibilityRanking>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let niche = payload.niche.trim().to_string();
    let signals = payload.into_signals();
    let ranking = state
        .analyzer
        .evaluate(&signals.url, &niche, &signals)
        .await?;
    Ok(Json(ranking))
}

#[utoipa::path(
    post,
    path = "/v1/insights",
    tag = "analysis",
    request_body = InsightsRequest,
    responses(
        (status = 200, description = "Strengths and weaknesses", body = Insights),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse)
    )
)]
pub async fn insights(
    ApiJson(payload): ApiJson<InsightsRequest>,
) -> Result<Json<Insights>, ApiError> {
    Ok(Json(analysis::synthesize(&payload.analysis, &payload.ranking)))
}

#[utoipa::path(
    post,
    path = "/v1/analyze",
    tag = "analysis",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Full report; `ranking` is null when evaluation failed", body = AnalysisReport),
        (status = 400, description = "Invalid URL", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 502, description = "Page could not be fetched", body = ErrorResponse)
    )
)]
pub async fn analyze(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    // Dropping this future on client disconnect already stops the run.
    let cancel = CancellationToken::new();
    let report = state.analyzer.analyze(&payload.url, &cancel).await?;
    Ok(Json(report))
}
