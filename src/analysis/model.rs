use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::extractor::PageSignals;

/// Label used for the niche of a fallback relevance record.
pub const NICHE_FALLBACK_LABEL: &str = "Could not find a niche";

/// LLM-assessed alignment between a page and its niche.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopicalRelevance {
    pub niche: String,
    /// 0-10, as reported by the model.
    pub score: u8,
    pub feedback: String,
}

impl TopicalRelevance {
    pub fn fallback(reason: &str) -> Self {
        Self {
            niche: NICHE_FALLBACK_LABEL.to_string(),
            score: 0,
            feedback: format!("Error getting relevance: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeywordDensityEntry {
    pub keyword: String,
    pub count: usize,
    /// In [0, 100], two decimals.
    pub density_as_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question: String,
    pub found_url_match: bool,
    pub llm_recommended_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ranking {
    /// Percentage of questions whose recommendations include the target host.
    pub score: u8,
    pub questions: Vec<QuestionResult>,
}

impl Ranking {
    pub fn matched_count(&self) -> usize {
        self.questions.iter().filter(|q| q.found_url_match).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VisibilityRanking {
    pub niche: String,
    pub ranking: Ranking,
}

/// Fallback values substituted for a failed LLM step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    NicheFallback,
    RelevanceFallback,
    KeywordsUnavailable,
}

/// Page signals plus the topic and keyword analysis derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnalysis {
    #[serde(flatten)]
    pub page: PageSignals,
    /// Empty when niche detection failed.
    pub niche: String,
    pub topical_relevance: TopicalRelevance,
    pub keyword_density: Vec<KeywordDensityEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub about_pages: Vec<PageSignals>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degradations: Vec<Degradation>,
}

impl SiteAnalysis {
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keyword_density
            .iter()
            .map(|entry| entry.keyword.as_str())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum InsightCategory {
    LlmVisibility,
    KeywordDensity,
    MetaDescription,
    Title,
    Headers,
    TopicalRelevance,
    StructuredData,
}

impl InsightCategory {
    pub const ALL: [InsightCategory; 7] = [
        Self::LlmVisibility,
        Self::KeywordDensity,
        Self::MetaDescription,
        Self::Title,
        Self::Headers,
        Self::TopicalRelevance,
        Self::StructuredData,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StrengthWeaknessItem {
    pub category: InsightCategory,
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Insights {
    pub strengths: Vec<StrengthWeaknessItem>,
    pub weaknesses: Vec<StrengthWeaknessItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Signals, ranking and insights present with no fallbacks.
    Complete,
    /// Ranking present but some analysis steps fell back to placeholders.
    Degraded,
    /// Signals present, ranking absent.
    EvaluationFailed,
}

/// End-to-end result for one URL.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub id: Uuid,
    pub url: String,
    pub analyzed_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub analysis: SiteAnalysis,
    pub ranking: Option<VisibilityRanking>,
    pub evaluation_error: Option<String>,
    pub insights: Option<Insights>,
}
