//! Topic analysis, keyword density, LLM visibility and insights built on
//! top of the extracted page signals.

pub mod density;
pub mod errors;
pub mod insights;
pub mod model;
pub mod pipeline;
pub mod topic;
pub mod visibility;

pub use errors::AnalysisError;
pub use insights::synthesize;
pub use model::{
    AnalysisReport, Degradation, InsightCategory, Insights, KeywordDensityEntry, QuestionResult,
    Ranking, ReportStatus, SiteAnalysis, StrengthWeaknessItem, TopicalRelevance, VisibilityRanking,
};
pub use pipeline::{Analyzer, AnalyzerOptions, parse_target_url};
