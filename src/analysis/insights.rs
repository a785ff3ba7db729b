//! Rule-based strengths and weaknesses. One item per [`InsightCategory`].

use crate::analysis::density::DensityBand;
use crate::analysis::model::{
    InsightCategory, Insights, SiteAnalysis, StrengthWeaknessItem, VisibilityRanking,
};
use crate::extractor::HeaderLevel;

pub const META_DESCRIPTION_CHARS: (usize, usize) = (120, 160);
pub const TITLE_CHARS: (usize, usize) = (60, 80);
pub const MIN_OPTIMAL_KEYWORDS: usize = 2;
/// Densities counted as optimal for the insight. Closed at both ends, unlike
/// the per-keyword display band.
pub const OPTIMAL_DENSITY_PERCENT: std::ops::RangeInclusive<f64> = 1.25..=1.75;
pub const MIN_RELEVANCE_SCORE: u8 = 6;

pub fn synthesize(analysis: &SiteAnalysis, ranking: &VisibilityRanking) -> Insights {
    let keywords: Vec<String> = analysis.keywords().map(str::to_lowercase).collect();
    let verdicts = [
        visibility(ranking),
        keyword_density(analysis),
        meta_description(&analysis.page.meta_description, &keywords),
        title(&analysis.page.title, &keywords),
        headers(analysis, &keywords),
        topical_relevance(analysis),
        structured_data(analysis),
    ];

    let mut insights = Insights::default();
    for verdict in verdicts {
        match verdict {
            Verdict::Strength(item) => insights.strengths.push(item),
            Verdict::Weakness(item) => insights.weaknesses.push(item),
        }
    }
    insights
}

enum Verdict {
    Strength(StrengthWeaknessItem),
    Weakness(StrengthWeaknessItem),
}

fn item(category: InsightCategory, name: &str, message: impl Into<String>) -> StrengthWeaknessItem {
    StrengthWeaknessItem {
        category,
        name: name.to_string(),
        message: message.into(),
    }
}

fn contains_keyword(text: &str, keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    keywords.iter().any(|k| text.contains(k.as_str()))
}

fn visibility(ranking: &VisibilityRanking) -> Verdict {
    const NAME: &str = "LLM Visibility: how often your site appeared in the AI's answers";
    let category = InsightCategory::LlmVisibility;

    let message = match ranking.ranking.matched_count() {
        0 => {
            return Verdict::Weakness(item(
                category,
                NAME,
                "Your site did not appear in any AI answer. Search engines and AI tools may not be discovering your content yet.",
            ));
        }
        1 => "Your site showed up once. A solid foundation to build upon.",
        2 => "Your site showed up twice. A strong baseline that likely outperforms many competitors.",
        3 => "Your site showed up three times. Great visibility that can be pushed further.",
        4 => "Your site showed up four times. Excellent recognition with a little room left to grow.",
        _ => "Your site showed up in every answer. Outstanding visibility.",
    };
    Verdict::Strength(item(category, NAME, message))
}

fn keyword_density(analysis: &SiteAnalysis) -> Verdict {
    const NAME: &str = "Keyword Density: how often a keyword appears compared to the total words";
    let category = InsightCategory::KeywordDensity;

    let optimal = analysis
        .keyword_density
        .iter()
        .filter(|e| OPTIMAL_DENSITY_PERCENT.contains(&e.density_as_percent))
        .count();
    if optimal >= MIN_OPTIMAL_KEYWORDS {
        Verdict::Strength(item(
            category,
            NAME,
            format!("{optimal} keywords are in the optimal density range. Follow the tips for the remaining ones, if any."),
        ))
    } else {
        let tips: Vec<String> = analysis
            .keyword_density
            .iter()
            .filter(|e| !OPTIMAL_DENSITY_PERCENT.contains(&e.density_as_percent))
            .map(|e| {
                let band = DensityBand::classify(e.density_as_percent);
                format!("{} ({}%): {}", e.keyword, e.density_as_percent, band.message())
            })
            .collect();
        let message = if tips.is_empty() {
            "Your keyword usage needs attention. No keywords were found to measure.".to_string()
        } else {
            format!("Your keyword usage needs attention. {}.", tips.join("; "))
        };
        Verdict::Weakness(item(category, NAME, message))
    }
}

/// Sub-conditions failed by a text field that should be `bounds` characters
/// long and mention a keyword.
fn text_issues(text: &str, bounds: (usize, usize), keywords: &[String]) -> Vec<&'static str> {
    if text.trim().is_empty() {
        return vec!["missing entirely"];
    }
    let mut issues = Vec::new();
    let len = text.chars().count();
    if len < bounds.0 {
        issues.push("too short");
    }
    if len > bounds.1 {
        issues.push("too long");
    }
    if !contains_keyword(text, keywords) {
        issues.push("missing keywords");
    }
    issues
}

fn meta_description(meta: &str, keywords: &[String]) -> Verdict {
    let category = InsightCategory::MetaDescription;
    let (min, max) = META_DESCRIPTION_CHARS;
    let issues = text_issues(meta, META_DESCRIPTION_CHARS, keywords);

    if issues.is_empty() {
        Verdict::Strength(item(
            category,
            "Meta Description: the short summary shown under your link in search results",
            format!("Your meta description is {min}-{max} characters and includes at least one keyword."),
        ))
    } else {
        Verdict::Weakness(item(
            category,
            "Meta Description",
            format!(
                "Your meta description needs improvement: {}. Aim for {min}-{max} characters with at least one target keyword.",
                issues.join(", ")
            ),
        ))
    }
}

fn title(title: &str, keywords: &[String]) -> Verdict {
    let category = InsightCategory::Title;
    let (min, max) = TITLE_CHARS;
    let issues = text_issues(title, TITLE_CHARS, keywords);

    if issues.is_empty() {
        Verdict::Strength(item(
            category,
            "Title: the headline that tells users what the page is about",
            format!("Your title is {min}-{max} characters and includes at least one keyword."),
        ))
    } else {
        Verdict::Weakness(item(
            category,
            "Title Tag",
            format!(
                "Your title needs improvement: {}. Aim for {min}-{max} characters with at least one target keyword.",
                issues.join(", ")
            ),
        ))
    }
}

fn headers(analysis: &SiteAnalysis, keywords: &[String]) -> Verdict {
    let category = InsightCategory::Headers;
    let headers = &analysis.page.headers;

    let mut issues = Vec::new();
    if headers.is_empty() {
        issues.push("no headers detected");
    } else {
        if !headers.iter().any(|h| h.level == HeaderLevel::H1) {
            issues.push("missing H1 tag");
        }
        if !headers.iter().any(|h| contains_keyword(&h.text, keywords)) {
            issues.push("missing keywords in headers");
        }
    }

    if issues.is_empty() {
        Verdict::Strength(item(
            category,
            "Headers: the outline that makes a page easy to scan",
            "Your page has a clear header structure with an H1 tag and keywords in its headers.",
        ))
    } else {
        Verdict::Weakness(item(
            category,
            "Header Structure",
            format!(
                "Your headers need improvement: {}. Use one H1 tag per page and include keywords naturally.",
                issues.join(", ")
            ),
        ))
    }
}

fn topical_relevance(analysis: &SiteAnalysis) -> Verdict {
    let category = InsightCategory::TopicalRelevance;
    let relevance = &analysis.topical_relevance;

    if relevance.score >= MIN_RELEVANCE_SCORE {
        Verdict::Strength(item(
            category,
            "Topical Relevance: how clearly the page conveys its main subject",
            format!("AI feedback: {}", relevance.feedback),
        ))
    } else {
        Verdict::Weakness(item(
            category,
            "Content Relevance",
            format!(
                "The content may not fully align with its topic. AI feedback: {}",
                relevance.feedback
            ),
        ))
    }
}

fn structured_data(analysis: &SiteAnalysis) -> Verdict {
    let category = InsightCategory::StructuredData;

    if analysis.page.structured_data.is_empty() {
        Verdict::Weakness(item(
            category,
            "Structured Data",
            "Your page has no structured data. Adding schema.org markup helps search engines understand and display your content.",
        ))
    } else {
        Verdict::Strength(item(
            category,
            "Structured Data: machine-readable markup describing your content",
            "Your page has structured data, which helps search engines interpret and display your content.",
        ))
    }
}
