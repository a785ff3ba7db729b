//! # Prompt templates
//!
//! One builder per LLM call in the pipeline. Templates are fixed strings with
//! `{placeholder}` slots filled from [`PageSignals`]; substituted values are
//! flattened to a single line and have double quotes replaced so they cannot
//! break the quoting or the response format the template asks for.

use crate::extractor::{
    model::{collapse_whitespace, truncate_chars},
    Header, HeaderLevel, PageSignals,
};

/// Output token budgets, one per call.
pub const NICHE_MAX_TOKENS: u32 = 10;
pub const RELEVANCE_MAX_TOKENS: u32 = 300;
pub const KEYWORDS_MAX_TOKENS: u32 = 50;
pub const QUESTIONS_MAX_TOKENS: u32 = 200;
pub const ANSWERS_MAX_TOKENS: u32 = 1000;

/// Characters of body text shown to the relevance prompt.
pub const RELEVANCE_BODY_EXCERPT_CHARS: usize = 500;

/// Number of questions requested from the model.
pub const QUESTION_COUNT: usize = 5;

/// A system instruction and user message pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

// --- Niche detection ---
const NICHE_SYSTEM_PROMPT: &str = "You're an SEO expert. Based on a page's title, meta description, and headers, what is its niche? Return a short phrase (ex: supermarket equipment).";
const NICHE_USER_PROMPT: &str = "Title: {title}\nMeta: {meta}\nHeaders: {headers}";

// --- Topical relevance ---
const RELEVANCE_SYSTEM_PROMPT: &str = r#"You're an SEO expert. Given a page's title, meta description, headers, and a sample of body text, assess if it's about a specific niche. Use this as a scoring guide to decide a final score:
- Keyword Alignment (0-3):
  0: No niche keywords
  1: Some keywords present
  2: Good keyword coverage
  3: Perfect keyword integration
- Content Depth (0-3):
  0: No real content about niche
  1: Briefly mentions niche
  2: Covers multiple aspects
  3: Comprehensive niche coverage
- Audience Match (0-2):
  0: Wrong audience
  1: Partial audience match
  2: Perfect audience targeting
- Commercial Intent (0-2):
  0: No commercial alignment
  1: Somewhat aligned
  2: Perfect commercial fit
The SCORE that is returned is the sum of the four scores you evaluated.
The FEEDBACK briefly discusses the scores you gave and why.
Return ONLY raw JSON without any markdown formatting or additional text, like this: {"score": number, "feedback": string}"#;
const RELEVANCE_USER_PROMPT: &str = r#"Site info: Title: {title}
Meta: {meta}
Headers: {headers}
Body (first 500 chars): {body}

Is this page about "{niche}"? Evaluate based on these CRITERIA:
1. Keyword alignment (0-3 points) 2. Content depth about niche (0-3 points) 3. Audience targeting match (0-2 points) 4. Commercial intent alignment (0-2 points). The SCORE value being returned is the sum of those 4 scores and FEEDBACK briefly discusses the scores you gave. Return JSON: {"score": number, "feedback": string}"#;

// --- Keyword extraction ---
const KEYWORDS_SYSTEM_PROMPT: &str = "You're an SEO expert. Given a site's title, meta description, and headers, suggest exactly 5 keywords separated by commas for its niche. Make sure that there are NO company or brand names, and that they are SINGLE WORD keywords, not phrases. Return only the comma-separated keywords.";
const KEYWORDS_USER_PROMPT: &str = "Title: {title}\nMeta: {meta}\n\nH1-H2-H3: {headers}";

// --- Question generation ---
const QUESTIONS_SYSTEM_PROMPT: &str = r#"You're an SEO expert. Generate exactly 5 generic questions about the best tools or services for a given category/niche. Questions must take the form "What is the best tool/service for <niche>?" (e.g., "What is the best supermarket shelving?" for supermarket equipment) and MUST NOT mention any specific brand, company, or URL. Use the provided context only to understand the niche; exclude brand-specific terms. Return RAW JSON: {"questions": string[]}"#;
const QUESTIONS_USER_PROMPT: &str = r#"Given this category/niche: "{niche}", generate 5 generic questions about the best tools or services in that category. To refine the niche, use this context but exclude brand-specific terms: Headers: {headers}, meta description: {meta}, title: {title}. Return only RAW JSON like this: {"questions": string[]}"#;

// --- Answer generation ---
const ANSWERS_SYSTEM_PROMPT: &str = r#"You're an independent expert answering questions about a category. For each question, name the top 3 tools or sites and give the URL of each. Answer from your own knowledge only. Return RAW JSON with no markdown: {"answers": [{"question": string, "URLs": string[]}]}"#;
const ANSWERS_USER_PROMPT: &str = r#"Answer these questions about "{niche}":
{questions}
For each, list the top 3 tools/sites (URLs).
Return RAW JSON with no markdown that looks exactly like this: {"answers": [{"question": string, "URLs": string[]}]}"#;

pub fn niche_prompt(signals: &PageSignals) -> Prompt {
    Prompt {
        system: NICHE_SYSTEM_PROMPT.to_string(),
        user: render(NICHE_USER_PROMPT, &site_fields(signals)),
    }
}

pub fn relevance_prompt(signals: &PageSignals, niche: &str) -> Prompt {
    let excerpt = truncate_chars(&signals.body_text, RELEVANCE_BODY_EXCERPT_CHARS);
    let mut fields = site_fields(signals);
    fields.push(("body", or_placeholder(excerpt, "No body text")));
    fields.push(("niche", sanitize(niche)));

    Prompt {
        system: RELEVANCE_SYSTEM_PROMPT.to_string(),
        user: render(RELEVANCE_USER_PROMPT, &fields),
    }
}

pub fn keywords_prompt(signals: &PageSignals) -> Prompt {
    Prompt {
        system: KEYWORDS_SYSTEM_PROMPT.to_string(),
        user: render(KEYWORDS_USER_PROMPT, &site_fields(signals)),
    }
}

pub fn questions_prompt(signals: &PageSignals, niche: &str) -> Prompt {
    let mut fields = site_fields(signals);
    fields.push(("niche", sanitize(niche)));

    Prompt {
        system: QUESTIONS_SYSTEM_PROMPT.to_string(),
        user: render(QUESTIONS_USER_PROMPT, &fields),
    }
}

/// Carries no page content, only the niche and the questions.
pub fn answers_prompt(niche: &str, questions: &[String]) -> Prompt {
    let numbered = questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, sanitize(q)))
        .collect::<Vec<_>>()
        .join("\n");

    Prompt {
        system: ANSWERS_SYSTEM_PROMPT.to_string(),
        user: render(
            ANSWERS_USER_PROMPT,
            &[("niche", sanitize(niche)), ("questions", numbered)],
        ),
    }
}

/// Comma-joined h1/h2/h3 texts.
pub fn format_headers(headers: &[Header]) -> String {
    headers
        .iter()
        .filter(|h| matches!(h.level, HeaderLevel::H1 | HeaderLevel::H2 | HeaderLevel::H3))
        .map(|h| sanitize(&h.text))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

fn site_fields(signals: &PageSignals) -> Vec<(&'static str, String)> {
    vec![
        ("title", or_placeholder(&signals.title, "Untitled")),
        ("meta", or_placeholder(&signals.meta_description, "No description")),
        (
            "headers",
            Some(format_headers(&signals.headers))
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| "No headers".to_string()),
        ),
    ]
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    let value = sanitize(value);
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

/// Single line, no double quotes, no braces.
fn sanitize(value: &str) -> String {
    collapse_whitespace(value)
        .chars()
        .map(|c| match c {
            '"' => '\'',
            '{' => '(',
            '}' => ')',
            other => other,
        })
        .collect()
}

fn render(template: &str, fields: &[(&str, String)]) -> String {
    fields.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}
