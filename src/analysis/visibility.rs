//! LLM visibility: how often the model recommends the target site when asked
//! questions a searcher in its niche would ask.

use tracing::{debug, instrument, warn};
use url::{ParseError, Url};

use crate::analysis::model::{QuestionResult, Ranking, VisibilityRanking};
use crate::extractor::PageSignals;
use crate::llm::schema::{AnswerEntry, AnswersReply, QuestionsReply, parse_reply};
use crate::llm::{LlmBackend, LlmError};
use crate::prompts::{self, ANSWERS_MAX_TOKENS, QUESTIONS_MAX_TOKENS, QUESTION_COUNT};

/// Lower-cased host with a single leading `www.` removed.
///
/// A bare domain such as `acme.com/shop` is read as `https://acme.com/shop`.
/// Anything else that does not parse, or has no host, yields `None`.
pub fn normalize_host(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) if !raw.contains(char::is_whitespace) => {
            Url::parse(&format!("https://{raw}")).ok()?
        }
        Err(_) => return None,
    };
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let host = url.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    (!host.is_empty()).then(|| host.to_string())
}

/// Pairs questions with answers by position. A question without an answer
/// is unmatched with no URLs.
pub fn match_answers(
    target_url: &str,
    questions: &[String],
    answers: Vec<AnswerEntry>,
) -> Vec<QuestionResult> {
    let target_host = normalize_host(target_url);
    let mut answers = answers.into_iter();

    questions
        .iter()
        .map(|question| {
            let urls = answers.next().map(|a| a.urls).unwrap_or_default();
            let found_url_match = target_host.as_deref().is_some_and(|target| {
                urls.iter()
                    .any(|candidate| normalize_host(candidate).as_deref() == Some(target))
            });
            QuestionResult {
                question: question.clone(),
                found_url_match,
                llm_recommended_urls: urls,
            }
        })
        .collect()
}

/// Whole-number percentage of matched questions; 0 for no questions.
pub fn aggregate_score(results: &[QuestionResult]) -> u8 {
    if results.is_empty() {
        return 0;
    }
    let matched = results.iter().filter(|r| r.found_url_match).count();
    (100.0 * matched as f64 / results.len() as f64).round() as u8
}

#[instrument(skip_all, fields(url = %signals.url, niche = %niche))]
pub async fn generate_questions(
    llm: &dyn LlmBackend,
    signals: &PageSignals,
    niche: &str,
) -> Result<Vec<String>, LlmError> {
    let prompt = prompts::questions_prompt(signals, niche);
    let raw = llm
        .complete(&prompt.system, &prompt.user, QUESTIONS_MAX_TOKENS, true)
        .await?;
    let reply: QuestionsReply = parse_reply(&raw)?;

    let mut questions: Vec<String> = reply
        .into_questions()
        .into_iter()
        .map(|q| q.trim().to_string())
        .collect();
    if questions.len() > QUESTION_COUNT {
        debug!(returned = questions.len(), "Truncating generated questions");
        questions.truncate(QUESTION_COUNT);
    }
    Ok(questions)
}

#[instrument(skip_all, fields(niche = %niche, questions = questions.len()))]
pub async fn generate_answers(
    llm: &dyn LlmBackend,
    niche: &str,
    questions: &[String],
) -> Result<Vec<AnswerEntry>, LlmError> {
    let prompt = prompts::answers_prompt(niche, questions);
    let raw = llm
        .complete(&prompt.system, &prompt.user, ANSWERS_MAX_TOKENS, true)
        .await?;
    let answers = parse_reply::<AnswersReply>(&raw)?.into_answers();

    if answers.len() != questions.len() {
        warn!(
            expected = questions.len(),
            returned = answers.len(),
            "Answer count does not match question count"
        );
    }
    Ok(answers)
}

/// Generates questions, collects recommendations and scores the target.
///
/// An empty niche, or a model that produces no questions, gives a score of 0
/// without asking for answers.
#[instrument(skip_all, fields(url = %target_url, niche = %niche))]
pub async fn evaluate_visibility(
    llm: &dyn LlmBackend,
    target_url: &str,
    niche: &str,
    signals: &PageSignals,
) -> Result<VisibilityRanking, LlmError> {
    let empty = || VisibilityRanking {
        niche: niche.to_string(),
        ranking: Ranking {
            score: 0,
            questions: Vec::new(),
        },
    };

    if niche.trim().is_empty() {
        debug!("No niche, skipping visibility evaluation");
        return Ok(empty());
    }

    let questions = generate_questions(llm, signals, niche).await?;
    if questions.is_empty() {
        debug!("Model produced no questions");
        return Ok(empty());
    }

    let answers = generate_answers(llm, niche, &questions).await?;
    let results = match_answers(target_url, &questions, answers);
    let score = aggregate_score(&results);

    Ok(VisibilityRanking {
        niche: niche.to_string(),
        ranking: Ranking {
            score,
            questions: results,
        },
    })
}
