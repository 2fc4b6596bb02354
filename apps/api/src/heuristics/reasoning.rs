//! Reasoning: runs the pipeline and explains the follow-up to the participant.
//!
//! The target value always comes from the scenario the participant picked. The
//! scorer's guess is computed independently and only disclosed, never used to pick
//! the question.

use serde::{Deserialize, Serialize};

use crate::heuristics::followup::{select_followup, RandomSource};
use crate::heuristics::keywords::extract_keywords;
use crate::heuristics::values::{detect_value, Category, ConfidenceLevel, ValueGuess};

const NO_KEYWORDS: &str = "no clear keywords";

/// Full output of one generation. Replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowupResult {
    pub question: String,
    pub reasoning: String,
    pub target: Category,
    /// Confidence of the scorer's independent guess.
    pub confidence: ConfidenceLevel,
    pub guess: ValueGuess,
    pub resume_keywords: Vec<String>,
    pub answer_keywords: Vec<String>,
}

fn join_or_placeholder(keywords: &[String]) -> String {
    if keywords.is_empty() {
        NO_KEYWORDS.to_string()
    } else {
        keywords.join(", ")
    }
}

/// Builds the participant-facing explanation string.
pub fn compose_reasoning(
    target: Category,
    resume_keywords: &[String],
    answer_keywords: &[String],
    guess: &ValueGuess,
) -> String {
    format!(
        "The follow-up targets **{target}** based on the scenario you selected. \
         In your resume, I noticed: {}. \
         In your answer, I noticed: {}. \
         The system's internal guess from your answer alone was **{}** \
         with **{}** confidence.",
        join_or_placeholder(resume_keywords),
        join_or_placeholder(answer_keywords),
        guess.label(),
        guess.confidence,
    )
}

/// Generates a follow-up question for the scenario's `target` value and explains it.
pub fn generate_followup(
    resume_text: &str,
    answer_text: &str,
    target: Category,
    rng: &mut dyn RandomSource,
) -> FollowupResult {
    let guess = detect_value(answer_text);
    let question = select_followup(target, rng).to_string();

    let resume_keywords = extract_keywords(resume_text);
    let answer_keywords = extract_keywords(answer_text);

    let reasoning = compose_reasoning(target, &resume_keywords, &answer_keywords, &guess);

    FollowupResult {
        question,
        reasoning,
        target,
        confidence: guess.confidence,
        guess,
        resume_keywords,
        answer_keywords,
    }
}
