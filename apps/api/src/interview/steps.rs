//! Interview wizard: an explicit step state advanced by pure transitions.
//!
//! Every transition takes the current `StepState` by reference and returns a new
//! one. A failed validation returns `StepError` and leaves the caller's state as it
//! was, so the participant stays on the same step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::heuristics::followup::{select_alternative, RandomSource};
use crate::heuristics::neutralize::neutralize_question;
use crate::heuristics::reasoning::{generate_followup, FollowupResult};
use crate::heuristics::scenarios::{find_scenario, Scenario};
use crate::models::submission::LogRow;

/// Wizard steps after the consent gate, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Resume,
    Scenario,
    Response,
    Followup,
    Feedback,
}

impl Step {
    /// 1-based position shown as "Step N of 5".
    pub fn number(self) -> u8 {
        match self {
            Step::Resume => 1,
            Step::Scenario => 2,
            Step::Response => 3,
            Step::Followup => 4,
            Step::Feedback => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// A required field is empty or out of range. Shown to the participant as-is.
    #[error("{0}")]
    Invalid(String),

    /// The transition was attempted before the step it depends on.
    #[error("{0}")]
    NotReady(&'static str),
}

/// Everything a participant has entered so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepState {
    pub consent: bool,
    pub participant_id: Option<String>,
    pub active_step: Step,

    pub resume_text: String,
    pub resume_done: bool,

    pub scenario: Option<&'static Scenario>,
    pub scenario_prompt: String,
    pub answer_text: String,
    pub response_done: bool,

    /// Latest generation only; each refresh replaces it.
    pub followup: Option<FollowupResult>,
    pub followup_answer_text: String,
    pub followup_done: bool,

    pub alternative_question: Option<String>,

    /// Row appended by the most recent submission.
    pub submitted: Option<LogRow>,
}

/// Participant's answer to "Would you accept this type of AI interviewer?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcceptAi {
    Yes,
    No,
    #[serde(rename = "Not sure")]
    NotSure,
}

impl AcceptAi {
    pub fn as_str(self) -> &'static str {
        match self {
            AcceptAi::Yes => "Yes",
            AcceptAi::No => "No",
            AcceptAi::NotSure => "Not sure",
        }
    }
}

fn neutral_rating() -> u8 {
    3
}

/// Ratings and comments collected on the final step. Ratings default to the
/// neutral midpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackForm {
    #[serde(default = "neutral_rating")]
    pub fairness_score: u8,
    #[serde(default = "neutral_rating")]
    pub relevance_score: u8,
    #[serde(default = "neutral_rating")]
    pub comfort_score: u8,
    #[serde(default = "neutral_rating")]
    pub trust_score: u8,
    #[serde(default)]
    pub flag_unfair: bool,
    #[serde(default)]
    pub unfair_comment: String,
    #[serde(default)]
    pub alternative_answer_text: String,
    pub accept_ai: AcceptAi,
    #[serde(default)]
    pub open_feedback: String,
}

fn require_consent(state: &StepState) -> Result<(), StepError> {
    if state.consent {
        Ok(())
    } else {
        Err(StepError::NotReady(
            "Please give your consent to start the interview steps.",
        ))
    }
}

fn require_text(text: &str, message: &str) -> Result<(), StepError> {
    if text.trim().is_empty() {
        Err(StepError::Invalid(message.to_string()))
    } else {
        Ok(())
    }
}

fn require_rating(name: &str, value: u8) -> Result<(), StepError> {
    if (1..=5).contains(&value) {
        Ok(())
    } else {
        Err(StepError::Invalid(format!(
            "{name} must be between 1 and 5 (got {value})"
        )))
    }
}

pub fn give_consent(state: &StepState) -> StepState {
    StepState {
        consent: true,
        ..state.clone()
    }
}

pub fn set_participant_id(state: &StepState, participant_id: &str) -> StepState {
    let trimmed = participant_id.trim();
    StepState {
        participant_id: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        ..state.clone()
    }
}

/// Step 1: resume or short summary.
pub fn save_resume(state: &StepState, resume_text: &str) -> Result<StepState, StepError> {
    require_consent(state)?;
    require_text(
        resume_text,
        "Please add at least a short summary or resume text before continuing.",
    )?;

    Ok(StepState {
        resume_text: resume_text.to_string(),
        resume_done: true,
        active_step: Step::Scenario,
        ..state.clone()
    })
}

/// Step 2: pick a scenario. The prompt resets to the catalog prompt when the
/// scenario changes unless a custom prompt is given.
///
/// Switching to a different scenario discards the generated follow-up, since it
/// was chosen for the previous scenario's value.
pub fn choose_scenario(
    state: &StepState,
    scenario_name: &str,
    custom_prompt: Option<&str>,
) -> Result<StepState, StepError> {
    require_consent(state)?;
    if !state.resume_done {
        return Err(StepError::NotReady("Complete Step 1 first."));
    }
    let scenario = find_scenario(scenario_name)
        .ok_or_else(|| StepError::Invalid(format!("Unknown scenario '{scenario_name}'")))?;

    let changed = state.scenario.map(|s| s.name) != Some(scenario.name);
    let scenario_prompt = match custom_prompt {
        Some(p) => p.trim().to_string(),
        None if changed => scenario.prompt.to_string(),
        None => state.scenario_prompt.clone(),
    };

    let mut next = StepState {
        scenario: Some(scenario),
        scenario_prompt,
        active_step: Step::Response,
        ..state.clone()
    };
    if changed {
        next.response_done = false;
        next.followup = None;
        next.followup_answer_text.clear();
        next.followup_done = false;
        next.alternative_question = None;
    }
    Ok(next)
}

/// Step 3: answer the scenario prompt.
pub fn save_response(state: &StepState, answer_text: &str) -> Result<StepState, StepError> {
    require_consent(state)?;
    if state.scenario.is_none() {
        return Err(StepError::NotReady("Complete Step 2 first."));
    }
    require_text(
        &state.scenario_prompt,
        "Scenario prompt is empty. Please select a scenario or enter a prompt.",
    )?;
    require_text(answer_text, "Please write your response before continuing.")?;

    Ok(StepState {
        answer_text: answer_text.to_string(),
        response_done: true,
        active_step: Step::Followup,
        ..state.clone()
    })
}

/// Step 4: generate (or refresh) the follow-up question for the chosen scenario.
pub fn refresh_followup(
    state: &StepState,
    rng: &mut dyn RandomSource,
) -> Result<StepState, StepError> {
    require_consent(state)?;
    let scenario = match state.scenario {
        Some(s) if state.response_done => s,
        _ => return Err(StepError::NotReady("Complete Step 3 first.")),
    };
    if state.resume_text.trim().is_empty() || state.answer_text.trim().is_empty() {
        return Err(StepError::Invalid(
            "Please make sure both your resume/experience and your answer are filled in."
                .to_string(),
        ));
    }

    let followup = generate_followup(&state.resume_text, &state.answer_text, scenario.value, rng);

    Ok(StepState {
        followup: Some(followup),
        followup_answer_text: String::new(),
        followup_done: false,
        alternative_question: None,
        active_step: Step::Followup,
        ..state.clone()
    })
}

/// Step 4: answer the follow-up question.
pub fn save_followup_answer(state: &StepState, answer_text: &str) -> Result<StepState, StepError> {
    require_consent(state)?;
    if state.followup.is_none() {
        return Err(StepError::NotReady(
            "Generate the follow-up question before answering it.",
        ));
    }
    require_text(
        answer_text,
        "Please respond to the AI follow-up question before continuing.",
    )?;

    Ok(StepState {
        followup_answer_text: answer_text.to_string(),
        followup_done: true,
        active_step: Step::Feedback,
        ..state.clone()
    })
}

/// Step 5: draw an alternative question from the same value bank.
pub fn generate_alternative(
    state: &StepState,
    rng: &mut dyn RandomSource,
) -> Result<StepState, StepError> {
    require_consent(state)?;
    let followup = match &state.followup {
        Some(f) if state.followup_done => f,
        _ => return Err(StepError::NotReady("Complete Step 4 first.")),
    };

    let alternative = select_alternative(&followup.question, followup.target, rng);

    Ok(StepState {
        alternative_question: Some(alternative.to_string()),
        ..state.clone()
    })
}

/// Step 5: rate the follow-up and build the log row to append.
pub fn submit_feedback(
    state: &StepState,
    form: &FeedbackForm,
    now: DateTime<Utc>,
) -> Result<(StepState, LogRow), StepError> {
    require_consent(state)?;
    let (scenario, followup) = match (state.scenario, &state.followup) {
        (Some(s), Some(f)) if state.followup_done => (s, f),
        _ => return Err(StepError::NotReady("Complete Step 4 first.")),
    };

    require_rating("fairness_score", form.fairness_score)?;
    require_rating("relevance_score", form.relevance_score)?;
    require_rating("comfort_score", form.comfort_score)?;
    require_rating("trust_score", form.trust_score)?;

    let (unfair_comment, neutralized_question) = if form.flag_unfair {
        (
            form.unfair_comment.clone(),
            neutralize_question(&followup.question),
        )
    } else {
        (String::new(), String::new())
    };

    let row = LogRow {
        timestamp: now.to_rfc3339(),
        participant_id: state.participant_id.clone().unwrap_or_default(),
        scenario: scenario.name.to_string(),
        scenario_prompt_used: state.scenario_prompt.clone(),
        target_value: scenario.value.name().to_string(),
        resume_text: state.resume_text.clone(),
        answer_text: state.answer_text.clone(),
        followup_answer_text: state.followup_answer_text.clone(),
        followup_question: followup.question.clone(),
        reasoning_summary: followup.reasoning.clone(),
        resume_keywords: followup.resume_keywords.join(", "),
        answer_keywords: followup.answer_keywords.join(", "),
        value_tag: followup.target.name().to_string(),
        confidence: followup.confidence.as_str().to_string(),
        fairness_score: Some(form.fairness_score),
        relevance_score: Some(form.relevance_score),
        comfort_score: Some(form.comfort_score),
        trust_score: Some(form.trust_score),
        flag_unfair: form.flag_unfair,
        unfair_comment,
        alternative_question: state.alternative_question.clone().unwrap_or_default(),
        alternative_answer_text: form.alternative_answer_text.clone(),
        neutralized_question,
        accept_ai: form.accept_ai.as_str().to_string(),
        open_feedback: form.open_feedback.clone(),
    };

    let next = StepState {
        submitted: Some(row.clone()),
        ..state.clone()
    };
    Ok((next, row))
}
