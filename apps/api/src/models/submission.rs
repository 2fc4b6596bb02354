use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One submitted interview session, as stored in the log.
///
/// Field order is the column order of the CSV log. Every field is optional on
/// read: rows written before a column existed come back with its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogRow {
    pub timestamp: String,
    pub participant_id: String,
    pub scenario: String,
    pub scenario_prompt_used: String,
    pub target_value: String,
    pub resume_text: String,
    pub answer_text: String,
    pub followup_answer_text: String,
    pub followup_question: String,
    pub reasoning_summary: String,
    pub resume_keywords: String,
    pub answer_keywords: String,
    /// The scenario's target value (not the scorer's guess).
    pub value_tag: String,
    /// Confidence of the scorer's guess.
    pub confidence: String,
    #[serde(deserialize_with = "lenient_rating")]
    pub fairness_score: Option<u8>,
    #[serde(deserialize_with = "lenient_rating")]
    pub relevance_score: Option<u8>,
    #[serde(deserialize_with = "lenient_rating")]
    pub comfort_score: Option<u8>,
    #[serde(deserialize_with = "lenient_rating")]
    pub trust_score: Option<u8>,
    #[serde(deserialize_with = "lenient_flag")]
    pub flag_unfair: bool,
    pub unfair_comment: String,
    pub alternative_question: String,
    pub alternative_answer_text: String,
    pub neutralized_question: String,
    pub accept_ai: String,
    pub open_feedback: String,
}

/// A raw cell as older logs may hold it: pandas wrote `True` for flags and `4.0`
/// for ratings, and left blank cells for unanswered columns.
#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Blank → `None`; integral numbers (`4`, `4.0`, `"4.0"`) in `0..=255` → `Some`.
fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Option::<Cell>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Cell::Int(n)) => n as f64,
        Some(Cell::Float(f)) => f,
        Some(Cell::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .map_err(|_| D::Error::custom(format!("invalid rating '{text}'")))?
        }
        Some(Cell::Bool(b)) => return Err(D::Error::custom(format!("invalid rating '{b}'"))),
    };
    if number.fract() != 0.0 || !(0.0..=255.0).contains(&number) {
        return Err(D::Error::custom(format!("invalid rating '{number}'")));
    }
    Ok(Some(number as u8))
}

/// Blank → `false`; `true`/`false` in any case, plus `1`/`0` and `yes`/`no`.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Cell>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Cell::Bool(b)) => Ok(b),
        Some(Cell::Int(0)) => Ok(false),
        Some(Cell::Int(1)) => Ok(true),
        Some(Cell::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "0" | "no" => Ok(false),
            "true" | "1" | "yes" => Ok(true),
            other => Err(D::Error::custom(format!("invalid flag '{other}'"))),
        },
        Some(_) => Err(D::Error::custom("invalid flag")),
    }
}

/// Column names in the order they are written.
pub const LOG_COLUMNS: [&str; 25] = [
    "timestamp",
    "participant_id",
    "scenario",
    "scenario_prompt_used",
    "target_value",
    "resume_text",
    "answer_text",
    "followup_answer_text",
    "followup_question",
    "reasoning_summary",
    "resume_keywords",
    "answer_keywords",
    "value_tag",
    "confidence",
    "fairness_score",
    "relevance_score",
    "comfort_score",
    "trust_score",
    "flag_unfair",
    "unfair_comment",
    "alternative_question",
    "alternative_answer_text",
    "neutralized_question",
    "accept_ai",
    "open_feedback",
];
