//! Exports: CSV re-export of the whole log and a readable single-session summary.
//! Pure format transforms over `LogRow`; no decision logic lives here.

use std::io::Write;

use crate::models::submission::{LogRow, LOG_COLUMNS};

const SUMMARY_TITLE: &str = "AI Interview Prototype – Session Summary";
const NOT_PROVIDED: &str = "(not provided)";
const NO_RESPONSE: &str = "(no response provided)";

/// Writes `rows` as CSV with a header row in schema order, even when empty.
pub fn write_csv<W: Write>(writer: W, rows: &[LogRow]) -> Result<W, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(LOG_COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}

pub fn export_csv(rows: &[LogRow]) -> Result<Vec<u8>, csv::Error> {
    write_csv(Vec::new(), rows)
}

fn kv(label: &str, value: &str) -> String {
    if value.is_empty() {
        format!("**{label}**")
    } else {
        format!("**{label}** {value}")
    }
}

fn or_not_provided(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// One line stays a paragraph; several non-blank lines become a numbered list.
fn numbered_response(text: &str) -> String {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    match lines.as_slice() {
        [] => NO_RESPONSE.to_string(),
        [single] => single.to_string(),
        many => many
            .iter()
            .enumerate()
            .map(|(i, l)| format!("{}. {l}", i + 1))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn rating(value: Option<u8>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Renders one submission as a Markdown document with section-labelled fields.
pub fn render_summary(row: &LogRow) -> String {
    let mut blocks: Vec<String> = vec![
        format!("# {SUMMARY_TITLE}"),
        kv("Timestamp:", &row.timestamp),
        kv("Participant ID:", &row.participant_id),
        kv("Scenario:", &row.scenario),
        kv("Target value:", &row.target_value),
        "## Inputs".to_string(),
        kv("Resume summary / text:", ""),
        or_not_provided(&row.resume_text),
        kv("Scenario Question:", ""),
        or_not_provided(&row.scenario_prompt_used),
        kv("Scenario answer:", ""),
        numbered_response(&row.answer_text),
        "## AI Follow-Up".to_string(),
        kv("Follow-up question:", row.followup_question.trim()),
        kv("Follow-up answer:", ""),
        numbered_response(&row.followup_answer_text),
        kv("Value tag:", &row.value_tag),
        kv("Confidence:", &row.confidence),
        kv("Reasoning summary:", ""),
        or_not_provided(&row.reasoning_summary),
        "## Fairness / Contestability".to_string(),
        kv("Flagged as unfair / uncomfortable:", yes_no(row.flag_unfair)),
    ];

    let neutral = row.neutralized_question.trim();
    if !neutral.is_empty() {
        blocks.push(kv("Softened rephrasing:", neutral));
    }

    blocks.push(kv("Optional: What felt unfair or uncomfortable?", ""));
    blocks.push(or_not_provided(&row.unfair_comment));

    let alternative = row.alternative_question.trim();
    if !alternative.is_empty() {
        blocks.push(kv("Optional: Alternative question:", alternative));
        blocks.push(kv("Alternative answer:", ""));
        blocks.push(numbered_response(&row.alternative_answer_text));
    }

    blocks.push("## Ratings and Feedback".to_string());
    blocks.push(kv("Fairness score:", &rating(row.fairness_score)));
    blocks.push(kv("Relevance score:", &rating(row.relevance_score)));
    blocks.push(kv("Comfort score:", &rating(row.comfort_score)));
    blocks.push(kv("Trust score:", &rating(row.trust_score)));
    blocks.push(kv("Accept AI:", &row.accept_ai));

    let feedback = row.open_feedback.trim();
    if !feedback.is_empty() {
        blocks.push(kv("Open feedback:", ""));
        blocks.push(feedback.to_string());
    }

    blocks.push(kv(
        "Notes:",
        "Open feedback and full texts (resume/answer) are saved in the CSV log.",
    ));

    let mut doc = blocks.join("\n\n");
    doc.push('\n');
    doc
}
