/// Clause prefixed to a question the participant flagged as unfair or uncomfortable.
pub const COMFORT_PREAMBLE: &str = "In any context you’re comfortable sharing, ";

/// Softens a question: comfort preamble plus the question with its first letter lowercased.
/// An empty question stays empty.
pub fn neutralize_question(question: &str) -> String {
    let mut chars = question.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let mut out = String::with_capacity(COMFORT_PREAMBLE.len() + question.len());
            out.push_str(COMFORT_PREAMBLE);
            out.extend(first.to_lowercase());
            out.push_str(chars.as_str());
            out
        }
    }
}
