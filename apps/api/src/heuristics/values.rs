//! Value scoring: a lookup-table word count that guesses which professional value
//! an answer speaks to.
//!
//! Known limitation: markers match as substrings of the lowercased text, so "team"
//! also hits inside "steamroller". The guess is informational only and never drives
//! question selection, so the false positives are tolerated rather than corrected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label reported when no marker word of any category is present.
pub const FALLBACK_LABEL: &str = "General Professionalism";

/// The professional values probed by the study, in table order.
/// Table order is the tie-break order for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Collaboration,
    Integrity,
    Ownership,
    #[serde(rename = "Customer Focus")]
    CustomerFocus,
    #[serde(rename = "Data Responsibility")]
    DataResponsibility,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Collaboration,
        Category::Integrity,
        Category::Ownership,
        Category::CustomerFocus,
        Category::DataResponsibility,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Collaboration => "Collaboration",
            Category::Integrity => "Integrity",
            Category::Ownership => "Ownership",
            Category::CustomerFocus => "Customer Focus",
            Category::DataResponsibility => "Data Responsibility",
        }
    }

    /// Marker words whose presence increments this category's score.
    pub fn markers(self) -> &'static [&'static str; 5] {
        match self {
            Category::Collaboration => &["team", "together", "support", "conflict", "help"],
            Category::Integrity => &["ethical", "honest", "truth", "responsible", "fair"],
            Category::Ownership => &["initiative", "led", "managed", "owned", "accountable"],
            Category::CustomerFocus => &["customer", "client", "user", "service", "needs"],
            Category::DataResponsibility => &["data", "privacy", "security", "accuracy", "bias"],
        }
    }

    /// Candidate follow-up questions for this category.
    pub fn followups(self) -> &'static [&'static str; 3] {
        match self {
            Category::Collaboration => &[
                "What role did you personally play in helping the team succeed?",
                "How did you handle disagreement or tension in the group?",
                "What did you learn about teamwork from that experience?",
            ],
            Category::Integrity => &[
                "What made that decision ethically difficult?",
                "How did you communicate your choice to others?",
                "Looking back, would you do anything differently?",
            ],
            Category::Ownership => &[
                "What motivated you to take initiative in that situation?",
                "How did you measure success for that project?",
                "What obstacles did you face and how did you handle them?",
            ],
            Category::CustomerFocus => &[
                "How did you identify what the customer or user actually needed?",
                "What change did you make and what was its impact?",
                "How did you gather feedback after your solution?",
            ],
            Category::DataResponsibility => &[
                "How did you make sure the data was accurate or handled safely?",
                "What risks did you consider when working with that data?",
                "How did your actions protect stakeholders or users?",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Label derived from score magnitude. Not a statistical measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// 0 → Low, 1–2 → Medium, ≥3 → High
    pub fn from_score(score: u32) -> Self {
        match score {
            0 => ConfidenceLevel::Low,
            1..=2 => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::High => "High",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category hit counts for one input text, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueScores {
    counts: [(Category, u32); 5],
}

impl ValueScores {
    pub fn get(&self, category: Category) -> u32 {
        self.counts
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Highest-scoring category; the earliest in table order wins ties.
    pub fn best(&self) -> (Category, u32) {
        let mut best = self.counts[0];
        for &(category, count) in &self.counts[1..] {
            if count > best.1 {
                best = (category, count);
            }
        }
        best
    }

    pub fn guess(&self) -> ValueGuess {
        let (category, score) = self.best();
        let confidence = ConfidenceLevel::from_score(score);
        ValueGuess {
            category: (score > 0).then_some(category),
            confidence,
        }
    }
}

/// The scorer's independent guess for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueGuess {
    /// `None` when nothing matched; reported as "General Professionalism".
    pub category: Option<Category>,
    pub confidence: ConfidenceLevel,
}

impl ValueGuess {
    pub fn label(&self) -> &'static str {
        self.category.map(Category::name).unwrap_or(FALLBACK_LABEL)
    }
}

/// Counts, for each category, how many distinct marker words occur anywhere in `text`.
pub fn score_values(text: &str) -> ValueScores {
    let lowered = text.to_lowercase();
    let counts = Category::ALL.map(|category| {
        let hits = category
            .markers()
            .iter()
            .filter(|marker| lowered.contains(*marker))
            .count() as u32;
        (category, hits)
    });
    ValueScores { counts }
}

/// Scores `text` and maps the winning count to a confidence label.
pub fn detect_value(text: &str) -> ValueGuess {
    score_values(text).guess()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_scores_zero_everywhere() {
        let scores = score_values("");
        for category in Category::ALL {
            assert_eq!(scores.get(category), 0);
        }
    }

    #[test]
    fn test_empty_text_falls_back_to_general_professionalism() {
        let guess = detect_value("");
        assert_eq!(guess.category, None);
        assert_eq!(guess.label(), "General Professionalism");
        assert_eq!(guess.confidence, ConfidenceLevel::Low);
    }

    #[test]
    fn test_single_marker_yields_medium() {
        let guess = detect_value("It was mostly about privacy.");
        assert_eq!(guess.category, Some(Category::DataResponsibility));
        assert_eq!(guess.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_ownership_beats_collaboration() {
        let text = "I led the team and was accountable for the outcome";
        let scores = score_values(text);
        assert_eq!(scores.get(Category::Ownership), 2);
        assert_eq!(scores.get(Category::Collaboration), 1);

        let guess = scores.guess();
        assert_eq!(guess.category, Some(Category::Ownership));
        assert_eq!(guess.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_three_distinct_markers_yield_high() {
        let guess = detect_value("I led the initiative and was accountable");
        assert_eq!(guess.category, Some(Category::Ownership));
        assert_eq!(guess.confidence, ConfidenceLevel::High);
    }

    #[test]
    fn test_repeated_marker_counts_once() {
        let scores = score_values("data data data DATA");
        assert_eq!(scores.get(Category::DataResponsibility), 1);
    }

    #[test]
    fn test_tie_goes_to_table_order() {
        // One Integrity hit, one Customer Focus hit.
        let scores = score_values("an honest client");
        assert_eq!(scores.get(Category::Integrity), 1);
        assert_eq!(scores.get(Category::CustomerFocus), 1);
        assert_eq!(scores.best().0, Category::Integrity);
    }

    #[test]
    fn test_substring_matching_is_preserved() {
        // "steamroller" contains "team"; kept as a known limitation.
        let scores = score_values("steamroller");
        assert_eq!(scores.get(Category::Collaboration), 1);
    }

    #[test]
    fn test_case_insensitive() {
        let guess = detect_value("CUSTOMER SERVICE");
        assert_eq!(guess.category, Some(Category::CustomerFocus));
        assert_eq!(guess.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_confidence_thresholds() {
        assert_eq!(ConfidenceLevel::from_score(0), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(1), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(2), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(3), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(5), ConfidenceLevel::High);
    }

    #[test]
    fn test_category_table_shape() {
        for category in Category::ALL {
            assert_eq!(category.markers().len(), 5);
            assert_eq!(category.followups().len(), 3);
        }
    }

    #[test]
    fn test_category_serde_uses_display_names() {
        let json = serde_json::to_string(&Category::CustomerFocus).unwrap();
        assert_eq!(json, r#""Customer Focus""#);
        let back: Category = serde_json::from_str(r#""Data Responsibility""#).unwrap();
        assert_eq!(back, Category::DataResponsibility);
    }
}
