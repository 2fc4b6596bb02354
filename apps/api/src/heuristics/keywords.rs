//! Keyword extraction: a lightweight, non-ML tokenizer shown back to participants.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of keywords surfaced per text.
pub const MAX_KEYWORDS: usize = 8;

/// Tokens of this length or shorter are discarded.
const MIN_LEN_EXCLUSIVE: usize = 3;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "to", "of", "in", "on", "for", "with", "my", "your", "our",
    "their", "you", "i", "we", "was", "were", "is", "are", "that", "this", "from", "have", "has",
    "had", "been", "at", "as", "by", "it", "itself",
];

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z']+").unwrap());

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Extracts up to 8 distinct keywords from `text`, in order of first appearance.
///
/// Tokens are maximal runs of ASCII letters and apostrophes in the lowercased text.
/// Stopwords and tokens of 3 characters or fewer are dropped. Empty input yields
/// an empty list.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();

    for token in WORD_RE.find_iter(&lowered).map(|m| m.as_str()) {
        if token.len() <= MIN_LEN_EXCLUSIVE || is_stopword(token) {
            continue;
        }
        if keywords.iter().any(|k| k == token) {
            continue;
        }
        keywords.push(token.to_string());
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
    }

    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_keywords() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   \n\t").is_empty());
    }

    #[test]
    fn test_short_words_and_stopwords_dropped() {
        let kws = extract_keywords("I was at the SQL team with their data");
        assert_eq!(kws, vec!["team".to_string(), "data".to_string()]);
    }

    #[test]
    fn test_order_of_first_appearance_and_dedup() {
        let kws = extract_keywords("Analytics, reporting; analytics again. Reporting!");
        assert_eq!(kws, vec!["analytics", "reporting", "again"]);
    }

    #[test]
    fn test_capped_at_eight() {
        let text = "alpha bravo charlie delta echoes foxtrot golfing hotel indigo juliet";
        let kws = extract_keywords(text);
        assert_eq!(kws.len(), MAX_KEYWORDS);
        assert_eq!(kws.last().map(String::as_str), Some("hotel"));
    }

    #[test]
    fn test_apostrophes_kept_inside_tokens() {
        let kws = extract_keywords("Team's deadline wasn't missed");
        assert_eq!(kws, vec!["team's", "deadline", "wasn't", "missed"]);
    }

    #[test]
    fn test_digits_and_punctuation_are_separators() {
        let kws = extract_keywords("power2bi dashboards-for-finance");
        assert_eq!(kws, vec!["power", "dashboards", "finance"]);
    }

    #[test]
    fn test_non_ascii_letters_split_tokens() {
        // É lowercases to a non-ASCII é, which ends the run.
        let kws = extract_keywords("CAFÉTERIA management");
        assert_eq!(kws, vec!["teria", "management"]);
    }

    #[test]
    fn test_output_invariants_hold() {
        let samples = [
            "I have experience in SQL, Power BI, and team-based analytics projects in finance and operations.",
            "We we we the the the and and",
            "itself itself itself something something",
            "Experienced in SQL and team analytics",
        ];
        for text in samples {
            let kws = extract_keywords(text);
            assert!(kws.len() <= MAX_KEYWORDS);
            for (i, kw) in kws.iter().enumerate() {
                assert!(kw.len() > 3, "'{kw}' is too short");
                assert!(!is_stopword(kw), "'{kw}' is a stopword");
                assert!(!kws[..i].contains(kw), "'{kw}' is duplicated");
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "Led the initiative and was accountable for customer data privacy";
        assert_eq!(extract_keywords(text), extract_keywords(text));
    }
}
