// Heuristic follow-up pipeline
// Implements: keyword extraction, value scoring, follow-up selection, reasoning, neutralizing.
// Everything here is pure; the only randomness comes in through `RandomSource`.

pub mod followup;
pub mod keywords;
pub mod neutralize;
pub mod reasoning;
pub mod scenarios;
pub mod values;
