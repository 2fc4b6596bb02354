use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::models::submission::LogRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioCount {
    pub scenario: String,
    pub count: usize,
}

/// Aggregate view of the log for researchers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogSummary {
    pub total_submissions: usize,
    /// Distinct non-blank participant ids.
    pub unique_participants: usize,
    /// Most frequent first; ties by scenario name.
    pub scenario_counts: Vec<ScenarioCount>,
}

pub fn summarize(rows: &[LogRow]) -> LogSummary {
    let unique_participants = rows
        .iter()
        .map(|r| r.participant_id.trim())
        .filter(|id| !id.is_empty())
        .collect::<HashSet<_>>()
        .len();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows.iter().filter(|r| !r.scenario.trim().is_empty()) {
        *counts.entry(row.scenario.as_str()).or_default() += 1;
    }
    let mut scenario_counts: Vec<ScenarioCount> = counts
        .into_iter()
        .map(|(scenario, count)| ScenarioCount {
            scenario: scenario.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps the BTreeMap's name order among equal counts.
    scenario_counts.sort_by(|a, b| b.count.cmp(&a.count));

    LogSummary {
        total_submissions: rows.len(),
        unique_participants,
        scenario_counts,
    }
}
