//! Scenario catalog: the canned interview prompts a participant can pick from.

use serde::Serialize;

use crate::heuristics::values::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub name: &'static str,
    pub prompt: &'static str,
    pub value: Category,
}

pub static SCENARIOS: [Scenario; 5] = [
    Scenario {
        name: "Scenario 1 – Collaboration (Team Conflict)",
        prompt: "Tell me about a time you worked with a team to solve a difficult problem?",
        value: Category::Collaboration,
    },
    Scenario {
        name: "Scenario 2 – Integrity (Ethical Dilemma)",
        prompt: "Describe a situation where you had to choose the ethical option under pressure?",
        value: Category::Integrity,
    },
    Scenario {
        name: "Scenario 3 – Ownership (Taking Initiative)",
        prompt: "Tell me about a time you took initiative without being asked?",
        value: Category::Ownership,
    },
    Scenario {
        name: "Scenario 4 – Data Responsibility (Handling Sensitive Info)",
        prompt: "Describe a moment when you handled sensitive data or ensured data accuracy?",
        value: Category::DataResponsibility,
    },
    Scenario {
        name: "Scenario 5 – Customer Focus (User Impact)",
        prompt: "Tell me about a time you improved a customer or user experience?",
        value: Category::CustomerFocus,
    },
];

pub fn find_scenario(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.name == name)
}
