use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const OBSERVATION_MARKER: &str = "Observation:";
pub const FINAL_ANSWER_MARKER: &str = "Final Answer";

/// An `Action: name[input]` line pulled out of one round of reasoning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDirective {
    pub action: String,
    pub action_input: Option<String>,
}

fn action_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Action:\s*([A-Za-z0-9_]+)\[([^\]]*)\]").expect("action pattern is valid")
    })
}

/// Finds the first action in `reasoning`. Empty brackets yield no input.
pub fn parse_action(reasoning: &str) -> Option<ActionDirective> {
    let caps = action_pattern().captures(reasoning)?;
    let action = caps[1].trim().to_string();
    let input = caps[2].trim();
    Some(ActionDirective {
        action,
        action_input: (!input.is_empty()).then(|| input.to_string()),
    })
}

/// Drops anything from the first `Observation:` on, so a model that invents
/// its own tool result never gets it recorded.
pub fn trim_reasoning(raw: &str) -> String {
    match raw.find(OBSERVATION_MARKER) {
        Some(idx) => raw[..idx].trim().to_string(),
        None => raw.to_string(),
    }
}

pub fn has_final_answer(reasoning: &str) -> bool {
    reasoning.contains(FINAL_ANSWER_MARKER)
}
