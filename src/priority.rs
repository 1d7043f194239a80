use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const HIGH_KEYWORDS: &[&str] = &["urgent", "emergency", "dangerous", "severe", "critical", "broken"];
const MEDIUM_KEYWORDS: &[&str] = &["repair", "fix", "problem", "issue"];

/// Descriptions at or below this many characters are too short to classify.
pub const PREVIEW_MIN_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(UnknownPriority(s.to_string())),
        }
    }
}

/// Keyword sets used to pick a priority tier. High always wins over Medium.
#[derive(Debug, Clone)]
pub struct PriorityRules {
    pub high: Vec<String>,
    pub medium: Vec<String>,
}

impl Default for PriorityRules {
    fn default() -> Self {
        Self {
            high: HIGH_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            medium: MEDIUM_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl PriorityRules {
    pub fn classify(&self, text: &str) -> Priority {
        let lower = text.to_lowercase();
        if self.high.iter().any(|k| lower.contains(k.as_str())) {
            Priority::High
        } else if self.medium.iter().any(|k| lower.contains(k.as_str())) {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

/// Classify a complaint description with the default keyword sets.
pub fn detect_priority(text: &str) -> Priority {
    PriorityRules::default().classify(text)
}

/// True once a description is long enough for a priority preview.
pub fn is_previewable(description: &str) -> bool {
    description.chars().count() > PREVIEW_MIN_CHARS
}
