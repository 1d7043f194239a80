use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Submitted,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Start,
    Resolve,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot {action} a complaint that is {from}")]
    IllegalTransition { from: Status, action: Action },
    #[error("unknown status: {0}")]
    UnknownStatus(String),
}

/// Every legal step: (from, action, to). Anything absent is illegal.
pub const TRANSITIONS: &[(Status, Action, Status)] = &[
    (Status::Submitted, Action::Start, Status::InProgress),
    (Status::InProgress, Action::Resolve, Status::Resolved),
];

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Submitted => "Submitted",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
        }
    }

    pub fn is_terminal(&self) -> bool {
        allowed_actions(*self).is_empty()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "submitted" => Ok(Status::Submitted),
            "in progress" => Ok(Status::InProgress),
            "resolved" => Ok(Status::Resolved),
            _ => Err(LifecycleError::UnknownStatus(s.to_string())),
        }
    }
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Resolve => "resolve",
        }
    }

    /// The status this action moves a complaint into.
    pub fn target(&self) -> Status {
        match self {
            Action::Start => Status::InProgress,
            Action::Resolve => Status::Resolved,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions the UI may offer for a complaint in `status`.
pub fn allowed_actions(status: Status) -> &'static [Action] {
    match status {
        Status::Submitted => &[Action::Start],
        Status::InProgress => &[Action::Resolve],
        Status::Resolved => &[],
    }
}

pub fn transition(from: Status, action: Action) -> Result<Status, LifecycleError> {
    TRANSITIONS
        .iter()
        .find(|(f, a, _)| *f == from && *a == action)
        .map(|(_, _, to)| *to)
        .ok_or(LifecycleError::IllegalTransition { from, action })
}
