//! Page view models. Each view owns its page-local state and exposes the
//! async operations its UI events trigger. Failures never escape a view as
//! errors: they land in `notice` and leave the view ready for another try.

pub mod admin;
pub mod file_complaint;
pub mod home;
pub mod leaderboard;
pub mod track;

pub use admin::{AdminFilters, AdminView, TransitionOutcome};
pub use file_complaint::FileComplaintView;
pub use home::HomeView;
pub use leaderboard::{LeaderboardView, Medal};
pub use track::TrackView;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Notice::Success(t) | Notice::Error(t) => t,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Human confirmation gate for state-changing actions.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}
