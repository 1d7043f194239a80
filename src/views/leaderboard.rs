use std::fmt;

use crate::api::ComplaintClient;
use crate::models::Department;
use crate::views::Notice;

const PODIUM_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Medal> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Medal::Gold => "🏆",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.icon())
    }
}

/// Order departments by resolved count, highest first. The sort is stable so
/// ties keep the backend's order.
pub fn rank(mut departments: Vec<Department>) -> Vec<Department> {
    departments.sort_by(|a, b| b.complaints_resolved.cmp(&a.complaints_resolved));
    departments
}

pub struct LeaderboardView {
    client: ComplaintClient,
    pub departments: Vec<Department>,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl LeaderboardView {
    pub fn new(client: ComplaintClient) -> Self {
        Self {
            client,
            departments: Vec::new(),
            loading: false,
            notice: None,
        }
    }

    pub async fn load(&mut self) {
        if self.loading {
            self.notice = Some(Notice::Error("The leaderboard is already loading".to_string()));
            return;
        }
        self.loading = true;
        match self.client.leaderboard().await {
            Ok(departments) => {
                self.departments = rank(departments);
                self.notice = None;
            }
            Err(e) => {
                tracing::error!("Error fetching leaderboard: {}", e);
                self.notice = Some(Notice::Error("Could not load the leaderboard".to_string()));
            }
        }
        self.loading = false;
    }

    /// (rank, medal, department), ranks starting at 1.
    pub fn entries(&self) -> impl Iterator<Item = (usize, Option<Medal>, &Department)> {
        self.departments
            .iter()
            .enumerate()
            .map(|(i, d)| (i + 1, Medal::for_rank(i + 1), d))
    }

    /// The top three, shown only when there are at least three departments.
    pub fn podium(&self) -> Option<&[Department]> {
        (self.departments.len() >= PODIUM_SIZE).then(|| &self.departments[..PODIUM_SIZE])
    }
}
