use crate::api::ComplaintClient;
use crate::lifecycle::{allowed_actions, transition, Action, LifecycleError, Status};
use crate::models::{Complaint, Stats};
use crate::priority::Priority;
use crate::views::{Confirm, Notice};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminFilters {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub search: String,
}

impl AdminFilters {
    pub fn matches(&self, complaint: &Complaint) -> bool {
        if self.status.is_some_and(|s| s != complaint.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != complaint.priority) {
            return false;
        }
        let search = self.search.trim().to_lowercase();
        search.is_empty()
            || complaint.id.to_lowercase().contains(&search)
            || complaint.description.to_lowercase().contains(&search)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied(Status),
    Declined,
    Rejected(LifecycleError),
    NotFound,
    Busy,
    Failed,
}

pub struct AdminView {
    client: ComplaintClient,
    pub complaints: Vec<Complaint>,
    pub stats: Stats,
    pub filters: AdminFilters,
    pub loading: bool,
    /// ID of the complaint whose status update is in flight.
    pub updating: Option<String>,
    pub selected: Option<String>,
    pub notice: Option<Notice>,
}

impl AdminView {
    pub fn new(client: ComplaintClient) -> Self {
        Self {
            client,
            complaints: Vec::new(),
            stats: Stats::default(),
            filters: AdminFilters::default(),
            loading: false,
            updating: None,
            selected: None,
            notice: None,
        }
    }

    /// Reload the complaint collection and the counters. They go stale
    /// together, so they are always fetched as a pair.
    pub async fn refresh(&mut self) {
        if self.loading {
            self.notice = Some(Notice::Error("Complaints are already loading".to_string()));
            return;
        }
        self.loading = true;
        let (complaints, stats) = tokio::join!(self.client.list_complaints(), self.client.stats());
        match complaints {
            Ok(list) => {
                self.complaints = list;
                if self.notice.as_ref().is_some_and(Notice::is_error) {
                    self.notice = None;
                }
            }
            Err(e) => {
                tracing::error!("Error fetching complaints: {}", e);
                self.notice = Some(Notice::Error("Could not load complaints".to_string()));
            }
        }
        match stats {
            Ok(s) => self.stats = s,
            Err(e) => tracing::error!("Error fetching stats: {}", e),
        }
        self.loading = false;
    }

    pub fn set_filters(&mut self, filters: AdminFilters) {
        self.filters = filters;
    }

    pub fn clear_filters(&mut self) {
        self.filters = AdminFilters::default();
    }

    pub fn filtered(&self) -> Vec<&Complaint> {
        self.complaints.iter().filter(|c| self.filters.matches(c)).collect()
    }

    pub fn find(&self, id: &str) -> Option<&Complaint> {
        self.complaints.iter().find(|c| c.id == id)
    }

    pub fn actions_for(&self, complaint: &Complaint) -> &'static [Action] {
        allowed_actions(complaint.status)
    }

    pub fn select(&mut self, id: &str) -> Option<&Complaint> {
        self.selected = self.find(id).map(|c| c.id.clone());
        self.selected_complaint()
    }

    pub fn selected_complaint(&self) -> Option<&Complaint> {
        self.selected.as_deref().and_then(|id| self.find(id))
    }

    /// Apply `action` to a loaded complaint after human confirmation.
    ///
    /// Illegal actions are refused before anything is sent. On success the
    /// collection and counters are refetched; on failure the loaded state is
    /// left as it was.
    pub async fn request_transition<C: Confirm>(
        &mut self,
        id: &str,
        action: Action,
        confirmer: &mut C,
    ) -> TransitionOutcome {
        if self.updating.is_some() {
            self.notice = Some(Notice::Error("Another status update is in progress".to_string()));
            return TransitionOutcome::Busy;
        }
        let Some(current) = self.find(id).map(|c| c.status) else {
            self.notice = Some(Notice::Error(format!("Complaint {} not found", id)));
            return TransitionOutcome::NotFound;
        };

        let target = match transition(current, action) {
            Ok(target) => target,
            Err(e) => {
                self.notice = Some(Notice::Error(e.to_string()));
                return TransitionOutcome::Rejected(e);
            }
        };

        if !confirmer.confirm(&format!("Mark this complaint as \"{}\"?", target)) {
            return TransitionOutcome::Declined;
        }

        self.updating = Some(id.to_string());
        let result = self.client.update_status(id, target).await;
        self.updating = None;

        match result {
            Ok(()) => {
                tracing::info!(complaint_id = id, from = %current, to = %target, "status updated");
                self.notice = Some(Notice::Success("Status updated successfully!".to_string()));
                self.refresh().await;
                TransitionOutcome::Applied(target)
            }
            Err(e) => {
                tracing::error!(complaint_id = id, "Error updating status: {}", e);
                self.notice = Some(Notice::Error("Error updating status".to_string()));
                TransitionOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complaint(id: &str, description: &str, status: &str, priority: &str) -> Complaint {
        serde_json::from_value(json!({
            "id": id,
            "description": description,
            "category": "Pothole",
            "priority": priority,
            "status": status,
            "timestamp": "2025-10-20 09:15:42",
            "anonymous": false
        }))
        .unwrap()
    }

    fn loaded() -> Vec<Complaint> {
        vec![
            complaint("CMP202510200001", "Huge pothole, dangerous", "Submitted", "High"),
            complaint("CMP202510200002", "Garbage not collected", "In Progress", "Low"),
            complaint("CMP202510200003", "Streetlight needs repair", "Resolved", "Medium"),
            complaint("CMP202510200004", "Broken POTHOLE cover", "In Progress", "High"),
        ]
    }

    #[test]
    fn test_filters_combine() {
        let items = loaded();
        let f = AdminFilters {
            status: Some(Status::InProgress),
            priority: Some(Priority::High),
            search: String::new(),
        };
        let hits: Vec<&str> = items.iter().filter(|c| f.matches(c)).map(|c| c.id.as_str()).collect();
        assert_eq!(hits, vec!["CMP202510200004"]);
    }

    #[test]
    fn test_search_id_and_description_case_insensitive() {
        let items = loaded();
        let f = AdminFilters {
            search: "pothole".to_string(),
            ..AdminFilters::default()
        };
        assert_eq!(items.iter().filter(|c| f.matches(c)).count(), 2);

        let f = AdminFilters {
            search: "cmp202510200003".to_string(),
            ..AdminFilters::default()
        };
        assert_eq!(items.iter().filter(|c| f.matches(c)).count(), 1);
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let items = loaded();
        assert!(items.iter().all(|c| AdminFilters::default().matches(c)));
    }
}
