use crate::api::{ApiError, ComplaintClient};
use crate::models::Complaint;
use crate::views::Notice;

const LOOKUP_FAILED: &str = "Complaint not found. Please check the ID and try again.";

pub struct TrackView {
    client: ComplaintClient,
    pub complaint: Option<Complaint>,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl TrackView {
    pub fn new(client: ComplaintClient) -> Self {
        Self {
            client,
            complaint: None,
            loading: false,
            notice: None,
        }
    }

    /// Look a complaint up by ID. Any non-2xx answer, including a 404, gets
    /// the generic lookup message; only a 2xx `success=false` shows the
    /// backend's own text.
    pub async fn search(&mut self, id: &str) -> Option<&Complaint> {
        let id = id.trim();
        if id.is_empty() {
            self.notice = Some(Notice::Error("Please enter a complaint ID".to_string()));
            return None;
        }
        if self.loading {
            self.notice = Some(Notice::Error("A search is already in progress".to_string()));
            return None;
        }

        self.loading = true;
        self.notice = None;
        self.complaint = None;
        let result = self.client.get_complaint(id).await;
        self.loading = false;

        match result {
            Ok(complaint) => {
                self.complaint = Some(complaint);
                self.complaint.as_ref()
            }
            Err(ApiError::Backend { status, message }) if (200..300).contains(&status) => {
                self.notice = Some(Notice::Error(message));
                None
            }
            Err(e) => {
                tracing::warn!(complaint_id = id, "lookup failed: {}", e);
                self.notice = Some(Notice::Error(LOOKUP_FAILED.to_string()));
                None
            }
        }
    }
}
