use std::path::PathBuf;

use crate::api::{is_allowed_image, ComplaintClient};
use crate::models::NewComplaint;
use crate::priority::{detect_priority, is_previewable, Priority};
use crate::views::Notice;

pub struct FileComplaintView {
    client: ComplaintClient,
    pub form: NewComplaint,
    /// Live preview; only set once the description is long enough.
    pub priority: Option<Priority>,
    /// Category suggested by the backend for the attached image.
    pub category: Option<String>,
    pub submitting: bool,
    pub analyzing: bool,
    pub complaint_id: Option<String>,
    pub notice: Option<Notice>,
}

impl FileComplaintView {
    pub fn new(client: ComplaintClient) -> Self {
        Self {
            client,
            form: NewComplaint::default(),
            priority: None,
            category: None,
            submitting: false,
            analyzing: false,
            complaint_id: None,
            notice: None,
        }
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.form.description = text.into();
        self.priority = if is_previewable(&self.form.description) {
            Some(detect_priority(&self.form.description))
        } else {
            None
        };
    }

    pub fn set_location(&mut self, text: impl Into<String>) {
        self.form.location = text.into();
    }

    /// Pin a point; the location text follows the coordinates.
    pub fn set_coordinates(&mut self, lat: f64, lng: f64) {
        self.form.latitude = lat.to_string();
        self.form.longitude = lng.to_string();
        self.form.location = format!("{:.4}, {:.4}", lat, lng);
    }

    pub fn set_anonymous(&mut self, anonymous: bool) {
        self.form.anonymous = anonymous;
    }

    /// Attach an image and ask the backend for a category suggestion. An
    /// unreadable file is refused up front; a failed analysis keeps the image
    /// attached and leaves the category unset.
    pub async fn attach_image(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !is_allowed_image(&path) {
            self.notice = Some(Notice::Error("Please choose a PNG, JPG or GIF image".to_string()));
            return;
        }
        if self.analyzing {
            self.notice = Some(Notice::Error("An image is already being analyzed".to_string()));
            return;
        }
        if let Err(e) = tokio::fs::File::open(&path).await {
            tracing::warn!("Cannot read image {}: {}", path.display(), e);
            self.notice = Some(Notice::Error(format!("Cannot read image {}", path.display())));
            return;
        }

        self.notice = None;
        self.form.image = Some(path.clone());
        self.category = None;
        self.analyzing = true;
        match self.client.analyze_image(&path).await {
            Ok(category) => {
                tracing::info!(%category, "image analysed");
                self.category = Some(category);
            }
            Err(e) => tracing::warn!("Error analyzing image {}: {}", path.display(), e),
        }
        self.analyzing = false;
    }

    pub fn clear_image(&mut self) {
        self.form.image = None;
        self.category = None;
    }

    /// Submit the form. Returns the new complaint ID on success; on failure the
    /// form is kept as entered so the user can retry.
    pub async fn submit(&mut self) -> Option<String> {
        if self.submitting {
            self.notice = Some(Notice::Error("Submission already in progress".to_string()));
            return None;
        }
        if self.form.description.trim().is_empty() {
            self.notice = Some(Notice::Error("Please describe the issue".to_string()));
            return None;
        }

        self.submitting = true;
        self.notice = None;
        let result = self.client.create_complaint(&self.form).await;
        self.submitting = false;

        match result {
            Ok(created) => {
                tracing::info!(complaint_id = %created.complaint_id, "complaint submitted");
                self.notice = Some(Notice::Success(format!(
                    "Complaint submitted successfully! ID: {}",
                    created.complaint_id
                )));
                self.complaint_id = Some(created.complaint_id.clone());
                self.reset_form();
                Some(created.complaint_id)
            }
            Err(e) => {
                tracing::error!("Error submitting complaint: {}", e);
                self.notice = Some(Notice::Error("Error submitting complaint".to_string()));
                None
            }
        }
    }

    fn reset_form(&mut self) {
        self.form = NewComplaint::default();
        self.priority = None;
        self.category = None;
    }
}
