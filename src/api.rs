//! HTTP client for the complaint backend.
//!
//! Every endpoint answers with a JSON envelope `{"success": bool, ...}`. A
//! response is only accepted when `success` is true and the expected payload
//! key is present; anything else becomes an [`ApiError`] the caller can show.

use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::Config;
use crate::lifecycle::Status;
use crate::models::{Complaint, CreatedComplaint, Department, NewComplaint, Stats};

const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];
const MAX_ERROR_BODY: usize = 512;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{message}")]
    Backend { status: u16, message: String },
    #[error("response is missing `{0}`")]
    MissingPayload(&'static str),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Validation(String),
    #[error("cannot read image {path:?}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ComplaintClient {
    http: reqwest::Client,
    base_url: String,
}

impl ComplaintClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn complaint_url(&self, id: &str, suffix: &str) -> String {
        self.url(&format!("/complaints/{}{}", urlencoding::encode(id), suffix))
    }

    /// Rows the client cannot read (an unknown status, a null priority) are
    /// logged and skipped so the rest of the collection still loads.
    pub async fn list_complaints(&self) -> Result<Vec<Complaint>, ApiError> {
        let resp = self.http.get(self.url("/complaints")).send().await?;
        let rows: Vec<Value> = payload(resp, "complaints").await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.get("id").and_then(Value::as_str).unwrap_or("?").to_string();
                match serde_json::from_value::<Complaint>(row) {
                    Ok(complaint) => Some(complaint),
                    Err(e) => {
                        tracing::warn!(complaint_id = %id, "skipping unreadable complaint: {}", e);
                        None
                    }
                }
            })
            .collect())
    }

    pub async fn get_complaint(&self, id: &str) -> Result<Complaint, ApiError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ApiError::Validation("complaint ID is required".to_string()));
        }
        let resp = self.http.get(self.complaint_url(id, "")).send().await?;
        payload(resp, "complaint").await
    }

    pub async fn create_complaint(&self, complaint: &NewComplaint) -> Result<CreatedComplaint, ApiError> {
        if complaint.description.trim().is_empty() {
            return Err(ApiError::Validation("description is required".to_string()));
        }

        let mut form = Form::new()
            .text("description", complaint.description.clone())
            .text("location", complaint.location.clone())
            .text("latitude", complaint.latitude.clone())
            .text("longitude", complaint.longitude.clone())
            .text("anonymous", complaint.anonymous.to_string());
        if let Some(path) = &complaint.image {
            form = form.part("image", image_part(path).await?);
        }

        let resp = self.http.post(self.url("/complaints")).multipart(form).send().await?;
        let envelope = envelope(resp).await?;
        if envelope.get("complaint_id").map_or(true, Value::is_null) {
            return Err(ApiError::MissingPayload("complaint_id"));
        }
        Ok(serde_json::from_value(envelope)?)
    }

    pub async fn update_status(&self, id: &str, status: Status) -> Result<(), ApiError> {
        let resp = self
            .http
            .put(self.complaint_url(id, "/status"))
            .json(&json!({ "status": status }))
            .send()
            .await?;
        envelope(resp).await?;
        Ok(())
    }

    pub async fn leaderboard(&self) -> Result<Vec<Department>, ApiError> {
        let resp = self.http.get(self.url("/leaderboard")).send().await?;
        payload(resp, "departments").await
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        let resp = self.http.get(self.url("/stats")).send().await?;
        payload(resp, "stats").await
    }

    /// Ask the backend classifier for a category suggestion.
    pub async fn analyze_image(&self, path: &Path) -> Result<String, ApiError> {
        let form = Form::new().part("image", image_part(path).await?);
        let resp = self.http.post(self.url("/analyze-image")).multipart(form).send().await?;
        payload(resp, "category").await
    }
}

pub fn is_allowed_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn image_mime(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase()).as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

async fn image_part(path: &Path) -> Result<Part, ApiError> {
    if !is_allowed_image(path) {
        return Err(ApiError::Validation(format!(
            "unsupported image type: {} (allowed: {})",
            path.display(),
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        )));
    }
    let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes).file_name(file_name).mime_str(image_mime(path))?)
}

/// Read the body as an envelope and check its `success` flag.
async fn envelope(resp: Response) -> Result<Value, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;

    let value: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) if status.is_success() => return Err(ApiError::Decode(e)),
        Err(_) => {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            })
        }
    };

    if value.get("success").and_then(Value::as_bool) != Some(true) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("request was not successful (HTTP {})", status.as_u16()));
        tracing::debug!(status = status.as_u16(), %message, "backend reported failure");
        return Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        });
    }
    Ok(value)
}

async fn payload<T: DeserializeOwned>(resp: Response, key: &'static str) -> Result<T, ApiError> {
    let mut value = envelope(resp).await?;
    match value.get_mut(key).map(Value::take) {
        Some(Value::Null) | None => Err(ApiError::MissingPayload(key)),
        Some(inner) => Ok(serde_json::from_value(inner)?),
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() > MAX_ERROR_BODY {
        format!("{}...", s.chars().take(MAX_ERROR_BODY).collect::<String>())
    } else {
        s.to_string()
    }
}
