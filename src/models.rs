use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::lifecycle::Status;
use crate::priority::Priority;

pub const UNCATEGORIZED: &str = "Uncategorized";
const EXCERPT_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    pub priority: Priority,
    pub status: Status,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    pub anonymous: bool,
    #[serde(default)]
    pub image_path: Option<String>,
    /// Creation time as sent by the backend; see [`Complaint::created_at`].
    pub timestamp: String,
    #[serde(default)]
    pub resolved_at: Option<String>,
}

impl Complaint {
    pub fn category_label(&self) -> &str {
        self.category.as_deref().filter(|c| !c.is_empty()).unwrap_or(UNCATEGORIZED)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }

    pub fn excerpt(&self) -> String {
        excerpt(&self.description, EXCERPT_CHARS)
    }

    pub fn department(&self) -> &'static str {
        department_for_category(self.category_label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    #[serde(default)]
    pub total_complaints: u32,
    #[serde(default)]
    pub complaints_resolved: u32,
    #[serde(default)]
    pub resolution_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: u32,
    pub submitted: u32,
    pub in_progress: u32,
    pub resolved: u32,
}

/// Form payload for a new complaint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewComplaint {
    pub description: String,
    pub location: String,
    pub latitude: String,
    pub longitude: String,
    pub anonymous: bool,
    pub image: Option<std::path::PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedComplaint {
    pub complaint_id: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Maps a complaint category to the department responsible for it.
pub fn department_for_category(category: &str) -> &'static str {
    match category {
        "Pothole" | "Road Damage" => "Roads and Infrastructure",
        "Garbage" | "Waste" => "Sanitation and Waste Management",
        "Streetlight" | "Lighting" => "Street Lighting",
        "Water" => "Water Supply",
        "Drainage" => "Drainage and Sewerage",
        "Health" => "Public Health",
        _ => "Roads and Infrastructure",
    }
}

pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Best-effort parse of the timestamp formats the backend emits.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%a, %d %b %Y %H:%M:%S GMT"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

// SQLite-backed servers send booleans as 0/1.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
        Null(()),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
        Flag::Text(s) => matches!(s.to_lowercase().as_str(), "true" | "1" | "yes"),
        Flag::Null(()) => false,
    })
}
