//! Note wire model: one converted artifact (image + PDF) on a class.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A note as returned by `GET /api/notes?class_id=`.
///
/// The backend stores notes per class and serves camelCase field names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "pdfUrl")]
    pub pdf_url: String,
    #[serde(rename = "uploadedBy")]
    pub uploaded_by: String,
    #[serde(rename = "uploadedAt", default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Payload for `POST /api/notes?class_id=`, registering an uploaded
/// artifact on a class.
#[derive(Debug, Clone, Serialize)]
pub struct NoteCreate {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "pdfUrl")]
    pub pdf_url: String,
    #[serde(rename = "uploadedBy")]
    pub uploaded_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Order notes newest-first for display.
///
/// The backend returns them in insertion order (oldest first); the
/// client has always shown the most recent note at the top.
pub fn newest_first(mut notes: Vec<Note>) -> Vec<Note> {
    notes.reverse();
    notes
}

/// Render an `uploadedAt` value for display.
///
/// The backend stores RFC 3339-ish strings.  Unparseable values are
/// passed through untouched rather than hidden.
pub fn format_uploaded_at(raw: &str) -> String {
    if let Ok(ts) = raw.parse::<DateTime<chrono::Utc>>() {
        return ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string();
    }
    // `datetime.utcnow().isoformat()` has no offset suffix.
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return naive.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}
