//! Captured photo resource and camera permission state.
//!
//! A [`CapturedImage`] is the local handle produced by the camera on
//! shutter press.  It owns no pixels itself -- just the path to the
//! staged file plus the synthetic filename and MIME type the backend
//! expects in the multipart upload.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// MIME type attached to every captured photo in the multipart body.
pub const CAPTURE_MIME: &str = "image/jpeg";

/// Multipart field name the conversion endpoint reads the photo from.
pub const UPLOAD_FIELD: &str = "file";

// ---------------------------------------------------------------------------
// Permission state
// ---------------------------------------------------------------------------

/// Camera permission as last observed by the caller.
///
/// The capture controller refuses to operate unless this is
/// [`PermissionState::Granted`]; requesting permission is the caller's
/// job, not the controller's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// Permission has not been requested yet.
    #[default]
    Undetermined,
    /// The user granted camera access.
    Granted,
    /// The user denied camera access.
    Denied,
}

impl PermissionState {
    /// Whether capture is allowed in this state.
    pub fn allows_capture(self) -> bool {
        matches!(self, Self::Granted)
    }
}

// ---------------------------------------------------------------------------
// CapturedImage
// ---------------------------------------------------------------------------

/// A photo captured locally and not yet (or no longer) uploaded.
///
/// At most one of these is in flight per scan attempt; a retake or a
/// fresh capture discards the previous one along with any upload result
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// Stable local identity for this capture.
    pub id: Uuid,
    /// Path to the staged image file on disk.
    pub path: PathBuf,
    /// When the shutter fired.
    pub captured_at: DateTime<Utc>,
}

impl CapturedImage {
    /// Wrap a staged file as a capture taken right now.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::at(path, Utc::now())
    }

    /// Wrap a staged file with an explicit capture time.
    pub fn at(path: impl Into<PathBuf>, captured_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            captured_at,
        }
    }

    /// Synthetic filename sent to the backend: `note-<unix_millis>.jpg`.
    pub fn upload_filename(&self) -> String {
        format!("note-{}.jpg", self.captured_at.timestamp_millis())
    }

    /// Path to the staged file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn upload_filename_derives_from_capture_time() {
        let ts = Utc.with_ymd_and_hms(2026, 2, 7, 18, 0, 0).unwrap();
        let image = CapturedImage::at("/tmp/shot.jpg", ts);
        assert_eq!(
            image.upload_filename(),
            format!("note-{}.jpg", ts.timestamp_millis())
        );
    }

    #[test]
    fn two_captures_of_same_path_are_distinct() {
        let a = CapturedImage::new("/tmp/shot.jpg");
        let b = CapturedImage::new("/tmp/shot.jpg");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn only_granted_permission_allows_capture() {
        assert!(PermissionState::Granted.allows_capture());
        assert!(!PermissionState::Denied.allows_capture());
        assert!(!PermissionState::Undetermined.allows_capture());
    }
}
