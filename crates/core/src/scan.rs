//! Per-attempt scan state machine.
//!
//! `Idle -> Captured -> CourseSelected -> Uploading -> {Succeeded | Failed}`
//!
//! Retake returns to `Idle` from anywhere and drops the captured photo,
//! the selected course, and any prior result.  A failed upload keeps
//! both photo and course so the upload can be retried without
//! recapturing; a successful upload is terminal until retake.  Upload
//! is never legal while one is already in flight.

use serde::{Deserialize, Serialize};

use crate::capture::CapturedImage;
use crate::class::Class;
use crate::error::{CoreError, ERR_NO_COURSE, ERR_NO_PHOTO};

/// URLs returned by the conversion endpoint for one successful upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResult {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "pdfUrl")]
    pub pdf_url: String,
}

/// State of one scan attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    /// Nothing captured yet.
    Idle,
    /// A photo was captured; no course chosen.
    Captured { image: CapturedImage },
    /// Photo and target course ready; upload may start.
    CourseSelected { image: CapturedImage, course: Class },
    /// The upload request is outstanding.
    Uploading { image: CapturedImage, course: Class },
    /// The backend converted the photo.  Terminal until retake.
    Succeeded {
        image: CapturedImage,
        course: Class,
        result: UploadResult,
    },
    /// The upload failed; retry is allowed without recapturing.
    Failed {
        image: CapturedImage,
        course: Class,
        error: String,
    },
}

impl ScanState {
    /// Short state description used in transition errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Captured { .. } => "captured",
            Self::CourseSelected { .. } => "course selected",
            Self::Uploading { .. } => "uploading",
            Self::Succeeded { .. } => "upload complete",
            Self::Failed { .. } => "upload failed",
        }
    }

    /// A fresh capture.  Legal from any state: it begins a new attempt
    /// and invalidates whatever the previous one produced.
    pub fn capture(&mut self, image: CapturedImage) {
        *self = Self::Captured { image };
    }

    /// Choose (or change) the upload target course.
    ///
    /// Legal once a photo exists and no upload is in flight.  After a
    /// failure the course may be changed before retrying.
    pub fn select_course(&mut self, course: Class) -> Result<(), CoreError> {
        match std::mem::replace(self, Self::Idle) {
            Self::Captured { image }
            | Self::CourseSelected { image, .. }
            | Self::Failed { image, .. } => {
                *self = Self::CourseSelected { image, course };
                Ok(())
            }
            other => {
                let err = match &other {
                    Self::Idle => CoreError::Precondition(ERR_NO_PHOTO),
                    _ => CoreError::IllegalTransition {
                        action: "select a course",
                        state: other.describe(),
                    },
                };
                *self = other;
                Err(err)
            }
        }
    }

    /// Move into `Uploading`.
    ///
    /// Validation failures (no photo, no course) are precondition
    /// errors -- callers must not issue a network request for them.
    pub fn begin_upload(&mut self) -> Result<(), CoreError> {
        match std::mem::replace(self, Self::Idle) {
            Self::CourseSelected { image, course } | Self::Failed { image, course, .. } => {
                *self = Self::Uploading { image, course };
                Ok(())
            }
            other => {
                let err = match &other {
                    Self::Idle => CoreError::Precondition(ERR_NO_PHOTO),
                    Self::Captured { .. } => CoreError::Precondition(ERR_NO_COURSE),
                    _ => CoreError::IllegalTransition {
                        action: "start an upload",
                        state: other.describe(),
                    },
                };
                *self = other;
                Err(err)
            }
        }
    }

    /// Record a successful conversion.  Only legal while uploading.
    pub fn succeed(&mut self, result: UploadResult) -> Result<(), CoreError> {
        match std::mem::replace(self, Self::Idle) {
            Self::Uploading { image, course } => {
                *self = Self::Succeeded {
                    image,
                    course,
                    result,
                };
                Ok(())
            }
            other => {
                let err = CoreError::IllegalTransition {
                    action: "record success",
                    state: other.describe(),
                };
                *self = other;
                Err(err)
            }
        }
    }

    /// Record an upload failure.  Only legal while uploading.
    pub fn fail(&mut self, error: String) -> Result<(), CoreError> {
        match std::mem::replace(self, Self::Idle) {
            Self::Uploading { image, course } => {
                *self = Self::Failed {
                    image,
                    course,
                    error,
                };
                Ok(())
            }
            other => {
                let err = CoreError::IllegalTransition {
                    action: "record failure",
                    state: other.describe(),
                };
                *self = other;
                Err(err)
            }
        }
    }

    /// Discard the attempt entirely.
    pub fn retake(&mut self) {
        *self = Self::Idle;
    }

    /// Whether the upload action should be enabled.
    pub fn can_upload(&self) -> bool {
        matches!(self, Self::CourseSelected { .. } | Self::Failed { .. })
    }

    /// The upload result, if this attempt succeeded.
    pub fn result(&self) -> Option<&UploadResult> {
        match self {
            Self::Succeeded { result, .. } => Some(result),
            _ => None,
        }
    }

    /// The latest error message, if the attempt failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn image() -> CapturedImage {
        CapturedImage::new("/tmp/shot.jpg")
    }

    fn course(name: &str) -> Class {
        Class {
            id: "c1".into(),
            name: name.into(),
            users: None,
            photos: None,
        }
    }

    fn result() -> UploadResult {
        UploadResult {
            image_url: "https://x/1.jpg".into(),
            pdf_url: "https://x/1.pdf".into(),
        }
    }

    #[test]
    fn upload_from_idle_is_a_missing_photo_precondition() {
        let mut s = ScanState::Idle;
        assert_eq!(
            s.begin_upload(),
            Err(CoreError::Precondition(ERR_NO_PHOTO))
        );
        assert_eq!(s, ScanState::Idle);
    }

    #[test]
    fn upload_without_course_is_a_missing_course_precondition() {
        let mut s = ScanState::Idle;
        s.capture(image());
        assert_eq!(
            s.begin_upload(),
            Err(CoreError::Precondition(ERR_NO_COURSE))
        );
        assert_matches!(s, ScanState::Captured { .. });
    }

    #[test]
    fn happy_path_reaches_succeeded() {
        let mut s = ScanState::Idle;
        s.capture(image());
        s.select_course(course("Biology")).unwrap();
        s.begin_upload().unwrap();
        s.succeed(result()).unwrap();
        assert_eq!(s.result().unwrap().pdf_url, "https://x/1.pdf");
    }

    #[test]
    fn success_is_terminal_until_retake() {
        let mut s = ScanState::Idle;
        s.capture(image());
        s.select_course(course("Biology")).unwrap();
        s.begin_upload().unwrap();
        s.succeed(result()).unwrap();
        assert!(!s.can_upload());
        assert_matches!(
            s.begin_upload(),
            Err(CoreError::IllegalTransition { .. })
        );
    }

    #[test]
    fn failure_allows_retry_without_recapturing() {
        let mut s = ScanState::Idle;
        s.capture(image());
        s.select_course(course("Biology")).unwrap();
        s.begin_upload().unwrap();
        s.fail("Upload failed (500): boom".into()).unwrap();
        assert_eq!(s.error(), Some("Upload failed (500): boom"));
        assert!(s.can_upload());
        s.begin_upload().unwrap();
        assert_matches!(s, ScanState::Uploading { .. });
    }

    #[test]
    fn no_concurrent_upload_while_one_is_in_flight() {
        let mut s = ScanState::Idle;
        s.capture(image());
        s.select_course(course("Biology")).unwrap();
        s.begin_upload().unwrap();
        assert!(!s.can_upload());
        assert_matches!(
            s.begin_upload(),
            Err(CoreError::IllegalTransition { .. })
        );
    }

    #[test]
    fn retake_clears_everything_from_any_state() {
        let mut s = ScanState::Idle;
        s.capture(image());
        s.select_course(course("Biology")).unwrap();
        s.begin_upload().unwrap();
        s.succeed(result()).unwrap();
        s.retake();
        assert_eq!(s, ScanState::Idle);
        assert!(s.result().is_none());
        assert!(s.error().is_none());
    }

    #[test]
    fn new_capture_invalidates_prior_result() {
        let mut s = ScanState::Idle;
        s.capture(image());
        s.select_course(course("Biology")).unwrap();
        s.begin_upload().unwrap();
        s.succeed(result()).unwrap();
        s.capture(image());
        assert!(s.result().is_none());
        assert_matches!(s, ScanState::Captured { .. });
    }

    #[test]
    fn selecting_course_before_capture_is_rejected() {
        let mut s = ScanState::Idle;
        assert_eq!(
            s.select_course(course("Biology")),
            Err(CoreError::Precondition(ERR_NO_PHOTO))
        );
    }

    #[test]
    fn course_can_be_changed_after_failure() {
        let mut s = ScanState::Idle;
        s.capture(image());
        s.select_course(course("Biology")).unwrap();
        s.begin_upload().unwrap();
        s.fail("nope".into()).unwrap();
        s.select_course(course("Chemistry")).unwrap();
        assert_matches!(
            &s,
            ScanState::CourseSelected { course, .. } if course.name == "Chemistry"
        );
    }

    #[test]
    fn upload_result_uses_camel_case_on_the_wire() {
        let parsed: UploadResult =
            serde_json::from_str(r#"{"imageUrl":"https://x/1.jpg","pdfUrl":"https://x/1.pdf"}"#)
                .unwrap();
        assert_eq!(parsed, result());
    }
}
