//! Error type for local (pre-network) failures.

/// Errors detected locally, before any request is issued.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    /// A required input was absent (missing photo, missing course, ...).
    #[error("{0}")]
    Precondition(&'static str),

    /// The scan state machine was asked to make an illegal transition.
    #[error("illegal transition: cannot {action} while {state}")]
    IllegalTransition {
        /// The operation that was attempted.
        action: &'static str,
        /// Human-readable description of the current state.
        state: &'static str,
    },
}

/// Precondition message for an upload attempt with no captured photo.
pub const ERR_NO_PHOTO: &str = "No photo to upload.";

/// Precondition message for an upload attempt with no course selected.
pub const ERR_NO_COURSE: &str = "Pick a course first.";
