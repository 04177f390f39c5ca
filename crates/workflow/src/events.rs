//! Events broadcast by the scan workflow.
//!
//! Front ends subscribe to these instead of polling coordinator state.

use notesnap_core::scan::UploadResult;

/// Broadcast channel capacity for workflow events.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A state change in the scan workflow worth showing to the user.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// An upload attempt left validation and went to the network.
    UploadStarted {
        class_id: String,
        class_name: String,
    },

    /// The synthetic progress counter advanced.
    UploadProgress {
        /// Completion percentage (0-100).
        percent: u8,
    },

    /// The backend confirmed the conversion.
    UploadCompleted { result: UploadResult },

    /// The upload failed; the attempt may be retried.
    UploadFailed { error: String },
}
