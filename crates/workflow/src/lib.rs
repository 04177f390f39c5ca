//! Async coordinators for the capture -> upload -> track -> resolve
//! workflow.
//!
//! Binds the pure state machines of `notesnap-core` to the REST seams
//! of `notesnap-client`: the capture controller, the upload coordinator
//! with its synthetic progress ticker, the debounced class searcher,
//! and the joined-course cache.  Everything runs as cooperative tokio
//! tasks; leaving a "screen" cancels its in-flight effects advisorily
//! (results are dropped, requests are not aborted).

pub mod capture;
pub mod courses;
pub mod events;
pub mod searcher;
pub mod uploader;

pub use capture::{CaptureController, CaptureError, CaptureSource, FileCamera};
pub use courses::CourseCache;
pub use events::ScanEvent;
pub use searcher::{ClassSearcher, SearchView};
pub use uploader::{ScanAttempt, UploadError};
