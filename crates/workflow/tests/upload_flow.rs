//! Upload coordinator behavior against an in-memory conversion backend.
//!
//! Covers the validation-before-network rules, success and
//! malformed-response outcomes, retry after failure, retake semantics,
//! ticker cleanup, and advisory cancellation.  Time is virtual
//! (`start_paused`), so the synthetic ticker runs deterministically.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;

use notesnap_client::seams::ConversionApi;
use notesnap_client::ApiError;
use notesnap_core::capture::CapturedImage;
use notesnap_core::class::Class;
use notesnap_core::note::{Note, NoteCreate};
use notesnap_core::scan::{ScanState, UploadResult};
use notesnap_core::CoreError;
use notesnap_workflow::{ScanAttempt, ScanEvent, UploadError};

/// What the fake backend should do with the next upload.
#[derive(Clone)]
enum Script {
    Succeed,
    FailStatus(u16, &'static str),
    Malformed,
    /// Succeed, but only after this much (virtual) time.
    SucceedAfter(Duration),
}

struct FakeBackend {
    script: Script,
    uploads: AtomicUsize,
    notes: AtomicUsize,
}

impl FakeBackend {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            uploads: AtomicUsize::new(0),
            notes: AtomicUsize::new(0),
        })
    }

    fn upload_calls(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    fn note_calls(&self) -> usize {
        self.notes.load(Ordering::SeqCst)
    }

    fn result() -> UploadResult {
        UploadResult {
            image_url: "https://x/1.jpg".into(),
            pdf_url: "https://x/1.pdf".into(),
        }
    }
}

#[async_trait]
impl ConversionApi for FakeBackend {
    async fn upload_to_pdf(&self, _image: &CapturedImage) -> Result<UploadResult, ApiError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Succeed => Ok(Self::result()),
            Script::SucceedAfter(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Self::result())
            }
            Script::FailStatus(status, detail) => Err(ApiError::Status {
                status: *status,
                detail: (*detail).to_string(),
            }),
            Script::Malformed => Err(ApiError::Malformed("conversion response missing pdfUrl")),
        }
    }

    async fn register_note(&self, _class_id: &str, note: &NoteCreate) -> Result<Note, ApiError> {
        self.notes.fetch_add(1, Ordering::SeqCst);
        Ok(Note {
            id: "n1".into(),
            image_url: note.image_url.clone(),
            pdf_url: note.pdf_url.clone(),
            uploaded_by: note.uploaded_by.clone(),
            uploaded_at: None,
            summary: None,
        })
    }
}

fn image() -> CapturedImage {
    CapturedImage::new("/tmp/shot.jpg")
}

fn biology() -> Class {
    Class {
        id: "c-bio".into(),
        name: "Biology".into(),
        users: None,
        photos: None,
    }
}

// ---------------------------------------------------------------------------
// Validation before network
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn upload_without_photo_makes_no_network_call() {
    let backend = FakeBackend::new(Script::Succeed);
    let mut attempt = ScanAttempt::new(backend.clone(), "user_a");

    let err = attempt.upload().await.unwrap_err();
    assert_matches!(err, UploadError::Precondition(CoreError::Precondition(_)));
    assert_eq!(backend.upload_calls(), 0);
    assert_eq!(attempt.last_error(), Some("No photo to upload."));
}

#[tokio::test(start_paused = true)]
async fn upload_without_course_makes_no_network_call() {
    let backend = FakeBackend::new(Script::Succeed);
    let mut attempt = ScanAttempt::new(backend.clone(), "user_a");
    attempt.capture(image());

    let err = attempt.upload().await.unwrap_err();
    assert_matches!(err, UploadError::Precondition(CoreError::Precondition(_)));
    assert_eq!(backend.upload_calls(), 0);
    assert_eq!(attempt.last_error(), Some("Pick a course first."));
}

// ---------------------------------------------------------------------------
// Success
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn successful_upload_exposes_both_urls_and_reaches_100() {
    let backend = FakeBackend::new(Script::Succeed);
    let mut attempt = ScanAttempt::new(backend.clone(), "user_a");
    let progress = attempt.progress();

    attempt.capture(image());
    attempt.select_course(biology()).unwrap();
    let result = attempt.upload().await.unwrap();

    assert_eq!(result.image_url, "https://x/1.jpg");
    assert_eq!(result.pdf_url, "https://x/1.pdf");
    assert_eq!(*progress.borrow(), 100);
    assert_eq!(attempt.state().result(), Some(&result));
    assert_eq!(backend.upload_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn successful_upload_registers_the_note_on_the_class() {
    let backend = FakeBackend::new(Script::Succeed);
    let mut attempt = ScanAttempt::new(backend.clone(), "user_a");
    attempt.capture(image());
    attempt.select_course(biology()).unwrap();
    attempt.upload().await.unwrap();

    assert_eq!(backend.note_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn end_to_end_emits_completion_event_targeting_the_pdf() {
    let backend = FakeBackend::new(Script::Succeed);
    let mut attempt = ScanAttempt::new(backend, "user_a");
    let mut events = attempt.subscribe();

    attempt.capture(image());
    attempt.select_course(biology()).unwrap();
    attempt.upload().await.unwrap();

    let mut completed_pdf = None;
    while let Ok(event) = events.try_recv() {
        if let ScanEvent::UploadCompleted { result } = event {
            completed_pdf = Some(result.pdf_url);
        }
    }
    assert_eq!(completed_pdf.as_deref(), Some("https://x/1.pdf"));
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn malformed_response_fails_even_on_2xx() {
    let backend = FakeBackend::new(Script::Malformed);
    let mut attempt = ScanAttempt::new(backend, "user_a");
    attempt.capture(image());
    attempt.select_course(biology()).unwrap();

    let err = attempt.upload().await.unwrap_err();
    assert_matches!(err, UploadError::Api(ApiError::Malformed(_)));
    assert_matches!(attempt.state(), ScanState::Failed { .. });
}

#[tokio::test(start_paused = true)]
async fn server_error_surfaces_detail_and_allows_retry() {
    let backend = FakeBackend::new(Script::FailStatus(500, "conversion blew up"));
    let mut attempt = ScanAttempt::new(backend.clone(), "user_a");
    attempt.capture(image());
    attempt.select_course(biology()).unwrap();

    let err = attempt.upload().await.unwrap_err();
    assert_matches!(err, UploadError::Api(ApiError::Status { status: 500, .. }));
    assert!(attempt.last_error().unwrap().contains("conversion blew up"));

    // Retry without recapturing.
    assert!(attempt.state().can_upload());
    let _ = attempt.upload().await;
    assert_eq!(backend.upload_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_upload_does_not_register_a_note() {
    let backend = FakeBackend::new(Script::FailStatus(500, "nope"));
    let mut attempt = ScanAttempt::new(backend.clone(), "user_a");
    attempt.capture(image());
    attempt.select_course(biology()).unwrap();
    let _ = attempt.upload().await;

    assert_eq!(backend.note_calls(), 0);
}

// ---------------------------------------------------------------------------
// Synthetic progress
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn progress_holds_at_90_while_the_request_is_outstanding() {
    let backend = FakeBackend::new(Script::SucceedAfter(Duration::from_secs(10)));
    let mut attempt = ScanAttempt::new(backend, "user_a");
    let progress = attempt.progress();

    attempt.capture(image());
    attempt.select_course(biology()).unwrap();

    let task = tokio::spawn(async move {
        let result = attempt.upload().await;
        (attempt, result)
    });

    // Well past the ticker's 0->90 climb, but before the response.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(*progress.borrow(), 90);

    let (_, result) = task.await.unwrap();
    result.unwrap();
    assert_eq!(*progress.borrow(), 100);
}

#[tokio::test(start_paused = true)]
async fn ticker_is_stopped_after_failure() {
    let backend = FakeBackend::new(Script::FailStatus(500, "nope"));
    let mut attempt = ScanAttempt::new(backend, "user_a");
    let progress = attempt.progress();

    attempt.capture(image());
    attempt.select_course(biology()).unwrap();
    let _ = attempt.upload().await;

    let settled = *progress.borrow();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(*progress.borrow(), settled, "ticker kept running after failure");
}

// ---------------------------------------------------------------------------
// Retake & cancellation
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn retake_after_success_returns_to_idle_and_clears_result() {
    let backend = FakeBackend::new(Script::Succeed);
    let mut attempt = ScanAttempt::new(backend, "user_a");
    let progress = attempt.progress();

    attempt.capture(image());
    attempt.select_course(biology()).unwrap();
    attempt.upload().await.unwrap();

    attempt.retake();
    assert_matches!(attempt.state(), ScanState::Idle);
    assert!(attempt.state().result().is_none());
    assert_eq!(attempt.last_error(), None);
    assert_eq!(*progress.borrow(), 0);
}

#[tokio::test(start_paused = true)]
async fn leaving_the_screen_drops_the_result_of_an_in_flight_upload() {
    let backend = FakeBackend::new(Script::SucceedAfter(Duration::from_secs(3)));
    let mut attempt = ScanAttempt::new(backend.clone(), "user_a");
    let cancel = attempt.cancellation();
    let progress = attempt.progress();

    attempt.capture(image());
    attempt.select_course(biology()).unwrap();

    let task = tokio::spawn(async move {
        let result = attempt.upload().await;
        (attempt, result)
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    cancel.cancel();

    let (attempt, result) = task.await.unwrap();
    assert_matches!(result, Err(UploadError::Cancelled));
    // The request itself still ran; only its result was ignored.
    assert_eq!(backend.upload_calls(), 1);
    assert!(attempt.state().result().is_none());
    assert_eq!(backend.note_calls(), 0);

    // And the ticker is gone.
    let settled = *progress.borrow();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(*progress.borrow(), settled);
}
