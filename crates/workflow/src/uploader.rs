//! Upload coordinator: one scan attempt from shutter to artifact.
//!
//! Owns the per-attempt [`ScanState`] machine and drives the synthetic
//! progress ticker while the conversion request is outstanding.  The
//! ticker is a spawned task guarded so it is stopped on *every* exit
//! path -- success, failure, or early return.  Leaving the screen
//! cancels advisorily: the in-flight request is not aborted, but its
//! result is dropped instead of applied.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use notesnap_client::seams::ConversionApi;
use notesnap_client::ApiError;
use notesnap_core::capture::CapturedImage;
use notesnap_core::class::Class;
use notesnap_core::note::NoteCreate;
use notesnap_core::progress::{SyntheticProgress, PROGRESS_COMPLETE, PROGRESS_TICK};
use notesnap_core::scan::{ScanState, UploadResult};
use notesnap_core::CoreError;

use crate::events::{ScanEvent, EVENT_CHANNEL_CAPACITY};

/// Failures of one upload attempt.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Validation failed locally; no request was issued.
    #[error(transparent)]
    Precondition(#[from] CoreError),

    /// The conversion request failed (transport, status, or shape).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The screen was left while the request was in flight; the
    /// response was dropped unapplied.
    #[error("upload cancelled")]
    Cancelled,
}

/// Coordinator for one scan attempt.
///
/// Constructed per screen visit with the session's acting identity.
/// Not `Clone`: exactly one task drives an attempt, per the
/// no-concurrent-upload rule.
pub struct ScanAttempt {
    api: Arc<dyn ConversionApi>,
    acting_user: String,
    state: ScanState,
    last_error: Option<String>,
    progress_tx: watch::Sender<u8>,
    event_tx: broadcast::Sender<ScanEvent>,
    cancel: CancellationToken,
}

impl ScanAttempt {
    /// New idle attempt acting as `acting_user` (the session identity).
    pub fn new(api: Arc<dyn ConversionApi>, acting_user: impl Into<String>) -> Self {
        let (progress_tx, _) = watch::channel(0);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            acting_user: acting_user.into(),
            state: ScanState::Idle,
            last_error: None,
            progress_tx,
            event_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// Current attempt state.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Latest error message for this screen, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Watch the synthetic progress percentage.
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress_tx.subscribe()
    }

    /// Subscribe to workflow events.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.event_tx.subscribe()
    }

    /// Flag in-flight effects as cancelled (screen departure).  The
    /// underlying request keeps running; its result is ignored.
    pub fn leave_screen(&self) {
        self.cancel.cancel();
    }

    /// Handle for cancelling from outside the task driving the attempt.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Record a fresh capture, beginning a new attempt.
    pub fn capture(&mut self, image: CapturedImage) {
        self.last_error = None;
        let _ = self.progress_tx.send(0);
        self.state.capture(image);
    }

    /// Choose the upload target course.
    pub fn select_course(&mut self, course: Class) -> Result<(), CoreError> {
        self.state.select_course(course)
    }

    /// Discard the attempt and return to idle.
    pub fn retake(&mut self) {
        self.last_error = None;
        let _ = self.progress_tx.send(0);
        self.state.retake();
    }

    /// Upload the captured photo to the selected course.
    ///
    /// Validation failures return before any request is built.  On
    /// success the progress snaps to 100, the result is stored on the
    /// state machine, and the note is registered on the class
    /// best-effort (a registration failure is logged, not surfaced --
    /// the PDF already exists).
    pub async fn upload(&mut self) -> Result<UploadResult, UploadError> {
        if let Err(e) = self.state.begin_upload() {
            self.last_error = Some(e.to_string());
            return Err(UploadError::Precondition(e));
        }
        self.last_error = None;

        let ScanState::Uploading { image, course } = &self.state else {
            unreachable!("begin_upload always leaves the machine uploading");
        };
        let (image, course) = (image.clone(), course.clone());

        tracing::info!(
            class_id = %course.id,
            class_name = %course.name,
            filename = %image.upload_filename(),
            "Starting upload",
        );
        let _ = self.event_tx.send(ScanEvent::UploadStarted {
            class_id: course.id.clone(),
            class_name: course.name.clone(),
        });

        let ticker = self.start_ticker();
        let outcome = self.api.upload_to_pdf(&image).await;

        if self.cancel.is_cancelled() {
            ticker.stop().await;
            tracing::debug!("Upload resolved after screen departure; dropping result");
            return Err(UploadError::Cancelled);
        }

        match outcome {
            Ok(result) => {
                ticker.stop().await;
                let _ = self.progress_tx.send(PROGRESS_COMPLETE);
                let _ = self.event_tx.send(ScanEvent::UploadProgress {
                    percent: PROGRESS_COMPLETE,
                });
                if let Err(e) = self.state.succeed(result.clone()) {
                    tracing::error!(error = %e, "Failed to record upload success");
                }
                let _ = self.event_tx.send(ScanEvent::UploadCompleted {
                    result: result.clone(),
                });
                self.register_note(&course, &result).await;
                Ok(result)
            }
            Err(e) => {
                ticker.stop().await;
                let message = e.display_message();
                tracing::warn!(error = %message, "Upload failed");
                if let Err(e) = self.state.fail(message.clone()) {
                    tracing::error!(error = %e, "Failed to record upload failure");
                }
                self.last_error = Some(message.clone());
                let _ = self.event_tx.send(ScanEvent::UploadFailed { error: message });
                Err(UploadError::Api(e))
            }
        }
    }

    /// Register the converted artifact as a note on the class.
    async fn register_note(&self, course: &Class, result: &UploadResult) {
        let note = NoteCreate {
            image_url: result.image_url.clone(),
            pdf_url: result.pdf_url.clone(),
            uploaded_by: self.acting_user.clone(),
            summary: None,
        };
        match self.api.register_note(&course.id, &note).await {
            Ok(created) => {
                tracing::info!(note_id = %created.id, class_id = %course.id, "Note registered");
            }
            Err(e) => {
                // The PDF exists either way; don't fail the upload over this.
                tracing::warn!(class_id = %course.id, error = %e, "Note registration failed");
            }
        }
    }

    /// Spawn the synthetic progress ticker: 0 toward the ceiling in
    /// fixed steps on a fixed interval, never past the ceiling while
    /// the request is outstanding.
    fn start_ticker(&self) -> ProgressTicker {
        let progress_tx = self.progress_tx.clone();
        let event_tx = self.event_tx.clone();
        let _ = progress_tx.send(0);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(PROGRESS_TICK);
            // The first tick of a tokio interval fires immediately;
            // consume it so the first step lands after one period.
            interval.tick().await;

            let mut progress = SyntheticProgress::start();
            loop {
                interval.tick().await;
                let below_ceiling = progress.tick();
                let _ = progress_tx.send(progress.percent());
                let _ = event_tx.send(ScanEvent::UploadProgress {
                    percent: progress.percent(),
                });
                if !below_ceiling {
                    break;
                }
            }
        });

        ProgressTicker {
            handle: Some(handle),
        }
    }
}

/// Guard around the ticker task.
///
/// [`stop`](Self::stop) aborts and awaits the task so no further ticks
/// can land; `Drop` aborts as a backstop for early-return paths.
struct ProgressTicker {
    handle: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}
