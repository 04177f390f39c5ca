//! Capture controller and camera seam.
//!
//! The controller gates capture on camera permission and translates
//! shutter failures into the two user-facing messages the screens show.
//! Requesting permission is the caller's job; an ungranted camera is
//! simply "not ready".  The production [`FileCamera`] stages a photo
//! from disk -- in a terminal the filesystem is the camera.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use notesnap_core::capture::{CapturedImage, PermissionState};

/// Capture failures, worded the way the screens display them.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The camera is not available (includes ungranted permission).
    #[error("Camera not ready yet.")]
    NotReady,

    /// The shutter fired but no usable photo came back.
    #[error("Capture failed: {0}")]
    Failed(String),
}

/// Something that can produce a photo on demand.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Whether the source could capture right now.
    fn is_ready(&self) -> bool;

    /// Take a photo, allocating a local image resource.  No network.
    async fn capture(&self) -> Result<CapturedImage, CaptureError>;
}

/// Drives a [`CaptureSource`] behind a permission gate.
pub struct CaptureController {
    source: Arc<dyn CaptureSource>,
    permission: PermissionState,
}

impl CaptureController {
    /// A controller with no permission observed yet.
    pub fn new(source: Arc<dyn CaptureSource>) -> Self {
        Self {
            source,
            permission: PermissionState::Undetermined,
        }
    }

    /// Record the outcome of a permission request made by the caller.
    pub fn set_permission(&mut self, permission: PermissionState) {
        self.permission = permission;
    }

    /// Last observed permission state.
    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    /// Capture a photo.
    ///
    /// Refuses with [`CaptureError::NotReady`] unless permission was
    /// granted and the source reports ready.
    pub async fn capture(&self) -> Result<CapturedImage, CaptureError> {
        if !self.permission.allows_capture() {
            tracing::debug!(permission = ?self.permission, "Capture refused: permission not granted");
            return Err(CaptureError::NotReady);
        }
        if !self.source.is_ready() {
            return Err(CaptureError::NotReady);
        }
        self.source.capture().await
    }
}

/// A "camera" that stages an existing image file.
pub struct FileCamera {
    path: PathBuf,
}

impl FileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CaptureSource for FileCamera {
    fn is_ready(&self) -> bool {
        self.path.is_file()
    }

    async fn capture(&self) -> Result<CapturedImage, CaptureError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) if meta.is_file() && meta.len() > 0 => {
                Ok(CapturedImage::new(self.path.clone()))
            }
            Ok(_) => Err(CaptureError::Failed(format!(
                "{} is empty or not a regular file",
                self.path.display()
            ))),
            Err(e) => Err(CaptureError::Failed(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    struct AlwaysReady;

    #[async_trait]
    impl CaptureSource for AlwaysReady {
        fn is_ready(&self) -> bool {
            true
        }

        async fn capture(&self) -> Result<CapturedImage, CaptureError> {
            Ok(CapturedImage::new("/tmp/fake.jpg"))
        }
    }

    #[tokio::test]
    async fn capture_is_refused_without_permission() {
        let controller = CaptureController::new(Arc::new(AlwaysReady));
        assert_matches!(controller.capture().await, Err(CaptureError::NotReady));
    }

    #[tokio::test]
    async fn capture_is_refused_after_denial() {
        let mut controller = CaptureController::new(Arc::new(AlwaysReady));
        controller.set_permission(PermissionState::Denied);
        assert_matches!(controller.capture().await, Err(CaptureError::NotReady));
    }

    #[tokio::test]
    async fn granted_permission_allows_capture() {
        let mut controller = CaptureController::new(Arc::new(AlwaysReady));
        controller.set_permission(PermissionState::Granted);
        let image = controller.capture().await.unwrap();
        assert!(image.upload_filename().starts_with("note-"));
    }

    #[tokio::test]
    async fn file_camera_fails_on_missing_file() {
        let mut controller =
            CaptureController::new(Arc::new(FileCamera::new("/nonexistent/shot.jpg")));
        controller.set_permission(PermissionState::Granted);
        // Missing file: the source is simply not ready.
        assert_matches!(controller.capture().await, Err(CaptureError::NotReady));
    }
}
