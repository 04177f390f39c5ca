//! Trait seams over the REST surface.
//!
//! The workflow coordinators depend on these traits rather than on
//! [`NotesnapApi`] directly, so tests can substitute in-memory doubles
//! and assert, for example, that a failed precondition never produced a
//! network call.

use async_trait::async_trait;

use notesnap_core::capture::CapturedImage;
use notesnap_core::class::Class;
use notesnap_core::note::{Note, NoteCreate};
use notesnap_core::scan::UploadResult;

use crate::api::NotesnapApi;
use crate::error::ApiError;

/// The conversion backend as the upload coordinator sees it.
#[async_trait]
pub trait ConversionApi: Send + Sync {
    /// Submit a captured photo and receive the artifact URLs.
    async fn upload_to_pdf(&self, image: &CapturedImage) -> Result<UploadResult, ApiError>;

    /// Register a converted artifact as a note on a class.
    async fn register_note(&self, class_id: &str, note: &NoteCreate) -> Result<Note, ApiError>;
}

/// The class directory as the searcher and course cache see it.
#[async_trait]
pub trait ClassDirectory: Send + Sync {
    /// Classes the user belongs to.
    async fn list_classes(&self, user_id: &str) -> Result<Vec<Class>, ApiError>;

    /// Name-substring search across all classes.
    async fn search_classes(&self, name: &str) -> Result<Vec<Class>, ApiError>;

    /// Join a class.
    async fn join_class(&self, class_id: &str, user_id: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl ConversionApi for NotesnapApi {
    async fn upload_to_pdf(&self, image: &CapturedImage) -> Result<UploadResult, ApiError> {
        NotesnapApi::upload_to_pdf(self, image).await
    }

    async fn register_note(&self, class_id: &str, note: &NoteCreate) -> Result<Note, ApiError> {
        NotesnapApi::create_note(self, class_id, note).await
    }
}

#[async_trait]
impl ClassDirectory for NotesnapApi {
    async fn list_classes(&self, user_id: &str) -> Result<Vec<Class>, ApiError> {
        NotesnapApi::list_classes(self, user_id).await
    }

    async fn search_classes(&self, name: &str) -> Result<Vec<Class>, ApiError> {
        NotesnapApi::search_classes(self, name).await
    }

    async fn join_class(&self, class_id: &str, user_id: &str) -> Result<(), ApiError> {
        NotesnapApi::join_class(self, class_id, user_id).await
    }
}
