//! Typed REST client for the notesnap backend.
//!
//! One [`NotesnapApi`](api::NotesnapApi) per base URL, wrapping a shared
//! [`reqwest::Client`].  The conversion backend does the heavy lifting
//! (OCR, PDF rendering, storage); this crate only speaks its JSON and
//! multipart wire formats and maps failures into [`ApiError`](error::ApiError).

pub mod api;
pub mod config;
pub mod error;
pub mod seams;

pub use api::NotesnapApi;
pub use config::ClientConfig;
pub use error::ApiError;
