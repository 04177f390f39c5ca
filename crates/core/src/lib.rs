//! Domain types and pure logic for the notesnap capture-to-PDF client.
//!
//! Everything in this crate is I/O-free: wire models for the backend,
//! the per-attempt scan state machine, synthetic upload progress math,
//! debounced-search sequencing, and the session lifecycle.  The async
//! coordinators live in `notesnap-workflow`; HTTP in `notesnap-client`.

pub mod capture;
pub mod class;
pub mod emoji;
pub mod error;
pub mod note;
pub mod profile;
pub mod progress;
pub mod scan;
pub mod search;
pub mod session;

pub use error::CoreError;
