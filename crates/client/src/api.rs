//! REST methods against the notesnap backend.
//!
//! Wraps every endpoint the client consumes: class listing/search/join,
//! the multipart photo-to-PDF conversion, note listing/registration,
//! auth, and PDF summarization.  All methods return [`ApiError`] and
//! surface the server's `detail` text for non-2xx responses.

use reqwest::multipart;
use validator::Validate;

use notesnap_core::capture::{CapturedImage, CAPTURE_MIME, UPLOAD_FIELD};
use notesnap_core::class::{Class, ClassCreate};
use notesnap_core::note::{Note, NoteCreate};
use notesnap_core::profile::{LoginRequest, ProfileResponse, ProfileUpdate, SignupRequest};
use notesnap_core::scan::UploadResult;

use crate::config::{ClientConfig, CONNECT_TIMEOUT, REQUEST_TIMEOUT};
use crate::error::{extract_detail, ApiError};

/// HTTP client for one notesnap backend.
pub struct NotesnapApi {
    client: reqwest::Client,
    base_url: String,
}

impl NotesnapApi {
    /// Create a client with its own connection pool.
    pub fn new(config: ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self::with_client(client, config)
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for sharing a pool across components).
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url,
        }
    }

    /// Backend base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- classes ----

    /// List the classes `user_id` belongs to.
    ///
    /// `GET /api/classes?user_id=`
    pub async fn list_classes(&self, user_id: &str) -> Result<Vec<Class>, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/classes", self.base_url))
            .query(&[("user_id", user_id)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Search classes by name substring (case-insensitive on the server).
    ///
    /// `GET /api/classes/search?name=`
    pub async fn search_classes(&self, name: &str) -> Result<Vec<Class>, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/classes/search", self.base_url))
            .query(&[("name", name)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Join a class as `user_id`.
    ///
    /// `POST /api/classes/{id}/join?user_id=`
    pub async fn join_class(&self, class_id: &str, user_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(format!("{}/api/classes/{}/join", self.base_url, class_id))
            .query(&[("user_id", user_id)])
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Create a new class.
    ///
    /// `POST /api/classes`
    pub async fn create_class(&self, class: &ClassCreate) -> Result<Class, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/classes", self.base_url))
            .json(class)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- upload ----

    /// Upload a captured photo for PDF conversion.
    ///
    /// `POST /api/upload-to-pdf`, multipart with the photo under the
    /// `file` field, a capture-time filename, and an `image/jpeg` part
    /// type.  No Content-Type header is set on the request itself; the
    /// multipart boundary is negotiated by the transport.
    pub async fn upload_to_pdf(&self, image: &CapturedImage) -> Result<UploadResult, ApiError> {
        let bytes = tokio::fs::read(image.path()).await.map_err(|e| {
            ApiError::Precondition(format!(
                "Cannot read captured photo {}: {e}",
                image.path().display()
            ))
        })?;

        let part = multipart::Part::bytes(bytes)
            .file_name(image.upload_filename())
            .mime_str(CAPTURE_MIME)
            .expect("static MIME type is valid");
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(format!("{}/api/upload-to-pdf", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let body = Self::success_body(response).await?;
        parse_upload_response(&body)
    }

    /// Ask the backend to summarize a converted PDF.
    ///
    /// `POST /api/summarize-pdf`, multipart with the PDF bytes.
    pub async fn summarize_pdf(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")
            .expect("static MIME type is valid");
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(format!("{}/api/summarize-pdf", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let body = Self::success_body(response).await?;
        parse_summary_response(&body)
    }

    // ---- notes ----

    /// List all notes attached to a class.
    ///
    /// `GET /api/notes?class_id=`
    pub async fn list_notes(&self, class_id: &str) -> Result<Vec<Note>, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/notes", self.base_url))
            .query(&[("class_id", class_id)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Register a converted artifact as a note on a class.
    ///
    /// `POST /api/notes?class_id=`
    pub async fn create_note(&self, class_id: &str, note: &NoteCreate) -> Result<Note, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/notes", self.base_url))
            .query(&[("class_id", class_id)])
            .json(note)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- auth / profile ----

    /// Sign in with email and password.
    ///
    /// `POST /api/auth/login`
    pub async fn login(&self, request: &LoginRequest) -> Result<ProfileResponse, ApiError> {
        Self::validate(request)?;
        let response = self
            .client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Create an account.
    ///
    /// `POST /api/auth/signup`
    pub async fn signup(&self, request: &SignupRequest) -> Result<ProfileResponse, ApiError> {
        Self::validate(request)?;
        let response = self
            .client
            .post(format!("{}/api/auth/signup", self.base_url))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the profile for an email.
    ///
    /// `GET /api/auth/profile?email=`
    pub async fn get_profile(&self, email: &str) -> Result<ProfileResponse, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/auth/profile", self.base_url))
            .query(&[("email", email)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Update profile fields for an email.
    ///
    /// `PUT /api/auth/profile?email=`
    pub async fn update_profile(
        &self,
        email: &str,
        update: &ProfileUpdate,
    ) -> Result<ProfileResponse, ApiError> {
        let response = self
            .client
            .put(format!("{}/api/auth/profile", self.base_url))
            .query(&[("email", email)])
            .json(update)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Run `validator` rules before building a request, mapping
    /// violations into a local precondition error.
    fn validate<T: Validate>(payload: &T) -> Result<(), ApiError> {
        payload
            .validate()
            .map_err(|e| ApiError::Precondition(e.to_string()))
    }

    /// Ensure a success status, returning the body text; non-2xx maps
    /// to [`ApiError::Status`] with the server's detail.
    async fn success_body(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }
        Ok(body)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let body = Self::success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "Response body did not match expected shape");
            ApiError::Malformed("response body did not match the expected shape")
        })
    }

    /// Assert a success status, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::success_body(response).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Response-shape checks (pure, unit-testable)
// ---------------------------------------------------------------------------

/// Loosely-typed conversion response, before shape checking.
#[derive(serde::Deserialize)]
struct RawUploadResponse {
    #[serde(rename = "imageUrl", default)]
    image_url: Option<String>,
    #[serde(rename = "pdfUrl", default)]
    pdf_url: Option<String>,
}

/// Check a 2xx conversion body for the fields the workflow needs.
///
/// A missing or empty `pdfUrl` is a malformed response even though the
/// HTTP exchange succeeded.  A missing `imageUrl` is tolerated (the PDF
/// is the artifact users care about).
pub fn parse_upload_response(body: &str) -> Result<UploadResult, ApiError> {
    let raw: RawUploadResponse = serde_json::from_str(body)
        .map_err(|_| ApiError::Malformed("conversion response was not valid JSON"))?;

    let pdf_url = raw
        .pdf_url
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::Malformed("conversion response missing pdfUrl"))?;

    Ok(UploadResult {
        image_url: raw.image_url.unwrap_or_default(),
        pdf_url,
    })
}

/// Extract the `summary` string from a summarization response.
pub fn parse_summary_response(body: &str) -> Result<String, ApiError> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("summary")?.as_str().map(String::from))
        .ok_or(ApiError::Malformed("summarization response missing summary"))
}
