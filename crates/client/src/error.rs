//! API error taxonomy and server-detail extraction.
//!
//! Three failure classes cross this boundary: transport errors (shown
//! to the user as a generic "unable to connect"), non-2xx application
//! errors (shown with the server's detail text), and 2xx responses
//! whose body is missing an expected field.  Precondition errors never
//! get this far -- they are caught in `notesnap-core` before a request
//! is built.

/// Message shown for any transport-level failure.
pub const UNABLE_TO_CONNECT: &str = "Unable to connect to the server.";

/// Errors from the notesnap REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input was rejected locally; no request was issued.
    #[error("{0}")]
    Precondition(String),

    /// The HTTP request itself failed (network, DNS, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Request failed ({status}): {detail}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided detail, or the raw body when unparseable.
        detail: String,
    },

    /// A 2xx response was missing an expected field.
    #[error("Malformed response: {0}")]
    Malformed(&'static str),
}

impl ApiError {
    /// The string a screen displays for this error.
    ///
    /// Transport failures collapse to a generic connectivity message;
    /// everything else keeps its detail.
    pub fn display_message(&self) -> String {
        match self {
            Self::Request(e) if e.is_connect() || e.is_timeout() => UNABLE_TO_CONNECT.to_string(),
            other => other.to_string(),
        }
    }
}

/// Extract the user-facing detail from an error response body.
///
/// FastAPI wraps errors as `{"detail": "..."}`; when the body parses as
/// JSON with a string `detail`, that string is surfaced, otherwise the
/// raw body text is.
pub fn extract_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail")?.as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_field_is_surfaced_from_json_bodies() {
        assert_eq!(
            extract_detail(r#"{"detail":"Email already registered"}"#),
            "Email already registered"
        );
    }

    #[test]
    fn raw_body_is_surfaced_when_not_json() {
        assert_eq!(extract_detail("Internal Server Error"), "Internal Server Error");
    }

    #[test]
    fn json_without_string_detail_falls_back_to_raw_body() {
        assert_eq!(extract_detail(r#"{"detail":{"code":42}}"#), r#"{"detail":{"code":42}}"#);
        assert_eq!(extract_detail(r#"{"error":"nope"}"#), r#"{"error":"nope"}"#);
    }

    #[test]
    fn status_error_display_includes_code_and_detail() {
        let err = ApiError::Status {
            status: 400,
            detail: "Invalid email or password".into(),
        };
        assert_eq!(
            err.to_string(),
            "Request failed (400): Invalid email or password"
        );
    }
}
