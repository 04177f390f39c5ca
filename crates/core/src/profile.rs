//! Auth and profile wire models.
//!
//! Request payloads carry `validator` rules so obviously bad input
//! (malformed email, empty password) is rejected locally and never
//! reaches the network.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// `POST /api/auth/login` body.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// `POST /api/auth/signup` body.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Profile fields returned by login, signup, and the profile endpoints.
///
/// The backend omits fields it does not know; everything except the
/// email is optional on the wire.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProfileResponse {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// `PUT /api/auth/profile?email=` body.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
