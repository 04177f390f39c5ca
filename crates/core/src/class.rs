//! Class (course) wire model and membership helpers.
//!
//! Classes are backend-owned and read-only on the client, with one
//! exception: after a successful join the acting user is appended to
//! the cached member list optimistically, without a refetch.

use serde::{Deserialize, Serialize};

use crate::note::Note;

/// A class as returned by `GET /api/classes` and the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Class {
    pub id: String,
    pub name: String,
    /// Member user ids.  Absent on some endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
    /// Notes attached to the class.  Absent on some endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<Note>>,
}

/// Payload for `POST /api/classes`.
#[derive(Debug, Clone, Serialize)]
pub struct ClassCreate {
    pub name: String,
    pub users: Vec<String>,
    pub photos: Vec<Note>,
}

impl ClassCreate {
    /// A new class with the creator as its first member.
    pub fn new(name: impl Into<String>, creator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            users: vec![creator.into()],
            photos: Vec::new(),
        }
    }
}

impl Class {
    /// Whether `user_id` appears in the member list.
    ///
    /// A missing member list means membership is unknown; treat as not
    /// a member (the tap flow then offers "join", which the server
    /// rejects harmlessly for existing members).
    pub fn is_member(&self, user_id: &str) -> bool {
        self.users
            .as_deref()
            .is_some_and(|users| users.iter().any(|u| u == user_id))
    }

    /// Optimistically record `user_id` as a member after a join.
    ///
    /// Idempotent: joining twice does not duplicate the entry.  This is
    /// display-only state; the cache holding this class is responsible
    /// for refetching on its next view.
    pub fn record_joined(&mut self, user_id: &str) {
        let users = self.users.get_or_insert_with(Vec::new);
        if !users.iter().any(|u| u == user_id) {
            users.push(user_id.to_string());
        }
    }
}
