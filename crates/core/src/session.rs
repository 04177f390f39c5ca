//! Signed-in identity with an explicit lifecycle.
//!
//! The session is established by login or signup, patched by profile
//! edits, and dropped on logout.  Components that need an acting
//! identity are handed a reference; nothing reads ambient global state.

use crate::profile::ProfileResponse;

/// The signed-in user for the life of one app session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub name: String,
    pub user_id: String,
    pub phone: Option<String>,
}

impl Session {
    /// Establish a session from an auth response.
    ///
    /// Accounts predating user ids have none on the wire; the email
    /// doubles as the user id for those.
    pub fn establish(profile: ProfileResponse) -> Self {
        let user_id = profile
            .user_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| profile.email.clone());
        Self {
            email: profile.email,
            name: profile.name.unwrap_or_default(),
            user_id,
            phone: profile.phone,
        }
    }

    /// Apply a profile edit to the live session.
    pub fn apply_update(&mut self, name: Option<String>, phone: Option<String>) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(phone) = phone {
            self.phone = Some(phone);
        }
    }

    /// Identity used for joins, uploads, and note attribution.
    pub fn acting_user_id(&self) -> &str {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(user_id: Option<&str>) -> ProfileResponse {
        ProfileResponse {
            email: "ada@school.edu".into(),
            name: Some("Ada".into()),
            user_id: user_id.map(String::from),
            phone: None,
        }
    }

    #[test]
    fn establish_uses_server_user_id_when_present() {
        let s = Session::establish(profile(Some("user_42")));
        assert_eq!(s.acting_user_id(), "user_42");
    }

    #[test]
    fn establish_falls_back_to_email_as_user_id() {
        let s = Session::establish(profile(None));
        assert_eq!(s.acting_user_id(), "ada@school.edu");
    }

    #[test]
    fn empty_user_id_also_falls_back_to_email() {
        let s = Session::establish(profile(Some("")));
        assert_eq!(s.acting_user_id(), "ada@school.edu");
    }

    #[test]
    fn apply_update_patches_only_supplied_fields() {
        let mut s = Session::establish(profile(Some("user_42")));
        s.apply_update(None, Some("555-0100".into()));
        assert_eq!(s.name, "Ada");
        assert_eq!(s.phone.as_deref(), Some("555-0100"));
    }
}
