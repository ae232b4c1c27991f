//! User domain model.
//!
//! # Responsibility
//! - Define the raw account row and its outward-facing projections.
//!
//! # Invariants
//! - `username` is unique across the store.
//! - `password` is an opaque credential and never leaves the core: the raw
//!   [`User`] row deliberately does not implement `Serialize`.

use crate::model::post::PostDetail;
use serde::Serialize;

/// Stable identifier for a user row.
pub type UserId = i64;

/// Raw `users` row, including the stored credential.
///
/// Returned only by the username lookup that the external auth boundary
/// uses for credential checks. Not serializable by design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub name: Option<String>,
    pub location: Option<String>,
}

impl User {
    /// Projects the row to its credential-free summary shape.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
        }
    }
}

/// Credential-free user projection used everywhere a user is exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub name: Option<String>,
    pub location: Option<String>,
}

/// User projection with the author's posts attached.
///
/// Return shape of the by-id lookup; `posts` holds full aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub posts: Vec<PostDetail>,
}

/// Registration input for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: Option<String>,
    pub location: Option<String>,
}

/// Allow-listed partial update for a user row.
///
/// Every updatable column is an explicit field; callers cannot smuggle
/// arbitrary column names into generated SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
}

impl UserUpdate {
    /// Returns whether the update carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.name.is_none()
            && self.location.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{User, UserUpdate};

    #[test]
    fn summary_drops_the_credential() {
        let user = User {
            id: 7,
            username: "alice".to_string(),
            password: "pw".to_string(),
            name: Some("Alice".to_string()),
            location: None,
        };

        let summary = user.summary();
        assert_eq!(summary.id, 7);
        assert_eq!(summary.username, "alice");
        assert_eq!(summary.name.as_deref(), Some("Alice"));
    }

    #[test]
    fn default_update_is_empty() {
        assert!(UserUpdate::default().is_empty());
        let update = UserUpdate {
            location: Some("NY".to_string()),
            ..UserUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
