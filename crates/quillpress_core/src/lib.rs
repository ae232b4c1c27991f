//! Core persistence logic for QuillPress, a small content-publishing
//! backend: users author posts, posts carry shared tags through a
//! many-to-many join.
//! This crate is the single source of truth for the repository and
//! aggregation invariants; the HTTP and credential boundaries live outside.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::post::{NewPost, Post, PostDetail, PostId, PostUpdate};
pub use model::tag::{Tag, TagId};
pub use model::user::{NewUser, User, UserId, UserProfile, UserSummary, UserUpdate};
pub use repo::post_repo::{PostRepository, SqlitePostRepository};
pub use repo::post_tag::PostTagLink;
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::post_service::{PostService, PostServiceError};
pub use service::user_service::{UserService, UserServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
