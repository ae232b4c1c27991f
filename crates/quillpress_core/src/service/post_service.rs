//! Post use-case service.
//!
//! # Responsibility
//! - Provide publish/read/update entry points over the post aggregate.
//! - Reject blank tag names before any write reaches storage.
//!
//! # Invariants
//! - The empty-vs-missing distinction of `PostUpdate.tags` passes through
//!   unchanged; the service never rewrites it.

use crate::model::post::{NewPost, PostDetail, PostId, PostUpdate};
use crate::model::user::UserId;
use crate::repo::post_repo::PostRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for post use-cases.
#[derive(Debug)]
pub enum PostServiceError {
    /// Tag input contains an empty or whitespace-only name.
    InvalidTag(String),
    /// Target post does not exist.
    PostNotFound(PostId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for PostServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTag(name) => write!(f, "invalid tag: `{name}`"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PostServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PostServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::PostNotFound(id) => Self::PostNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Post service facade over repository implementations.
pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Publishes a post with its initial tag set and returns the aggregate.
    pub fn publish_post(&mut self, new_post: &NewPost) -> Result<PostDetail, PostServiceError> {
        validate_tag_names(&new_post.tags)?;
        Ok(self.repo.create_post(new_post)?)
    }

    /// Applies a partial update; when `tags` is present the join is
    /// reconciled to exactly that set.
    pub fn update_post(
        &mut self,
        post_id: PostId,
        update: &PostUpdate,
    ) -> Result<PostDetail, PostServiceError> {
        if let Some(tags) = &update.tags {
            validate_tag_names(tags)?;
        }
        Ok(self.repo.update_post(post_id, update)?)
    }

    /// Gets one post aggregate; absence is `PostNotFound`.
    pub fn get_post(&self, post_id: PostId) -> Result<PostDetail, PostServiceError> {
        Ok(self.repo.get_post_by_id(post_id)?)
    }

    /// Lists every post aggregate.
    pub fn list_posts(&self) -> Result<Vec<PostDetail>, PostServiceError> {
        Ok(self.repo.get_all_posts()?)
    }

    /// Lists the aggregates authored by one user.
    pub fn posts_by_author(&self, author_id: UserId) -> Result<Vec<PostDetail>, PostServiceError> {
        Ok(self.repo.get_posts_by_user(author_id)?)
    }

    /// Lists the aggregates carrying one tag name; empty when unknown.
    pub fn posts_by_tag(&self, tag_name: &str) -> Result<Vec<PostDetail>, PostServiceError> {
        Ok(self.repo.get_posts_by_tag_name(tag_name)?)
    }
}

fn validate_tag_names(names: &[String]) -> Result<(), PostServiceError> {
    for name in names {
        if name.trim().is_empty() {
            return Err(PostServiceError::InvalidTag(name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_tag_names, PostServiceError};

    #[test]
    fn blank_tag_names_are_rejected() {
        let err = validate_tag_names(&["  ".to_string()]).unwrap_err();
        assert!(matches!(err, PostServiceError::InvalidTag(_)));
        assert!(validate_tag_names(&["#ok".to_string()]).is_ok());
    }
}
