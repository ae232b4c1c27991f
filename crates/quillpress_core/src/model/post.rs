//! Post domain model.
//!
//! # Responsibility
//! - Define the raw `posts` row and the aggregate read model.
//!
//! # Invariants
//! - The aggregate exposes `author` and `tags`; the raw `author_id` foreign
//!   key never appears in the outward shape.
//! - `PostUpdate.tags` distinguishes "absent" (`None`, join untouched) from
//!   "empty" (`Some(vec![])`, every link removed).

use crate::model::tag::Tag;
use crate::model::user::{UserId, UserSummary};
use serde::Serialize;

/// Stable identifier for a post row.
pub type PostId = i64;

/// Raw `posts` row. Internal to the repository layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
}

/// Post aggregate: the row enriched with its tag set and author projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub tags: Vec<Tag>,
    pub author: UserSummary,
}

/// Input for publishing a new post with its initial tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Allow-listed partial update for a post row, with optional tag-set
/// replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Desired tag-name set. `None` leaves the join untouched; `Some`
    /// reconciles the join to exactly this set, including `Some(vec![])`
    /// which unlinks everything.
    pub tags: Option<Vec<String>>,
}

impl PostUpdate {
    /// Returns whether any post column (not the tag set) is being updated.
    pub fn has_column_changes(&self) -> bool {
        self.title.is_some() || self.content.is_some()
    }

    /// Returns whether the update carries nothing at all.
    pub fn is_empty(&self) -> bool {
        !self.has_column_changes() && self.tags.is_none()
    }
}
