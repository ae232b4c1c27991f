//! Tag domain model.
//!
//! # Invariants
//! - `name` is unique across the store; the same name never produces two
//!   rows, no matter how many posts submit it.

use serde::Serialize;

/// Stable identifier for a tag row.
pub type TagId = i64;

/// A shared label attached to posts through the `post_tags` join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}
