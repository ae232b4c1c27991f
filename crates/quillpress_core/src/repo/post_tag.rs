//! Post-tag join relation operations.
//!
//! # Responsibility
//! - Manage rows of the many-to-many relation between posts and tags.
//!
//! # Invariants
//! - Linking is idempotent: a conflict on the unique `(post_id, tag_id)`
//!   pair is the intended no-op, never an error.

use crate::model::post::{PostDetail, PostId};
use crate::model::tag::{Tag, TagId};
use crate::repo::post_repo::{fetch_post_detail, SqlitePostRepository};
use crate::repo::RepoResult;
use rusqlite::{params, Connection};

/// Join-relation operations, implemented on the post repository.
pub trait PostTagLink {
    /// Inserts one join row; safe to repeat.
    fn link_post_tag(&self, post_id: PostId, tag_id: TagId) -> RepoResult<()>;
    /// Links every tag in the collection (any order, repeats allowed), then
    /// returns the fully assembled post.
    fn attach_tags(&self, post_id: PostId, tags: &[Tag]) -> RepoResult<PostDetail>;
}

impl PostTagLink for SqlitePostRepository<'_> {
    fn link_post_tag(&self, post_id: PostId, tag_id: TagId) -> RepoResult<()> {
        link_post_tag(self.conn, post_id, tag_id)
    }

    fn attach_tags(&self, post_id: PostId, tags: &[Tag]) -> RepoResult<PostDetail> {
        for tag in tags {
            link_post_tag(self.conn, post_id, tag.id)?;
        }
        fetch_post_detail(self.conn, post_id)
    }
}

pub(crate) fn link_post_tag(conn: &Connection, post_id: PostId, tag_id: TagId) -> RepoResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?1, ?2);",
        params![post_id, tag_id],
    )?;
    Ok(())
}
