//! Post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide post CRUD on top of the `posts` row storage.
//! - Assemble the post aggregate (row + tag set + author projection).
//! - Own tag-set reconciliation for post updates.
//!
//! # Invariants
//! - `create_post` and `update_post` run their multi-statement sequences in
//!   one immediate transaction; a partial failure rolls back.
//! - After reconciliation the `post_tags` rows for the post equal exactly
//!   the requested desired set; surviving links keep their tag ids.
//! - Aggregates never expose the raw `author_id` or any credential.

use crate::model::post::{NewPost, Post, PostDetail, PostId, PostUpdate};
use crate::model::tag::Tag;
use crate::model::user::{UserId, UserSummary};
use crate::repo::post_tag::link_post_tag;
use crate::repo::tag_repo::upsert_tags;
use crate::repo::{ensure_schema_ready, RepoError, RepoResult, SchemaRequirements};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Transaction, TransactionBehavior};
use std::collections::{BTreeSet, HashMap};

const POST_SCHEMA: SchemaRequirements = &[
    ("users", &["id", "username", "password", "name", "location"]),
    ("posts", &["id", "author_id", "title", "content"]),
    ("tags", &["id", "name"]),
    ("post_tags", &["post_id", "tag_id"]),
];

/// Repository interface for post CRUD and aggregation.
pub trait PostRepository {
    /// Inserts the post, resolves its initial tag set, links it, and returns
    /// the assembled aggregate. Transactional.
    fn create_post(&mut self, new_post: &NewPost) -> RepoResult<PostDetail>;
    /// Returns the full aggregate, or `RepoError::PostNotFound` when the row
    /// is absent.
    fn get_post_by_id(&self, post_id: PostId) -> RepoResult<PostDetail>;
    /// Returns every post's aggregate, ordered by post id.
    fn get_all_posts(&self) -> RepoResult<Vec<PostDetail>>;
    /// Returns the aggregates of every post authored by the given user.
    fn get_posts_by_user(&self, author_id: UserId) -> RepoResult<Vec<PostDetail>>;
    /// Returns the aggregates of every post carrying the given tag name;
    /// empty vec when the tag is unknown or unused.
    fn get_posts_by_tag_name(&self, tag_name: &str) -> RepoResult<Vec<PostDetail>>;
    /// Applies an allow-listed partial column update and, when `tags` is
    /// present, reconciles the join to exactly that set. Transactional.
    fn update_post(&mut self, post_id: PostId, update: &PostUpdate) -> RepoResult<PostDetail>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    pub(super) conn: &'conn mut Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, POST_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&mut self, new_post: &NewPost) -> RepoResult<PostDetail> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO posts (author_id, title, content) VALUES (?1, ?2, ?3);",
            params![new_post.author_id, new_post.title, new_post.content],
        )?;
        let post_id = tx.last_insert_rowid();

        let tags = upsert_tags(&tx, &new_post.tags)?;
        for tag in &tags {
            link_post_tag(&tx, post_id, tag.id)?;
        }

        tx.commit()?;
        fetch_post_detail(self.conn, post_id)
    }

    fn get_post_by_id(&self, post_id: PostId) -> RepoResult<PostDetail> {
        fetch_post_detail(self.conn, post_id)
    }

    fn get_all_posts(&self) -> RepoResult<Vec<PostDetail>> {
        let post_ids = collect_post_ids(self.conn, "SELECT id FROM posts ORDER BY id ASC;", params![])?;
        fetch_post_details(self.conn, &post_ids)
    }

    fn get_posts_by_user(&self, author_id: UserId) -> RepoResult<Vec<PostDetail>> {
        fetch_posts_by_author(self.conn, author_id)
    }

    fn get_posts_by_tag_name(&self, tag_name: &str) -> RepoResult<Vec<PostDetail>> {
        let post_ids = collect_post_ids(
            self.conn,
            "SELECT pt.post_id
             FROM post_tags pt
             INNER JOIN tags t ON t.id = pt.tag_id
             WHERE t.name = ?1
             ORDER BY pt.post_id ASC;",
            [tag_name],
        )?;
        fetch_post_details(self.conn, &post_ids)
    }

    fn update_post(&mut self, post_id: PostId, update: &PostUpdate) -> RepoResult<PostDetail> {
        if update.is_empty() {
            // No-op contract: nothing touches the store; the existing
            // aggregate is re-fetched unchanged.
            return fetch_post_detail(self.conn, post_id);
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !post_exists_in_tx(&tx, post_id)? {
            return Err(RepoError::PostNotFound(post_id));
        }

        if update.has_column_changes() {
            let mut assignments = Vec::new();
            let mut bind_values: Vec<Value> = Vec::new();
            if let Some(title) = &update.title {
                assignments.push("title = ?");
                bind_values.push(Value::Text(title.clone()));
            }
            if let Some(content) = &update.content {
                assignments.push("content = ?");
                bind_values.push(Value::Text(content.clone()));
            }
            bind_values.push(Value::Integer(post_id));
            tx.execute(
                &format!(
                    "UPDATE posts SET {} WHERE id = ?;",
                    assignments.join(", ")
                ),
                params_from_iter(bind_values),
            )?;
        }

        if let Some(desired_names) = &update.tags {
            reconcile_post_tags(&tx, post_id, desired_names)?;
        }

        tx.commit()?;
        fetch_post_detail(self.conn, post_id)
    }
}

/// Makes the join rows for `post_id` equal exactly the desired name set.
///
/// Desired names are resolved through the idempotent upsert-get first, so
/// reconciliation always works against canonical tag ids: rows outside the
/// desired id set are deleted, desired links are inserted idempotently, and
/// surviving rows are never rewritten.
fn reconcile_post_tags(conn: &Connection, post_id: PostId, desired_names: &[String]) -> RepoResult<()> {
    let desired = upsert_tags(conn, desired_names)?;

    if desired.is_empty() {
        conn.execute("DELETE FROM post_tags WHERE post_id = ?1;", [post_id])?;
        return Ok(());
    }

    let in_list = vec!["?"; desired.len()].join(", ");
    let mut bind_values: Vec<Value> = Vec::with_capacity(desired.len() + 1);
    bind_values.push(Value::Integer(post_id));
    bind_values.extend(desired.iter().map(|tag| Value::Integer(tag.id)));
    conn.execute(
        &format!("DELETE FROM post_tags WHERE post_id = ? AND tag_id NOT IN ({in_list});"),
        params_from_iter(bind_values),
    )?;

    for tag in &desired {
        link_post_tag(conn, post_id, tag.id)?;
    }

    Ok(())
}

/// Assembles one post aggregate; absence is the escalated `PostNotFound`.
pub(crate) fn fetch_post_detail(conn: &Connection, post_id: PostId) -> RepoResult<PostDetail> {
    let mut stmt =
        conn.prepare("SELECT id, author_id, title, content FROM posts WHERE id = ?1;")?;
    let mut rows = stmt.query([post_id])?;
    let row = match rows.next()? {
        Some(row) => row,
        None => return Err(RepoError::PostNotFound(post_id)),
    };

    let post = Post {
        id: row.get("id")?,
        author_id: row.get("author_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
    };

    let tags = load_tags_for_post(conn, post.id)?;
    let author = load_author_summary(conn, &post)?;
    Ok(PostDetail {
        id: post.id,
        title: post.title,
        content: post.content,
        tags,
        author,
    })
}

/// Assembles the aggregates of all authored posts, ordered by post id.
pub(crate) fn fetch_posts_by_author(conn: &Connection, author_id: UserId) -> RepoResult<Vec<PostDetail>> {
    let post_ids = collect_post_ids(
        conn,
        "SELECT id FROM posts WHERE author_id = ?1 ORDER BY id ASC;",
        [author_id],
    )?;
    fetch_post_details(conn, &post_ids)
}

/// Batched aggregate assembly: three queries total regardless of how many
/// posts are requested. Output order matches the id list.
pub(crate) fn fetch_post_details(conn: &Connection, post_ids: &[PostId]) -> RepoResult<Vec<PostDetail>> {
    if post_ids.is_empty() {
        return Ok(Vec::new());
    }

    let in_list = vec!["?"; post_ids.len()].join(", ");

    let mut stmt = conn.prepare(&format!(
        "SELECT id, author_id, title, content FROM posts WHERE id IN ({in_list});"
    ))?;
    let mut rows = stmt.query(params_from_iter(post_ids.iter()))?;
    let mut posts = Vec::new();
    while let Some(row) = rows.next()? {
        posts.push(Post {
            id: row.get("id")?,
            author_id: row.get("author_id")?,
            title: row.get("title")?,
            content: row.get("content")?,
        });
    }

    let mut tags_by_post: HashMap<PostId, Vec<Tag>> = HashMap::new();
    let mut stmt = conn.prepare(&format!(
        "SELECT pt.post_id, t.id, t.name
         FROM post_tags pt
         INNER JOIN tags t ON t.id = pt.tag_id
         WHERE pt.post_id IN ({in_list})
         ORDER BY t.name ASC;"
    ))?;
    let mut rows = stmt.query(params_from_iter(post_ids.iter()))?;
    while let Some(row) = rows.next()? {
        let post_id: PostId = row.get(0)?;
        tags_by_post.entry(post_id).or_default().push(Tag {
            id: row.get(1)?,
            name: row.get(2)?,
        });
    }

    let author_ids: BTreeSet<UserId> = posts.iter().map(|post| post.author_id).collect();
    let authors_in = vec!["?"; author_ids.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT id, username, name, location FROM users WHERE id IN ({authors_in});"
    ))?;
    let mut rows = stmt.query(params_from_iter(author_ids.iter()))?;
    let mut authors_by_id: HashMap<UserId, UserSummary> = HashMap::new();
    while let Some(row) = rows.next()? {
        let author = UserSummary {
            id: row.get("id")?,
            username: row.get("username")?,
            name: row.get("name")?,
            location: row.get("location")?,
        };
        authors_by_id.insert(author.id, author);
    }

    let mut details_by_id: HashMap<PostId, PostDetail> = HashMap::with_capacity(posts.len());
    for post in posts {
        let author = authors_by_id.get(&post.author_id).cloned().ok_or_else(|| {
            RepoError::InvalidData(format!(
                "post {} references missing author {}",
                post.id, post.author_id
            ))
        })?;
        let tags = tags_by_post.remove(&post.id).unwrap_or_default();
        details_by_id.insert(
            post.id,
            PostDetail {
                id: post.id,
                title: post.title,
                content: post.content,
                tags,
                author,
            },
        );
    }

    let mut details = Vec::with_capacity(post_ids.len());
    for post_id in post_ids {
        if let Some(detail) = details_by_id.remove(post_id) {
            details.push(detail);
        }
    }
    Ok(details)
}

fn load_tags_for_post(conn: &Connection, post_id: PostId) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name
         FROM post_tags pt
         INNER JOIN tags t ON t.id = pt.tag_id
         WHERE pt.post_id = ?1
         ORDER BY t.name ASC;",
    )?;
    let mut rows = stmt.query([post_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(Tag {
            id: row.get(0)?,
            name: row.get(1)?,
        });
    }
    Ok(tags)
}

fn load_author_summary(conn: &Connection, post: &Post) -> RepoResult<UserSummary> {
    let mut stmt =
        conn.prepare("SELECT id, username, name, location FROM users WHERE id = ?1;")?;
    let mut rows = stmt.query([post.author_id])?;
    match rows.next()? {
        Some(row) => Ok(UserSummary {
            id: row.get("id")?,
            username: row.get("username")?,
            name: row.get("name")?,
            location: row.get("location")?,
        }),
        None => Err(RepoError::InvalidData(format!(
            "post {} references missing author {}",
            post.id, post.author_id
        ))),
    }
}

fn collect_post_ids(
    conn: &Connection,
    sql: &str,
    bind: impl rusqlite::Params,
) -> RepoResult<Vec<PostId>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(bind)?;
    let mut post_ids = Vec::new();
    while let Some(row) = rows.next()? {
        post_ids.push(row.get(0)?);
    }
    Ok(post_ids)
}

fn post_exists_in_tx(tx: &Transaction<'_>, post_id: PostId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?1);",
        [post_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
