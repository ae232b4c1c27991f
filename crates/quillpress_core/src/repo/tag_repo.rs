//! Tag repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Guarantee exactly one `tags` row per unique name (upsert-get).
//!
//! # Invariants
//! - `create_tags` returns the canonical row for every requested name,
//!   whether the insert created it or a prior row already existed.
//! - Name collisions on insert are the intended idempotent no-op, never an
//!   error.

use crate::model::tag::Tag;
use crate::repo::{ensure_schema_ready, RepoResult, SchemaRequirements};
use rusqlite::{params_from_iter, Connection};
use std::collections::HashSet;

const TAG_SCHEMA: SchemaRequirements = &[("tags", &["id", "name"])];

/// Repository interface for tag persistence.
pub trait TagRepository {
    /// Idempotent upsert-get: ensures a row exists for every requested name
    /// and returns the canonical rows. Empty input returns an empty vec.
    fn create_tags(&self, names: &[String]) -> RepoResult<Vec<Tag>>;
    /// Returns all known tags sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, TAG_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn create_tags(&self, names: &[String]) -> RepoResult<Vec<Tag>> {
        upsert_tags(self.conn, names)
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM tags ORDER BY name ASC;")?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(Tag {
                id: row.get("id")?,
                name: row.get("name")?,
            });
        }
        Ok(tags)
    }
}

/// Shared upsert-get used directly by post creation/reconciliation so the
/// whole sequence can run inside one transaction.
///
/// Two statements on purpose: a conflict-tolerant batch insert cannot
/// portably return pre-existing rows, so the canonical rows are selected
/// after the insert completes.
pub(crate) fn upsert_tags(conn: &Connection, names: &[String]) -> RepoResult<Vec<Tag>> {
    let unique = dedupe_names(names);
    if unique.is_empty() {
        return Ok(Vec::new());
    }

    let value_rows = vec!["(?)"; unique.len()].join(", ");
    conn.execute(
        &format!("INSERT OR IGNORE INTO tags (name) VALUES {value_rows};"),
        params_from_iter(unique.iter()),
    )?;

    let in_list = vec!["?"; unique.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT id, name FROM tags WHERE name IN ({in_list}) ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query(params_from_iter(unique.iter()))?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(Tag {
            id: row.get("id")?,
            name: row.get("name")?,
        });
    }
    Ok(tags)
}

/// Drops repeated names while preserving first-seen order.
pub(crate) fn dedupe_names(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for name in names {
        if seen.insert(name.as_str()) {
            unique.push(name.clone());
        }
    }
    unique
}
