//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide account CRUD over the `users` table.
//! - Attach authored post aggregates to the by-id profile read.
//!
//! # Invariants
//! - A username conflict on create is the silent-no-result outcome
//!   (`Ok(None)`), not an error; the store keeps exactly one row per name.
//! - Partial updates only ever touch the allow-listed columns carried by
//!   `UserUpdate`; an empty update issues no statement at all.
//! - Only `get_user_by_username` (the credential-check path) returns the
//!   raw row; every other read projects the password away.

use crate::model::user::{NewUser, User, UserId, UserProfile, UserSummary, UserUpdate};
use crate::repo::post_repo::fetch_posts_by_author;
use crate::repo::{ensure_schema_ready, RepoResult, SchemaRequirements};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const USER_SCHEMA: SchemaRequirements = &[
    ("users", &["id", "username", "password", "name", "location"]),
    ("posts", &["id", "author_id", "title", "content"]),
    ("tags", &["id", "name"]),
    ("post_tags", &["post_id", "tag_id"]),
];

/// Repository interface for user persistence.
pub trait UserRepository {
    /// Returns every user projected without the credential.
    fn list_users(&self) -> RepoResult<Vec<UserSummary>>;
    /// Inserts a new account; `Ok(None)` when the username already exists.
    fn create_user(&self, new_user: &NewUser) -> RepoResult<Option<User>>;
    /// Applies the allow-listed partial update. `Ok(None)` when the update
    /// is empty (no statement issued) or the id is unknown.
    fn update_user(&self, user_id: UserId, update: &UserUpdate) -> RepoResult<Option<UserSummary>>;
    /// Returns the credential-free profile with authored post aggregates
    /// attached, or `Ok(None)` for an unknown id.
    fn get_user_by_id(&self, user_id: UserId) -> RepoResult<Option<UserProfile>>;
    /// Returns the raw row including the stored credential, for the external
    /// auth boundary.
    fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, USER_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn list_users(&self) -> RepoResult<Vec<UserSummary>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username, name, location FROM users ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(row_to_summary(row)?);
        }
        Ok(users)
    }

    fn create_user(&self, new_user: &NewUser) -> RepoResult<Option<User>> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO users (username, password, name, location)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                new_user.username,
                new_user.password,
                new_user.name,
                new_user.location,
            ],
        )?;
        if changed == 0 {
            // Username conflict: callers detect it through absence.
            return Ok(None);
        }

        let user_id = self.conn.last_insert_rowid();
        self.load_raw_user("SELECT id, username, password, name, location FROM users WHERE id = ?1;", [user_id])
    }

    fn update_user(&self, user_id: UserId, update: &UserUpdate) -> RepoResult<Option<UserSummary>> {
        if update.is_empty() {
            return Ok(None);
        }

        let mut assignments = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(username) = &update.username {
            assignments.push("username = ?");
            bind_values.push(Value::Text(username.clone()));
        }
        if let Some(password) = &update.password {
            assignments.push("password = ?");
            bind_values.push(Value::Text(password.clone()));
        }
        if let Some(name) = &update.name {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(location) = &update.location {
            assignments.push("location = ?");
            bind_values.push(Value::Text(location.clone()));
        }
        bind_values.push(Value::Integer(user_id));

        let changed = self.conn.execute(
            &format!("UPDATE users SET {} WHERE id = ?;", assignments.join(", ")),
            params_from_iter(bind_values),
        )?;
        if changed == 0 {
            return Ok(None);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT id, username, name, location FROM users WHERE id = ?1;")?;
        let mut rows = stmt.query([user_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(row_to_summary(row)?)),
            None => Ok(None),
        }
    }

    fn get_user_by_id(&self, user_id: UserId) -> RepoResult<Option<UserProfile>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username, name, location FROM users WHERE id = ?1;")?;
        let mut rows = stmt.query([user_id])?;
        let summary = match rows.next()? {
            Some(row) => row_to_summary(row)?,
            None => return Ok(None),
        };

        let posts = fetch_posts_by_author(self.conn, summary.id)?;
        Ok(Some(UserProfile {
            id: summary.id,
            username: summary.username,
            name: summary.name,
            location: summary.location,
            posts,
        }))
    }

    fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.load_raw_user(
            "SELECT id, username, password, name, location FROM users WHERE username = ?1;",
            [username],
        )
    }
}

impl SqliteUserRepository<'_> {
    fn load_raw_user(
        &self,
        sql: &str,
        bind: impl rusqlite::Params,
    ) -> RepoResult<Option<User>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        match rows.next()? {
            Some(row) => Ok(Some(User {
                id: row.get("id")?,
                username: row.get("username")?,
                password: row.get("password")?,
                name: row.get("name")?,
                location: row.get("location")?,
            })),
            None => Ok(None),
        }
    }
}

fn row_to_summary(row: &Row<'_>) -> RepoResult<UserSummary> {
    Ok(UserSummary {
        id: row.get("id")?,
        username: row.get("username")?,
        name: row.get("name")?,
        location: row.get("location")?,
    })
}
