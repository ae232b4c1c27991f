//! User use-case service.
//!
//! # Responsibility
//! - Provide account registration/lookup/update entry points.
//! - Reject blank registration input before any write.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - The raw credential row only flows through `get_user_by_username`.

use crate::model::user::{NewUser, User, UserId, UserProfile, UserSummary, UserUpdate};
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for user use-cases.
#[derive(Debug)]
pub enum UserServiceError {
    /// Registration input carries an empty or whitespace-only username.
    BlankUsername,
    /// Registration input carries an empty password.
    BlankPassword,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankUsername => write!(f, "username must not be blank"),
            Self::BlankPassword => write!(f, "password must not be empty"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// User service facade over repository implementations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new account.
    ///
    /// Returns `Ok(None)` when the username is already taken; callers
    /// branch on absence, not on a caught failure.
    pub fn register_user(&self, new_user: &NewUser) -> Result<Option<User>, UserServiceError> {
        if new_user.username.trim().is_empty() {
            return Err(UserServiceError::BlankUsername);
        }
        if new_user.password.is_empty() {
            return Err(UserServiceError::BlankPassword);
        }
        Ok(self.repo.create_user(new_user)?)
    }

    /// Lists all users projected without credentials.
    pub fn list_users(&self) -> RepoResult<Vec<UserSummary>> {
        self.repo.list_users()
    }

    /// Applies an allow-listed partial update; `Ok(None)` covers both the
    /// empty-update no-op and an unknown id.
    pub fn update_user(
        &self,
        user_id: UserId,
        update: &UserUpdate,
    ) -> RepoResult<Option<UserSummary>> {
        self.repo.update_user(user_id, update)
    }

    /// Gets one profile with authored post aggregates attached.
    pub fn get_user(&self, user_id: UserId) -> RepoResult<Option<UserProfile>> {
        self.repo.get_user_by_id(user_id)
    }

    /// Raw-row lookup used by the external credential boundary.
    pub fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.repo.get_user_by_username(username)
    }
}
