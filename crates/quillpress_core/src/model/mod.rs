//! Domain model for the publishing core.
//!
//! # Responsibility
//! - Define canonical row and read-model structures used by repositories.
//! - Keep credential-bearing rows separate from outward-facing projections.
//!
//! # Invariants
//! - Read models (`UserSummary`, `PostDetail`) never carry a password or a
//!   raw foreign key; only the raw rows do, and those do not serialize.

pub mod post;
pub mod tag;
pub mod user;
