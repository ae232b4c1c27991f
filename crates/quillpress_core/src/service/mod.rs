//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the external HTTP boundary decoupled from storage details.

pub mod post_service;
pub mod user_service;
