//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the admission pipeline and its collaborators so route
//! handlers can stay focused on protocol translation and identity plumbing.

pub mod chat;
pub mod evict;
pub mod profile;
pub mod prompt;
pub mod sanitize;
pub mod session;
