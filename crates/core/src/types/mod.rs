//! Core types for Taskboard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod page;

pub use id::*;
pub use page::Paginated;
