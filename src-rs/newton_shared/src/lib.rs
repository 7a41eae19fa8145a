//! Shared utilities for the Newton dimension checker
//!
//! This crate holds the pieces that every other Newton crate needs:
//! source spans, the handle type used to name a scope, and the error
//! plumbing that turns crate-specific errors into displayable messages.

pub mod error;
pub mod scope;
pub mod span;
