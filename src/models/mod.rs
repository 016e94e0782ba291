//! Data models for the portfolio backend.
//!
//! Field names serialize in camelCase to match what the frontend reads.

mod datastore;
mod member;
mod project;

pub use datastore::*;
pub use member::*;
pub use project::*;
