//! Per-user profile documents: data model, storage and the repository that
//! enforces list uniqueness and test-result overwrite.

pub mod dedup;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod store;
