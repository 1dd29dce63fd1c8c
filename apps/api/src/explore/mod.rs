//! Browsing the career database (tests, jobs, schools, departments,
//! counseling cases) and saving items of interest to the user's profile.

pub mod counseling;
pub mod jobs;
pub mod recommendations;
pub mod schools;

use serde::Deserialize;

use crate::careernet::models::Sourced;
use crate::errors::AppError;

#[derive(Deserialize)]
pub struct SaveRequest {
    pub user_id: String,
}

/// Unwraps a detail lookup, mapping an unknown id to `NotFound`.
fn found<T>(sourced: Sourced<Option<T>>, what: &str, id: &str) -> Result<Sourced<T>, AppError> {
    let Sourced { data, provenance } = sourced;
    data.map(|data| Sourced { data, provenance })
        .ok_or_else(|| AppError::NotFound(format!("{what} {id} not found")))
}
