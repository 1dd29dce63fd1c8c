use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::careernet::samples;
use crate::errors::AppError;
use crate::profile::handlers::UserIdQuery;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct InterestRecommendation {
    pub interest: String,
    pub jobs: Vec<String>,
    /// Description stored with a job saved from this group.
    pub save_description: String,
}

#[derive(Debug, Serialize)]
pub struct Recommendations {
    /// False until the user has completed at least one test; clients show a
    /// hint to take one first.
    pub has_test_results: bool,
    pub by_interest: Vec<InterestRecommendation>,
}

/// GET /api/v1/recommendations
///
/// Jobs per selected interest. Saving one goes through
/// `POST /api/v1/profile/saved-jobs`, which dedups on the job name.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Recommendations>, AppError> {
    let profile = state.repo.get(&params.user_id).await?;

    let by_interest = profile
        .interests
        .iter()
        .map(|interest| InterestRecommendation {
            interest: interest.clone(),
            jobs: samples::recommended_jobs(interest)
                .iter()
                .map(|job| job.to_string())
                .collect(),
            save_description: format!("{interest} 관련 직업"),
        })
        .collect();

    Ok(Json(Recommendations {
        has_test_results: !profile.test_results.is_empty(),
        by_interest,
    }))
}
