use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::careernet::models::{JobDetail, JobFilter, JobSummary, Sourced};
use crate::errors::AppError;
use crate::explore::{found, SaveRequest};
use crate::profile::handlers::SaveResponse;
use crate::profile::models::{today, JobBookmark};
use crate::state::AppState;

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Json<Sourced<Vec<JobSummary>>> {
    Json(state.careernet.list_jobs(&filter).await)
}

/// GET /api/v1/jobs/:job_id
pub async fn handle_job_detail(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Sourced<JobDetail>>, AppError> {
    let detail = state.careernet.job_detail(&job_id).await;
    Ok(Json(found(detail, "Job", &job_id)?))
}

/// POST /api/v1/jobs/:job_id/save
pub async fn handle_save_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, AppError> {
    let detail = found(state.careernet.job_detail(&job_id).await, "Job", &job_id)?.data;

    let bookmark = JobBookmark {
        job_id: Some(detail.id),
        job_name: detail.name.clone(),
        job_category: Some(detail.category),
        job_description: detail.description,
        saved_date: today(),
    };
    let outcome = state.repo.save_job(&req.user_id, bookmark).await?;
    Ok(Json(SaveResponse::for_outcome(outcome, &detail.name, "직업")))
}
