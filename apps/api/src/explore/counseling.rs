use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::careernet::models::{CounselingCase, CounselingDetail, CounselingFilter, Sourced};
use crate::errors::AppError;
use crate::explore::found;
use crate::state::AppState;

/// GET /api/v1/counseling
pub async fn handle_list_cases(
    State(state): State<AppState>,
    Query(filter): Query<CounselingFilter>,
) -> Json<Sourced<Vec<CounselingCase>>> {
    Json(state.careernet.list_counseling_cases(&filter).await)
}

/// GET /api/v1/counseling/:case_id
pub async fn handle_case_detail(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Result<Json<Sourced<CounselingDetail>>, AppError> {
    let detail = state.careernet.counseling_detail(&case_id).await;
    Ok(Json(found(detail, "Counseling case", &case_id)?))
}
