use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::careernet::models::{
    Department, DepartmentDetail, DepartmentFilter, School, SchoolDetail, SchoolFilter, Sourced,
};
use crate::errors::AppError;
use crate::explore::{found, SaveRequest};
use crate::profile::handlers::SaveResponse;
use crate::profile::models::{today, SchoolBookmark};
use crate::state::AppState;

/// GET /api/v1/schools
pub async fn handle_list_schools(
    State(state): State<AppState>,
    Query(filter): Query<SchoolFilter>,
) -> Json<Sourced<Vec<School>>> {
    Json(state.careernet.list_schools(&filter).await)
}

/// GET /api/v1/schools/:school_id
pub async fn handle_school_detail(
    State(state): State<AppState>,
    Path(school_id): Path<String>,
) -> Result<Json<Sourced<SchoolDetail>>, AppError> {
    let detail = state.careernet.school_detail(&school_id);
    Ok(Json(found(detail, "School", &school_id)?))
}

/// POST /api/v1/schools/:school_id/save
pub async fn handle_save_school(
    State(state): State<AppState>,
    Path(school_id): Path<String>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, AppError> {
    let school = found(state.careernet.school_detail(&school_id), "School", &school_id)?
        .data
        .school;

    let bookmark = SchoolBookmark {
        school_id: school.id,
        school_name: school.name.clone(),
        school_type: school.school_type,
        region: school.region,
        department_id: None,
        department_name: String::new(),
        saved_date: today(),
    };
    let outcome = state
        .repo
        .save_school_bookmark(&req.user_id, bookmark)
        .await?;
    Ok(Json(SaveResponse::for_outcome(outcome, &school.name, "학교")))
}

/// POST /api/v1/schools/:school_id/departments/:department_id/save
///
/// The department must be one the school offers.
pub async fn handle_save_school_department(
    State(state): State<AppState>,
    Path((school_id, department_id)): Path<(String, String)>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, AppError> {
    let detail = found(state.careernet.school_detail(&school_id), "School", &school_id)?.data;
    let department = detail
        .departments
        .into_iter()
        .find(|d| d.id == department_id)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Department {department_id} not found at school {school_id}"
            ))
        })?;

    let school = detail.school;
    let label = format!("{}의 {}", school.name, department.name);
    let bookmark = SchoolBookmark {
        school_id: school.id,
        school_name: school.name,
        school_type: school.school_type,
        region: school.region,
        department_id: Some(department.id),
        department_name: department.name,
        saved_date: today(),
    };
    let outcome = state
        .repo
        .save_school_bookmark(&req.user_id, bookmark)
        .await?;
    Ok(Json(SaveResponse::for_outcome(outcome, &label, "학교/학과")))
}

/// GET /api/v1/departments
pub async fn handle_list_departments(
    State(state): State<AppState>,
    Query(filter): Query<DepartmentFilter>,
) -> Json<Sourced<Vec<Department>>> {
    Json(state.careernet.list_departments(&filter).await)
}

/// GET /api/v1/departments/:department_id
pub async fn handle_department_detail(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
) -> Result<Json<Sourced<DepartmentDetail>>, AppError> {
    let detail = state.careernet.department_detail(&department_id).await;
    Ok(Json(found(detail, "Department", &department_id)?))
}

/// POST /api/v1/departments/:department_id/save
pub async fn handle_save_department(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, AppError> {
    let detail = found(
        state.careernet.department_detail(&department_id).await,
        "Department",
        &department_id,
    )?
    .data;

    let bookmark = SchoolBookmark {
        school_id: String::new(),
        school_name: String::new(),
        school_type: String::new(),
        region: String::new(),
        department_id: Some(detail.id),
        department_name: detail.name.clone(),
        saved_date: today(),
    };
    let outcome = state
        .repo
        .save_school_bookmark(&req.user_id, bookmark)
        .await?;
    Ok(Json(SaveResponse::for_outcome(outcome, &detail.name, "학과")))
}
