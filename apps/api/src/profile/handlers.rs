use std::collections::BTreeSet;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::profile::models::{today, Grade, JobBookmark, UserProfile, INTEREST_CATEGORIES};
use crate::profile::repository::AppendOutcome;
use crate::state::AppState;

const GRADES: [Grade; 6] = [
    Grade::Middle1,
    Grade::Middle2,
    Grade::Middle3,
    Grade::High1,
    Grade::High2,
    Grade::High3,
];

/// The caller names the profile it acts on; the session token is not checked.
#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub grade: Option<Grade>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
}

#[derive(Serialize)]
pub struct ProfileOptions {
    pub grades: Vec<Grade>,
    pub interests: Vec<&'static str>,
}

#[derive(Deserialize)]
pub struct SaveJobRequest {
    pub user_id: String,
    pub job_name: String,
    #[serde(default)]
    pub job_description: String,
}

/// Result of a save action. `saved` is false when the item was already there.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub saved: bool,
    pub message: String,
}

impl SaveResponse {
    /// Builds the user-facing message for `label`, e.g. ("간호사", "직업").
    pub fn for_outcome(outcome: AppendOutcome, label: &str, kind: &str) -> Self {
        match outcome {
            AppendOutcome::Appended => Self {
                saved: true,
                message: format!("{label}이(가) 관심 {kind}{} 저장되었습니다!", ro_particle(kind)),
            },
            AppendOutcome::AlreadyPresent => Self {
                saved: false,
                message: format!("{label}은(는) 이미 저장된 {kind}입니다."),
            },
        }
    }
}

/// "으로" after a final consonant other than ㄹ, "로" otherwise.
fn ro_particle(word: &str) -> &'static str {
    let final_consonant = word
        .chars()
        .last()
        .filter(|c| ('가'..='힣').contains(c))
        .map(|c| (c as u32 - '가' as u32) % 28)
        .unwrap_or(0);
    match final_consonant {
        0 | 8 => "로",
        _ => "으로",
    }
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.repo.get(&params.user_id).await?))
}

/// PUT /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state
        .repo
        .update_basic_info(&req.user_id, &req.name, req.grade, req.interests)
        .await?;
    Ok(Json(profile))
}

/// GET /api/v1/profile/options
pub async fn handle_profile_options() -> Json<ProfileOptions> {
    Json(ProfileOptions {
        grades: GRADES.to_vec(),
        interests: INTEREST_CATEGORIES.to_vec(),
    })
}

/// POST /api/v1/profile/saved-jobs
///
/// Saves a job by name only, as offered by interest and test-result
/// recommendations.
pub async fn handle_save_job_by_name(
    State(state): State<AppState>,
    Json(req): Json<SaveJobRequest>,
) -> Result<Json<SaveResponse>, AppError> {
    let name = req.job_name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("job_name must not be empty".to_string()));
    }

    let bookmark = JobBookmark {
        job_id: None,
        job_name: name.to_string(),
        job_category: None,
        job_description: req.job_description,
        saved_date: today(),
    };
    let outcome = state.repo.save_job(&req.user_id, bookmark).await?;
    Ok(Json(SaveResponse::for_outcome(outcome, name, "직업")))
}
