use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::auth::{login, signup, SessionContext};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionContext>, AppError> {
    let session = login(state.identity.as_ref(), &state.repo, &req.email, &req.password).await?;
    Ok(Json(session))
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionContext>), AppError> {
    let session = signup(
        state.identity.as_ref(),
        &state.repo,
        &req.email,
        &req.password,
        &req.name,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(session)))
}
