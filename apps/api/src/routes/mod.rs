pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::explore::{counseling, jobs, psych_tests, recommendations, schools};
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        // Profile
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_update_profile),
        )
        .route("/api/v1/profile/options", get(profile::handle_profile_options))
        .route(
            "/api/v1/profile/saved-jobs",
            post(profile::handle_save_job_by_name),
        )
        .route(
            "/api/v1/profile/test-results",
            get(psych_tests::handle_list_results),
        )
        // Psychological tests
        .route("/api/v1/tests", get(psych_tests::handle_list_tests))
        .route(
            "/api/v1/tests/:test_id/questions",
            get(psych_tests::handle_test_questions),
        )
        .route(
            "/api/v1/tests/:test_id/submit",
            post(psych_tests::handle_submit_test),
        )
        // Job encyclopedia
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/:job_id", get(jobs::handle_job_detail))
        .route("/api/v1/jobs/:job_id/save", post(jobs::handle_save_job))
        // Schools and departments
        .route("/api/v1/schools", get(schools::handle_list_schools))
        .route("/api/v1/schools/:school_id", get(schools::handle_school_detail))
        .route(
            "/api/v1/schools/:school_id/save",
            post(schools::handle_save_school),
        )
        .route(
            "/api/v1/schools/:school_id/departments/:department_id/save",
            post(schools::handle_save_school_department),
        )
        .route("/api/v1/departments", get(schools::handle_list_departments))
        .route(
            "/api/v1/departments/:department_id",
            get(schools::handle_department_detail),
        )
        .route(
            "/api/v1/departments/:department_id/save",
            post(schools::handle_save_department),
        )
        // Counseling cases
        .route("/api/v1/counseling", get(counseling::handle_list_cases))
        .route(
            "/api/v1/counseling/:case_id",
            get(counseling::handle_case_detail),
        )
        // Recommendations
        .route(
            "/api/v1/recommendations",
            get(recommendations::handle_recommendations),
        )
        .with_state(state)
}
