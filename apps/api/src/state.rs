use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::careernet::CareerNetClient;
use crate::profile::repository::UserRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub repo: UserRepository,
    pub careernet: Arc<CareerNetClient>,
    pub identity: Arc<dyn IdentityProvider>,
}
