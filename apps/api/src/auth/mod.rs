//! Email/password sign-in and sign-up backed by an external identity provider.
//! The profile document is created on signup, or on the first login of an
//! account that has none.

pub mod handlers;
pub mod provider;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::profile::models::UserProfile;
use crate::profile::repository::UserRepository;

pub use provider::{AuthError, FirebaseIdentity, IdentityProvider};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// An authenticated user with their profile loaded.
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub user_id: String,
    pub token: String,
    pub profile: UserProfile,
}

/// Checks run before the identity provider is contacted. The first failing
/// check wins.
pub fn validate_signup(email: &str, password: &str, name: &str) -> Result<(), AppError> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(AppError::Validation(
            "유효한 이메일 주소를 입력해주세요.".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "비밀번호는 최소 {MIN_PASSWORD_LEN}자 이상이어야 합니다."
        )));
    }
    if name.trim().is_empty() {
        return Err(AppError::Validation("이름을 입력해주세요.".to_string()));
    }
    Ok(())
}

pub async fn login(
    identity: &dyn IdentityProvider,
    repo: &UserRepository,
    email: &str,
    password: &str,
) -> Result<SessionContext, AppError> {
    let session = identity.sign_in(email, password).await?;
    let profile = repo.upsert_default(&session.user_id).await?;
    info!(user_id = %session.user_id, "user logged in");

    Ok(SessionContext {
        user_id: session.user_id,
        token: session.id_token,
        profile,
    })
}

pub async fn signup(
    identity: &dyn IdentityProvider,
    repo: &UserRepository,
    email: &str,
    password: &str,
    name: &str,
) -> Result<SessionContext, AppError> {
    validate_signup(email, password, name)?;

    let session = identity.sign_up(email, password).await?;
    let profile = repo.create(&session.user_id, name).await?;
    info!(user_id = %session.user_id, "user signed up");

    Ok(SessionContext {
        user_id: session.user_id,
        token: session.id_token,
        profile,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::auth::provider::AuthSession;
    use crate::profile::store::MemoryDocumentStore;

    /// Accepts every credential and counts calls.
    #[derive(Default)]
    pub(crate) struct CountingIdentity {
        pub calls: AtomicU32,
    }

    #[async_trait]
    impl IdentityProvider for CountingIdentity {
        async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthSession, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if email.starts_with("unknown") {
                return Err(AuthError::InvalidCredentials);
            }
            Ok(AuthSession {
                user_id: format!("uid-{email}"),
                id_token: "token".to_string(),
            })
        }

        async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
            self.sign_in(email, password).await
        }
    }

    fn repo() -> UserRepository {
        UserRepository::new(Arc::new(MemoryDocumentStore::default()))
    }

    #[test]
    fn test_validate_signup_order() {
        assert!(matches!(
            validate_signup("not-an-email", "x", ""),
            Err(AppError::Validation(msg)) if msg.contains("이메일")
        ));
        assert!(matches!(
            validate_signup("a@b.co", "12345", ""),
            Err(AppError::Validation(msg)) if msg.contains("비밀번호")
        ));
        assert!(matches!(
            validate_signup("a@b.co", "123456", "   "),
            Err(AppError::Validation(msg)) if msg.contains("이름")
        ));
        assert!(validate_signup("student.kim@school.ac.kr", "123456", "김학생").is_ok());
    }

    #[tokio::test]
    async fn test_invalid_signup_never_reaches_provider() {
        let identity = CountingIdentity::default();
        let err = signup(&identity, &repo(), "not-an-email", "secret1", "김학생")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(identity.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_signup_creates_named_profile() {
        let identity = CountingIdentity::default();
        let repo = repo();
        let session = signup(&identity, &repo, "a@b.co", "secret1", "김학생")
            .await
            .unwrap();

        assert_eq!(session.user_id, "uid-a@b.co");
        assert_eq!(repo.get("uid-a@b.co").await.unwrap().name, "김학생");
    }

    #[tokio::test]
    async fn test_login_creates_missing_profile() {
        let identity = CountingIdentity::default();
        let repo = repo();
        let session = login(&identity, &repo, "a@b.co", "secret1").await.unwrap();

        assert_eq!(session.profile, UserProfile::default());
        assert!(repo.get("uid-a@b.co").await.is_ok());
    }

    #[tokio::test]
    async fn test_login_failure_maps_to_auth_error() {
        let identity = CountingIdentity::default();
        let err = login(&identity, &repo(), "unknown@b.co", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::InvalidCredentials)));
    }
}
