use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Authentication failures, carrying the message shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("유효하지 않은 이메일 형식입니다.")]
    InvalidEmail,

    #[error("이미 등록된 이메일입니다.")]
    EmailExists,

    #[error("비밀번호가 너무 약합니다. 6자 이상의 비밀번호를 사용하세요.")]
    WeakPassword,

    #[error("이메일 또는 비밀번호가 올바르지 않습니다.")]
    InvalidCredentials,

    #[error("비활성화된 계정입니다.")]
    UserDisabled,

    #[error("로그인 시도가 너무 많습니다. 잠시 후 다시 시도해주세요.")]
    TooManyAttempts,

    #[error("인증 실패: {0}")]
    Provider(String),

    #[error("인증 서비스에 연결할 수 없습니다: {0}")]
    Unavailable(String),
}

impl AuthError {
    /// Maps an identity-toolkit error message such as
    /// `"WEAK_PASSWORD : Password should be at least 6 characters"`.
    pub fn from_provider_message(message: &str) -> Self {
        let code = message.split(" : ").next().unwrap_or(message).trim();
        match code {
            "INVALID_EMAIL" => AuthError::InvalidEmail,
            "EMAIL_EXISTS" => AuthError::EmailExists,
            "WEAK_PASSWORD" => AuthError::WeakPassword,
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
                AuthError::InvalidCredentials
            }
            "USER_DISABLED" => AuthError::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::TooManyAttempts,
            _ => AuthError::Provider(message.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: String,
    pub id_token: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;
}

/// Email/password accounts on the identity-toolkit REST API.
#[derive(Clone)]
pub struct FirebaseIdentity {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseIdentity {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn call(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let url = format!("{}/v1/accounts:{action}", self.base_url);
        debug!(%url, "identity request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            warn!(action, %status, %message, "identity provider rejected request");
            return Err(AuthError::from_provider_message(&message));
        }

        let account: AccountResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::Provider(format!("unexpected response: {e}")))?;
        Ok(AuthSession {
            user_id: account.local_id,
            id_token: account.id_token,
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.call("signInWithPassword", email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.call("signUp", email, password).await
    }
}
