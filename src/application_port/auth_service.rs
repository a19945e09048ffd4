use crate::application_port::SessionToken;
use crate::domain_model::UserId;
use crate::domain_port::{KvStoreError, UserRecord};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user already exists")]
    UserExists,
    #[error("session invalid")]
    SessionInvalid,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

// Facade failures surface to callers unmodified; no retry or translation
// happens below the HTTP layer.
impl From<KvStoreError> for AuthError {
    fn from(error: KvStoreError) -> Self {
        AuthError::Store(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user_id: UserId,
    pub session_token: SessionToken,
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, AuthError>;
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn signup(&self, request: SignupInput) -> Result<UserId, AuthError>;
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError>;
    /// Resolve a presented session token to its user. Unknown or revoked
    /// tokens, and tokens whose user has since been deleted, are
    /// [`AuthError::SessionInvalid`].
    async fn authenticate(&self, token: &SessionToken) -> Result<UserRecord, AuthError>;
    async fn logout_all(&self, user_id: UserId) -> Result<(), AuthError>;
}
