use crate::application_port::AuthError;
use crate::domain_model::UserId;
use crate::domain_port::UserRecord;
use serde::Serialize;
use std::fmt;

/// Opaque session token handed to the client as a cookie or header value.
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken(pub String);

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Issue a fresh session token for the user.
    async fn create_session(&self, user_id: UserId) -> Result<SessionToken, AuthError>;

    /// Resolve a token to its user record. `None` when the token is unknown,
    /// already revoked, or the user no longer exists.
    async fn get_session(&self, token: &SessionToken) -> Result<Option<UserRecord>, AuthError>;

    /// Invalidate every active session of the user. Revoking a user with no
    /// sessions is a no-op.
    async fn revoke_sessions(&self, user_id: UserId) -> Result<(), AuthError>;
}
