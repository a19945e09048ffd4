use crate::application_port::*;
use crate::domain_model::UserId;
use crate::domain_port::{AuthRepo, TxManager, UserRecord, UserRepo};
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::sync::Arc;
use uuid::Uuid;

pub struct Argon2PasswordHasher;

#[async_trait::async_trait]
impl CredentialHasher for Argon2PasswordHasher {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = argon2::password_hash::SaltString::generate(&mut OsRng);
        let argon2 = argon2::Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    async fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::InternalError(format!("invalid PHC hash: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::InternalError(format!("verify error: {}", e))),
        }
    }
}

pub struct RealAuthService {
    auth_repo: Arc<dyn AuthRepo>,
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
    session_service: Arc<dyn SessionService>,
    tx_manager: Arc<dyn TxManager>,
}

impl RealAuthService {
    pub fn new(
        auth_repo: Arc<dyn AuthRepo>,
        user_repo: Arc<dyn UserRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
        session_service: Arc<dyn SessionService>,
        tx_manager: Arc<dyn TxManager>,
    ) -> Self {
        Self {
            auth_repo,
            user_repo,
            credential_hasher,
            session_service,
            tx_manager,
        }
    }

    #[inline]
    fn new_user_id() -> UserId {
        UserId(Uuid::new_v4())
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn signup(&self, request: SignupInput) -> Result<UserId, AuthError> {
        let SignupInput {
            username,
            email,
            password,
        } = request;

        if self.user_repo.conflict_exists(&username, &email).await? {
            return Err(AuthError::UserExists);
        }

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let user_id = Self::new_user_id();

        self.user_repo
            .create_in_tx(tx.as_mut(), user_id, &username, &email)
            .await?;

        let password_hash = self.credential_hasher.hash_password(&password).await?;
        self.auth_repo
            .create_credentials_in_tx(tx.as_mut(), user_id, &username, &password_hash)
            .await?;

        tx.commit()
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(user_id)
    }

    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError> {
        let LoginInput { username, password } = request;

        let rec = self
            .auth_repo
            .get_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !rec.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        let ok = self
            .credential_hasher
            .verify_password(&password, &rec.password_hash)
            .await?;
        if !ok {
            return Err(AuthError::InvalidCredentials);
        }

        let session_token = self.session_service.create_session(rec.user_id).await?;

        Ok(LoginResult {
            user_id: rec.user_id,
            session_token,
        })
    }

    async fn authenticate(&self, token: &SessionToken) -> Result<UserRecord, AuthError> {
        self.session_service
            .get_session(token)
            .await?
            .ok_or(AuthError::SessionInvalid)
    }

    async fn logout_all(&self, user_id: UserId) -> Result<(), AuthError> {
        self.session_service.revoke_sessions(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::KvSessionService;
    use crate::domain_port::{AuthCredentialsRecord, StorageTx};
    use crate::infra_memory::MemoryKvStore;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct NoopTx;

    #[async_trait::async_trait]
    impl<'t> StorageTx<'t> for NoopTx {
        async fn commit(self: Box<Self>) -> anyhow::Result<()> {
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct NoopTxManager;

    #[async_trait::async_trait]
    impl TxManager for NoopTxManager {
        async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>> {
            Ok(Box::new(NoopTx))
        }
    }

    #[derive(Default)]
    struct InMemoryAccounts {
        users: Mutex<HashMap<UserId, UserRecord>>,
        credentials: Mutex<HashMap<String, AuthCredentialsRecord>>,
    }

    impl InMemoryAccounts {
        fn deactivate(&self, username: &str) {
            self.credentials
                .lock()
                .unwrap()
                .get_mut(username)
                .unwrap()
                .is_active = false;
        }
    }

    #[async_trait::async_trait]
    impl UserRepo for InMemoryAccounts {
        async fn create_in_tx<'t>(
            &self,
            _tx: &mut dyn StorageTx<'t>,
            user_id: UserId,
            username: &str,
            email: &str,
        ) -> Result<(), AuthError> {
            self.users.lock().unwrap().insert(
                user_id,
                UserRecord {
                    user_id,
                    username: username.to_string(),
                    email: email.to_string(),
                    created_at: Utc::now(),
                },
            );
            Ok(())
        }

        async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, AuthError> {
            Ok(self.users.lock().unwrap().get(&user_id).cloned())
        }

        async fn conflict_exists(&self, username: &str, email: &str) -> Result<bool, AuthError> {
            let conflict = self
                .users
                .lock()
                .unwrap()
                .values()
                .any(|u| u.username == username || u.email == email);
            Ok(conflict)
        }
    }

    #[async_trait::async_trait]
    impl AuthRepo for InMemoryAccounts {
        async fn create_credentials_in_tx<'t>(
            &self,
            _tx: &mut dyn StorageTx<'t>,
            user_id: UserId,
            username: &str,
            password_hash: &str,
        ) -> Result<(), AuthError> {
            self.credentials.lock().unwrap().insert(
                username.to_string(),
                AuthCredentialsRecord {
                    user_id,
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                    is_active: true,
                    created_at: Utc::now(),
                },
            );
            Ok(())
        }

        async fn get_by_username(
            &self,
            username: &str,
        ) -> Result<Option<AuthCredentialsRecord>, AuthError> {
            Ok(self.credentials.lock().unwrap().get(username).cloned())
        }
    }

    fn test_service() -> (RealAuthService, Arc<InMemoryAccounts>) {
        let accounts = Arc::new(InMemoryAccounts::default());
        let store = Arc::new(MemoryKvStore::new());
        let session_service = Arc::new(KvSessionService::new(store, accounts.clone()));

        let service = RealAuthService::new(
            accounts.clone(),
            accounts.clone(),
            Arc::new(Argon2PasswordHasher),
            session_service,
            Arc::new(NoopTxManager),
        );
        (service, accounts)
    }

    fn signup_input() -> SignupInput {
        SignupInput {
            username: "aria.voss".to_string(),
            email: "aria@example.com".to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn signup_then_login_resolves_a_session() {
        let (service, _) = test_service();

        let user_id = service.signup(signup_input()).await.unwrap();
        let result = service
            .login(LoginInput {
                username: "aria.voss".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.user_id, user_id);

        let user = service.authenticate(&result.session_token).await.unwrap();
        assert_eq!(user.user_id, user_id);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() {
        let (service, _) = test_service();
        service.signup(signup_input()).await.unwrap();

        let err = service
            .login(LoginInput {
                username: "aria.voss".to_string(),
                password: "wrong horse".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_with_unknown_username_is_rejected() {
        let (service, _) = test_service();

        let err = service
            .login(LoginInput {
                username: "nobody".to_string(),
                password: "whatever".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_against_a_deactivated_account_is_rejected() {
        let (service, accounts) = test_service();
        service.signup(signup_input()).await.unwrap();
        accounts.deactivate("aria.voss");

        let err = service
            .login(LoginInput {
                username: "aria.voss".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn signup_with_a_taken_username_is_rejected() {
        let (service, _) = test_service();
        service.signup(signup_input()).await.unwrap();

        let mut input = signup_input();
        input.email = "other@example.com".to_string();
        let err = service.signup(input).await.unwrap_err();

        assert!(matches!(err, AuthError::UserExists));
    }

    #[tokio::test]
    async fn logout_all_invalidates_every_open_session() {
        let (service, _) = test_service();
        let user_id = service.signup(signup_input()).await.unwrap();

        let login = LoginInput {
            username: "aria.voss".to_string(),
            password: "correct horse".to_string(),
        };
        let first = service.login(login.clone()).await.unwrap();
        let second = service.login(login).await.unwrap();

        service.logout_all(user_id).await.unwrap();

        for token in [first.session_token, second.session_token] {
            let err = service.authenticate(&token).await.unwrap_err();
            assert!(matches!(err, AuthError::SessionInvalid));
        }
    }
}
