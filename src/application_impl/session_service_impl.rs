use crate::application_port::*;
use crate::domain_model::UserId;
use crate::domain_port::{KvStore, UserRecord, UserRepo};
use futures_util::future::try_join_all;
use std::sync::Arc;
use uuid::Uuid;

/// Session service over a [`KvStore`].
///
/// Two entries exist per session:
/// 1. a forward entry mapping the token to the owning user id, read on
///    every authenticated request, and
/// 2. the token's membership in a per-user set (the reverse index), read
///    only when all of a user's sessions are revoked at once.
///
/// The two writes in [`create_session`](SessionService::create_session) are
/// independent store calls with no transaction around them: if the second
/// one is lost, the token still resolves but a later bulk revocation will
/// not find it.
pub struct KvSessionService {
    store: Arc<dyn KvStore>,
    user_repo: Arc<dyn UserRepo>,
}

impl KvSessionService {
    pub fn new(store: Arc<dyn KvStore>, user_repo: Arc<dyn UserRepo>) -> Self {
        KvSessionService { store, user_repo }
    }

    /// Forward-index key: holds the id of the user that owns the token.
    fn user_by_token(token: &str) -> String {
        format!("session:{}:user.id", token)
    }

    /// Reverse-index key: holds the set of all tokens the user owns.
    fn tokens_by_user(user_id: UserId) -> String {
        format!("user:{}:session.keys", user_id)
    }
}

#[async_trait::async_trait]
impl SessionService for KvSessionService {
    async fn create_session(&self, user_id: UserId) -> Result<SessionToken, AuthError> {
        let token = SessionToken(Uuid::new_v4().to_string());

        self.store
            .set(&Self::user_by_token(&token.0), &user_id.to_string())
            .await?;
        self.store
            .set_add(&Self::tokens_by_user(user_id), &token.0)
            .await?;

        Ok(token)
    }

    async fn get_session(&self, token: &SessionToken) -> Result<Option<UserRecord>, AuthError> {
        let Some(raw) = self.store.get(&Self::user_by_token(&token.0)).await? else {
            return Ok(None);
        };

        let user_id = raw
            .parse::<UserId>()
            .map_err(|e| AuthError::InternalError(format!("corrupt session entry: {e}")))?;

        self.user_repo.get_by_id(user_id).await
    }

    async fn revoke_sessions(&self, user_id: UserId) -> Result<(), AuthError> {
        let reverse_key = Self::tokens_by_user(user_id);

        let Some(tokens) = self.store.set_members(&reverse_key).await? else {
            return Ok(());
        };

        let mut keys: Vec<String> = tokens.iter().map(|t| Self::user_by_token(t)).collect();
        keys.push(reverse_key);

        // One removal per token plus the reverse-index set itself, all
        // in flight at once. A get_session racing this may still resolve
        // a token until its specific removal lands.
        try_join_all(keys.iter().map(|key| self.store.remove(key))).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_port::StorageTx;
    use crate::infra_memory::MemoryKvStore;
    use chrono::Utc;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    struct FakeUserRepo {
        users: Mutex<HashMap<UserId, UserRecord>>,
    }

    impl FakeUserRepo {
        fn with_user(user: UserRecord) -> Self {
            let mut users = HashMap::new();
            users.insert(user.user_id, user);
            FakeUserRepo {
                users: Mutex::new(users),
            }
        }

        fn delete_user(&self, user_id: UserId) {
            self.users.lock().unwrap().remove(&user_id);
        }
    }

    #[async_trait::async_trait]
    impl UserRepo for FakeUserRepo {
        async fn create_in_tx<'t>(
            &self,
            _tx: &mut dyn StorageTx<'t>,
            _user_id: UserId,
            _username: &str,
            _email: &str,
        ) -> Result<(), AuthError> {
            unimplemented!("not exercised by session tests")
        }

        async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, AuthError> {
            Ok(self.users.lock().unwrap().get(&user_id).cloned())
        }

        async fn conflict_exists(&self, _username: &str, _email: &str) -> Result<bool, AuthError> {
            unimplemented!("not exercised by session tests")
        }
    }

    fn test_user() -> UserRecord {
        UserRecord {
            user_id: UserId(Uuid::new_v4()),
            username: "aria.voss".to_string(),
            email: "aria@example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    fn service_for(user: UserRecord) -> (KvSessionService, Arc<MemoryKvStore>, Arc<FakeUserRepo>) {
        let store = Arc::new(MemoryKvStore::new());
        let user_repo = Arc::new(FakeUserRepo::with_user(user));
        let service = KvSessionService::new(store.clone(), user_repo.clone());
        (service, store, user_repo)
    }

    #[tokio::test]
    async fn create_then_get_resolves_the_owner() {
        let user = test_user();
        let (service, _, _) = service_for(user.clone());

        let token = service.create_session(user.user_id).await.unwrap();
        let resolved = service.get_session(&token).await.unwrap().unwrap();

        assert_eq!(resolved.user_id, user.user_id);
        assert_eq!(resolved.username, user.username);
    }

    #[tokio::test]
    async fn unknown_token_is_absent_every_time() {
        let (service, _, _) = service_for(test_user());
        let token = SessionToken(Uuid::new_v4().to_string());

        assert!(service.get_session(&token).await.unwrap().is_none());
        assert!(service.get_session(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn revoke_invalidates_every_session() {
        let user = test_user();
        let (service, _, _) = service_for(user.clone());

        let token1 = service.create_session(user.user_id).await.unwrap();
        let token2 = service.create_session(user.user_id).await.unwrap();

        service.revoke_sessions(user.user_id).await.unwrap();

        assert!(service.get_session(&token1).await.unwrap().is_none());
        assert!(service.get_session(&token2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn revoking_without_sessions_is_a_noop() {
        let user = test_user();
        let (service, _, _) = service_for(user.clone());

        service.revoke_sessions(user.user_id).await.unwrap();
    }

    #[tokio::test]
    async fn sessions_created_after_revocation_still_work() {
        let user = test_user();
        let (service, _, _) = service_for(user.clone());

        service.create_session(user.user_id).await.unwrap();
        service.create_session(user.user_id).await.unwrap();
        service.revoke_sessions(user.user_id).await.unwrap();

        let token = service.create_session(user.user_id).await.unwrap();
        let resolved = service.get_session(&token).await.unwrap();

        assert!(resolved.is_some());
    }

    #[tokio::test]
    async fn session_of_a_deleted_user_is_absent() {
        let user = test_user();
        let (service, _, user_repo) = service_for(user.clone());

        let token = service.create_session(user.user_id).await.unwrap();
        user_repo.delete_user(user.user_id);

        assert!(service.get_session(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn issued_tokens_do_not_collide() {
        let user = test_user();
        let (service, _, _) = service_for(user.clone());

        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let token = service.create_session(user.user_id).await.unwrap();
            assert!(seen.insert(token.0));
        }
    }

    #[tokio::test]
    async fn index_entries_use_the_expected_keys() {
        let user = test_user();
        let (service, store, _) = service_for(user.clone());

        let token = service.create_session(user.user_id).await.unwrap();

        let forward = store
            .get(&format!("session:{}:user.id", token.0))
            .await
            .unwrap();
        assert_eq!(forward, Some(user.user_id.to_string()));

        let reverse = store
            .set_members(&format!("user:{}:session.keys", user.user_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reverse, vec![token.0]);
    }
}
