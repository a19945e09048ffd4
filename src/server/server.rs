use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use sqlx::{MySql, Pool};
use std::sync::Arc;

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub project_service: Arc<dyn ProjectService>,
    pool: Pool<MySql>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let kv_store: Arc<dyn KvStore> = match settings.store.backend.as_str() {
            "memory" => Arc::new(MemoryKvStore::new()),
            "redis" => {
                let redis_client = redis::Client::open(settings.store.redis_url.as_str())?;
                let redis_manager = redis_client.get_connection_manager().await?;
                Arc::new(RedisKvStore::new(redis_manager))
            }
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        let pool = Pool::<MySql>::connect(&settings.store.mysql_url).await?;
        let tx_manager: Arc<dyn TxManager> = Arc::new(MySqlTxManager::new(pool.clone()));

        let credential_hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2PasswordHasher {});
        let auth_repo: Arc<dyn AuthRepo> = Arc::new(MySqlAuthRepo::new(pool.clone()));
        let user_repo: Arc<dyn UserRepo> = Arc::new(MySqlUserRepo::new(pool.clone()));
        let project_repo: Arc<dyn ProjectRepo> = Arc::new(MySqlProjectRepo::new(pool.clone()));
        let role_repo: Arc<dyn RoleRepo> = Arc::new(MySqlRoleRepo::new());

        let session_service: Arc<dyn SessionService> =
            Arc::new(KvSessionService::new(kv_store, user_repo.clone()));

        let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(
            auth_repo,
            user_repo.clone(),
            credential_hasher,
            session_service,
            tx_manager.clone(),
        ));

        let project_service: Arc<dyn ProjectService> = Arc::new(RealProjectService::new(
            project_repo,
            role_repo,
            tx_manager.clone(),
        ));

        info!("server started");

        Ok(Self {
            auth_service,
            project_service,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");
        self.pool.close().await;
    }
}
