use crate::domain_port::{KvStore, KvStoreError};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

pub struct RedisKvStore {
    conn: ConnectionManager,
}

impl RedisKvStore {
    pub fn new(conn: ConnectionManager) -> Self {
        RedisKvStore { conn }
    }
}

#[async_trait::async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvStoreError> {
        let mut conn = self.conn.clone();
        let val: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| KvStoreError::Store(e.to_string()))?;
        Ok(val)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvStoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set(key, value)
            .await
            .map_err(|e| KvStoreError::Store(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KvStoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(key)
            .await
            .map_err(|e| KvStoreError::Store(e.to_string()))?;
        Ok(())
    }

    async fn set_add(&self, key: &str, value: &str) -> Result<(), KvStoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .sadd(key, value)
            .await
            .map_err(|e| KvStoreError::Store(e.to_string()))?;
        Ok(())
    }

    async fn set_members(&self, key: &str) -> Result<Option<Vec<String>>, KvStoreError> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn
            .smembers(key)
            .await
            .map_err(|e| KvStoreError::Store(e.to_string()))?;

        // Redis drops a set key once it empties, so SMEMBERS cannot tell
        // "empty" from "absent". Both map to absent here.
        if members.is_empty() {
            Ok(None)
        } else {
            Ok(Some(members))
        }
    }
}
