use crate::domain_port::{KvStore, KvStoreError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Process-local [`KvStore`] backend.
///
/// Unlike Redis, which coerces quietly, this store rejects using the same
/// key as both a scalar and a set, so a miskeyed caller fails loudly.
pub struct MemoryKvStore {
    strings: Mutex<HashMap<String, String>>,
    sets: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        MemoryKvStore {
            strings: Mutex::new(HashMap::new()),
            sets: Mutex::new(HashMap::new()),
        }
    }

    fn strings(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, KvStoreError> {
        self.strings
            .lock()
            .map_err(|e| KvStoreError::Store(e.to_string()))
    }

    fn sets(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<String>>>, KvStoreError> {
        self.sets
            .lock()
            .map_err(|e| KvStoreError::Store(e.to_string()))
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvStoreError> {
        Ok(self.strings()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvStoreError> {
        if self.sets()?.contains_key(key) {
            return Err(KvStoreError::WrongKind(key.to_string()));
        }

        self.strings()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KvStoreError> {
        self.strings()?.remove(key);
        self.sets()?.remove(key);
        Ok(())
    }

    async fn set_add(&self, key: &str, value: &str) -> Result<(), KvStoreError> {
        if self.strings()?.contains_key(key) {
            return Err(KvStoreError::WrongKind(key.to_string()));
        }

        let mut sets = self.sets()?;
        let members = sets.entry(key.to_string()).or_default();
        if !members.iter().any(|m| m == value) {
            members.push(value.to_string());
        }
        Ok(())
    }

    async fn set_members(&self, key: &str) -> Result<Option<Vec<String>>, KvStoreError> {
        Ok(self.sets()?.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let store = MemoryKvStore::new();

        store.set("k", "v").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn missing_keys_read_as_absent() {
        let store = MemoryKvStore::new();

        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.set_members("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn overwrite_replaces_the_value() {
        let store = MemoryKvStore::new();

        store.set("k", "old").await.unwrap();
        store.set("k", "new").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn removing_an_absent_key_is_a_noop() {
        let store = MemoryKvStore::new();

        store.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn remove_clears_either_kind() {
        let store = MemoryKvStore::new();

        store.set("scalar", "v").await.unwrap();
        store.set_add("set", "m").await.unwrap();

        store.remove("scalar").await.unwrap();
        store.remove("set").await.unwrap();

        assert_eq!(store.get("scalar").await.unwrap(), None);
        assert_eq!(store.set_members("set").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_add_accumulates_members() {
        let store = MemoryKvStore::new();

        store.set_add("k", "a").await.unwrap();
        store.set_add("k", "b").await.unwrap();
        store.set_add("k", "a").await.unwrap();

        let members = store.set_members("k").await.unwrap().unwrap();
        assert_eq!(members, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn scalar_write_on_a_set_key_is_rejected() {
        let store = MemoryKvStore::new();

        store.set_add("k", "m").await.unwrap();

        assert!(matches!(
            store.set("k", "v").await,
            Err(KvStoreError::WrongKind(_))
        ));
    }

    #[tokio::test]
    async fn set_add_on_a_scalar_key_is_rejected() {
        let store = MemoryKvStore::new();

        store.set("k", "v").await.unwrap();

        assert!(matches!(
            store.set_add("k", "m").await,
            Err(KvStoreError::WrongKind(_))
        ));
    }
}
