#[derive(Debug, thiserror::Error)]
pub enum KvStoreError {
    /// Key already holds a value of the other kind (scalar vs set).
    #[error("key {0} holds a value of the wrong kind")]
    WrongKind(String),
    #[error("store error: {0}")]
    Store(String),
}

/// Minimal facade over a networked key-value store.
///
/// A key holds either a single string or a set of strings, never both.
/// Callers keep the two kinds on disjoint keys; an implementation may
/// reject a mixed use with [`KvStoreError::WrongKind`] or coerce silently,
/// depending on what the backing store does.
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    /// Read a single string value. `None` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, KvStoreError>;

    /// Write or overwrite a single string value.
    async fn set(&self, key: &str, value: &str) -> Result<(), KvStoreError>;

    /// Delete a key of either kind. Deleting an absent key is a no-op.
    async fn remove(&self, key: &str) -> Result<(), KvStoreError>;

    /// Add a value to the set at `key`, creating the set if absent.
    async fn set_add(&self, key: &str, value: &str) -> Result<(), KvStoreError>;

    /// All members of the set at `key`, or `None` when the key does not exist.
    async fn set_members(&self, key: &str) -> Result<Option<Vec<String>>, KvStoreError>;
}
