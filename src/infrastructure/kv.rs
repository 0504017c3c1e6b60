use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("key-value store unavailable: {0}")]
    Unavailable(String),
}

impl From<KvError> for DomainError {
    fn from(e: KvError) -> Self {
        match e {
            KvError::Unavailable(msg) => DomainError::Unavailable(msg),
        }
    }
}

impl From<redis::RedisError> for KvError {
    fn from(e: redis::RedisError) -> Self {
        KvError::Unavailable(e.to_string())
    }
}

impl From<r2d2::Error> for KvError {
    fn from(e: r2d2::Error) -> Self {
        KvError::Unavailable(e.to_string())
    }
}

/// One page of an incremental set scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetScan {
    /// Where to resume; `0` once the scan has covered the whole set.
    pub cursor: u64,
    pub members: Vec<String>,
}

/// Primitives the order repository needs from a key-value backend.
///
/// `insert_indexed` and `delete_indexed` must each apply as a single atomic
/// unit: concurrent readers see either none or all of their effects.
pub trait KeyValueStore: Send + Sync + 'static {
    fn ping(&self) -> Result<(), KvError>;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;

    /// Values in the same order as `keys`, `None` for missing keys.
    fn mget(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>, KvError>;

    /// Overwrites `key` only if it already exists. Returns whether it did.
    fn set_if_present(&self, key: &str, value: &[u8]) -> Result<bool, KvError>;

    /// Sets `key` only if it is absent and, in the same unit, adds it to
    /// `set`. Returns `false` without touching anything if `key` exists.
    fn insert_indexed(&self, set: &str, key: &str, value: &[u8]) -> Result<bool, KvError>;

    /// Deletes `key` and removes it from `set` together. Returns `false`
    /// without touching `set` if `key` did not exist.
    fn delete_indexed(&self, set: &str, key: &str) -> Result<bool, KvError>;

    /// Incremental scan of `set` starting at `cursor` (`0` = beginning).
    /// `count` bounds the work per call; backends may treat it as a hint.
    fn scan_set(&self, set: &str, cursor: u64, count: u64) -> Result<SetScan, KvError>;

    fn set_members(&self, set: &str) -> Result<Vec<String>, KvError>;
}
