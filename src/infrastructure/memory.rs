//! In-process key-value backend for development and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use super::kv::{KeyValueStore, KvError, SetScan};

/// Set whose members keep the sequence number they were added with.
///
/// Scanning walks members in sequence order and the cursor is the sequence
/// number of the next member to return, so removals between calls never
/// shift the position of members that have not been returned yet.
#[derive(Debug, Default)]
struct SequencedSet {
    by_seq: BTreeMap<u64, String>,
    seq_of: HashMap<String, u64>,
    next_seq: u64,
}

impl SequencedSet {
    fn add(&mut self, member: &str) {
        if self.seq_of.contains_key(member) {
            return;
        }
        // Zero is reserved for "start of scan".
        self.next_seq += 1;
        self.by_seq.insert(self.next_seq, member.to_string());
        self.seq_of.insert(member.to_string(), self.next_seq);
    }

    fn remove(&mut self, member: &str) {
        if let Some(seq) = self.seq_of.remove(member) {
            self.by_seq.remove(&seq);
        }
    }

    fn scan(&self, cursor: u64, count: u64) -> SetScan {
        let count = usize::try_from(count.max(1)).unwrap_or(usize::MAX);
        let mut iter = self.by_seq.range(cursor..);
        let members: Vec<String> = iter.by_ref().take(count).map(|(_, m)| m.clone()).collect();
        let cursor = iter.next().map(|(seq, _)| *seq).unwrap_or(0);
        SetScan { cursor, members }
    }
}

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, Vec<u8>>,
    sets: HashMap<String, SequencedSet>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, KvError> {
        self.inner
            .lock()
            .map_err(|_| KvError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Keys that currently hold a value.
    #[cfg(test)]
    pub(crate) fn keys(&self) -> Result<Vec<String>, KvError> {
        Ok(self.lock()?.values.keys().cloned().collect())
    }

    /// Writes a raw value with no index bookkeeping.
    #[cfg(test)]
    pub(crate) fn put_raw(&self, key: &str, value: &[u8]) -> Result<(), KvError> {
        self.lock()?.values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    /// Drops a value while leaving any set membership in place.
    #[cfg(test)]
    pub(crate) fn remove_raw(&self, key: &str) -> Result<(), KvError> {
        self.lock()?.values.remove(key);
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn ping(&self) -> Result<(), KvError> {
        self.lock().map(|_| ())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        Ok(self.lock()?.values.get(key).cloned())
    }

    fn mget(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>, KvError> {
        let inner = self.lock()?;
        Ok(keys.iter().map(|k| inner.values.get(k).cloned()).collect())
    }

    fn set_if_present(&self, key: &str, value: &[u8]) -> Result<bool, KvError> {
        let mut inner = self.lock()?;
        match inner.values.get_mut(key) {
            Some(slot) => {
                *slot = value.to_vec();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn insert_indexed(&self, set: &str, key: &str, value: &[u8]) -> Result<bool, KvError> {
        let mut inner = self.lock()?;
        if inner.values.contains_key(key) {
            return Ok(false);
        }
        inner.values.insert(key.to_string(), value.to_vec());
        inner.sets.entry(set.to_string()).or_default().add(key);
        Ok(true)
    }

    fn delete_indexed(&self, set: &str, key: &str) -> Result<bool, KvError> {
        let mut inner = self.lock()?;
        if inner.values.remove(key).is_none() {
            return Ok(false);
        }
        if let Some(members) = inner.sets.get_mut(set) {
            members.remove(key);
        }
        Ok(true)
    }

    fn scan_set(&self, set: &str, cursor: u64, count: u64) -> Result<SetScan, KvError> {
        let inner = self.lock()?;
        Ok(match inner.sets.get(set) {
            Some(members) => members.scan(cursor, count),
            None => SetScan {
                cursor: 0,
                members: Vec::new(),
            },
        })
    }

    fn set_members(&self, set: &str) -> Result<Vec<String>, KvError> {
        let inner = self.lock()?;
        Ok(inner
            .sets
            .get(set)
            .map(|members| members.by_seq.values().cloned().collect())
            .unwrap_or_default())
    }
}
