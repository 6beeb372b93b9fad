//! # Key Snapshot
//!
//! An immutable view of provisioned router keys, keyed by (AS, key id).
//! Snapshots are shared behind an `Arc`; changing keys means building a new
//! snapshot, so a verification in flight never sees a half-applied update.

use super::entities::KeyRecord;
use super::errors::KeyStoreError;
use shared_types::{AsNumber, KeyId};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct KeySnapshot {
    records: HashMap<(AsNumber, KeyId), KeyRecord>,
}

impl KeySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from records; later duplicates replace earlier ones.
    pub fn from_records(records: impl IntoIterator<Item = KeyRecord>) -> Self {
        let mut snapshot = Self::new();
        for record in records {
            snapshot.insert(record);
        }
        snapshot
    }

    pub fn with_record(mut self, record: KeyRecord) -> Self {
        self.insert(record);
        self
    }

    /// Insert or replace a record. Returns the replaced record.
    pub fn insert(&mut self, record: KeyRecord) -> Option<KeyRecord> {
        self.records.insert((record.asn, record.key_id), record)
    }

    /// Mark a key revoked. Returns false if it is not present.
    pub fn revoke(&mut self, asn: AsNumber, key_id: KeyId) -> bool {
        match self.records.get_mut(&(asn, key_id)) {
            Some(record) => {
                record.revoked = true;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, asn: AsNumber, key_id: KeyId) -> Option<KeyRecord> {
        self.records.remove(&(asn, key_id))
    }

    pub fn get(&self, asn: AsNumber, key_id: KeyId) -> Option<&KeyRecord> {
        self.records.get(&(asn, key_id))
    }

    /// Synchronous lookup with the same contract as the key store port.
    pub fn lookup(&self, asn: AsNumber, key_id: KeyId) -> Result<KeyRecord, KeyStoreError> {
        self.get(asn, key_id)
            .cloned()
            .ok_or(KeyStoreError::NotFound { asn, key_id })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
