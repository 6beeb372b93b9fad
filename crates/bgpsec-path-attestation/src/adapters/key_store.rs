//! # Snapshot Key Store
//!
//! In-memory `KeyStore` holding the current [`KeySnapshot`] behind a
//! read-mostly lock. Writers clone the snapshot, change the clone and swap
//! it in, so readers holding the old `Arc` finish against a consistent view.

use crate::domain::entities::KeyRecord;
use crate::domain::errors::KeyStoreError;
use crate::domain::key_snapshot::KeySnapshot;
use crate::ports::outbound::KeyStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{AsNumber, KeyId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

pub struct SnapshotKeyStore {
    current: RwLock<Arc<KeySnapshot>>,
    generation: AtomicU64,
}

impl SnapshotKeyStore {
    pub fn new(snapshot: KeySnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            generation: AtomicU64::new(0),
        }
    }

    /// The snapshot in effect right now.
    pub fn snapshot(&self) -> Arc<KeySnapshot> {
        self.current.read().clone()
    }

    /// Number of updates applied since creation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Replace the whole key set, e.g. after an RPKI refresh.
    pub fn rotate(&self, snapshot: KeySnapshot) -> u64 {
        let keys = snapshot.len();
        *self.current.write() = Arc::new(snapshot);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(generation, keys, "key snapshot rotated");
        generation
    }

    /// Add or replace one key.
    pub fn provision(&self, record: KeyRecord) -> u64 {
        let (asn, key_id) = (record.asn, record.key_id);
        let generation = self.update(|snapshot| {
            snapshot.insert(record);
        });
        info!(generation, asn = %asn, key_id = %key_id, "router key provisioned");
        generation
    }

    /// Mark one key revoked. Returns false if it was never provisioned.
    pub fn revoke(&self, asn: AsNumber, key_id: KeyId) -> bool {
        let mut found = false;
        let generation = self.update(|snapshot| {
            found = snapshot.revoke(asn, key_id);
        });
        if found {
            info!(generation, asn = %asn, key_id = %key_id, "router key revoked");
        }
        found
    }

    fn update(&self, edit: impl FnOnce(&mut KeySnapshot)) -> u64 {
        let mut guard = self.current.write();
        let mut next = KeySnapshot::clone(&guard);
        edit(&mut next);
        *guard = Arc::new(next);
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }
}

impl Default for SnapshotKeyStore {
    fn default() -> Self {
        Self::new(KeySnapshot::new())
    }
}

#[async_trait]
impl KeyStore for SnapshotKeyStore {
    async fn lookup(&self, asn: AsNumber, key_id: KeyId) -> Result<KeyRecord, KeyStoreError> {
        self.snapshot().lookup(asn, key_id)
    }
}
