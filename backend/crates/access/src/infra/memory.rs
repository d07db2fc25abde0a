//! In-Memory Profile Store
//!
//! Process-local store for tests and local development. Failures and slow
//! reads can be injected to exercise the resolver's fallback path.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::{RwLock, watch};

use crate::domain::entity::profile::ProfileRecord;
use crate::domain::repository::ProfileStore;
use crate::domain::value_object::identity_id::IdentityId;
use crate::error::{AccessError, AccessResult};

struct Inner {
    records: RwLock<HashMap<IdentityId, ProfileRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    read_count: AtomicU64,
    write_count: AtomicU64,
    /// While true, reads wait before touching the map
    reads_paused: watch::Sender<bool>,
}

/// Cheap to clone; clones share the same records
#[derive(Clone)]
pub struct InMemoryProfileStore {
    inner: Arc<Inner>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::with_records(std::iter::empty())
    }

    /// Store seeded with `records`; seeding does not count as writes
    pub fn with_records(records: impl IntoIterator<Item = (IdentityId, ProfileRecord)>) -> Self {
        let (reads_paused, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                records: RwLock::new(records.into_iter().collect()),
                fail_reads: AtomicBool::new(false),
                fail_writes: AtomicBool::new(false),
                read_count: AtomicU64::new(0),
                write_count: AtomicU64::new(0),
                reads_paused,
            }),
        }
    }

    /// Insert directly, bypassing failure injection and write counts
    pub async fn insert(&self, id: IdentityId, record: ProfileRecord) {
        self.inner.records.write().await.insert(id, record);
    }

    pub async fn get(&self, id: &IdentityId) -> Option<ProfileRecord> {
        self.inner.records.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Reads and writes both fail
    pub fn set_unreachable(&self, unreachable: bool) {
        self.set_fail_reads(unreachable);
        self.set_fail_writes(unreachable);
    }

    pub fn read_count(&self) -> u64 {
        self.inner.read_count.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> u64 {
        self.inner.write_count.load(Ordering::SeqCst)
    }

    /// Hold every read until [`Self::resume_reads`]
    pub fn pause_reads(&self) {
        self.inner.reads_paused.send_replace(true);
    }

    pub fn resume_reads(&self) {
        self.inner.reads_paused.send_replace(false);
    }
}

impl Default for InMemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore for InMemoryProfileStore {
    async fn get_by_id(&self, id: &IdentityId) -> AccessResult<Option<ProfileRecord>> {
        self.inner.read_count.fetch_add(1, Ordering::SeqCst);

        let mut paused = self.inner.reads_paused.subscribe();
        // The sender lives as long as `inner`, so this cannot observe a close
        let _ = paused.wait_for(|paused| !*paused).await;

        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(AccessError::StoreReadFailure(
                "in-memory store: reads disabled".to_string(),
            ));
        }

        Ok(self.inner.records.read().await.get(id).cloned())
    }

    async fn upsert(&self, id: &IdentityId, record: &ProfileRecord) -> AccessResult<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(AccessError::StoreWriteFailure(
                "in-memory store: writes disabled".to_string(),
            ));
        }

        self.inner.write_count.fetch_add(1, Ordering::SeqCst);
        self.inner
            .records
            .write()
            .await
            .insert(id.clone(), record.clone());
        Ok(())
    }
}
