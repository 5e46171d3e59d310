// # Memory Entry Store
//
// In-memory implementation of EntryStore.
//
// ## Purpose
//
// Mirrors the table's observable behavior (unique addresses, store-assigned
// increasing ids) without a database. Useful for embedding and for testing
// code built on `RecordingService`.
//
// ## Crash Behavior
//
// - All entries are lost on restart
// - Ids restart from 1

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::traits::EntryStore;
use crate::Error;

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, i64>,
    last_id: i64,
}

/// In-memory entry store implementation
///
/// # Example
///
/// ```rust,no_run
/// use iprecord_core::{EntryStore, MemoryEntryStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryEntryStore::new();
///
///     let id = store.insert_entry("10.0.0.1").await?;
///     assert_eq!(store.get_id("10.0.0.1").await, Some(id));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryEntryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryEntryStore {
    /// Create a new empty memory entry store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of entries in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }

    /// Get the id recorded for an address
    pub async fn get_id(&self, ip_addr: &str) -> Option<i64> {
        self.inner.read().await.entries.get(ip_addr).copied()
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn insert_entry(&self, ip_addr: &str) -> Result<i64, Error> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let next_id = inner.last_id + 1;

        match inner.entries.entry(ip_addr.to_string()) {
            Entry::Occupied(_) => Err(Error::DuplicateAddress),
            Entry::Vacant(slot) => {
                slot.insert(next_id);
                inner.last_id = next_id;
                Ok(next_id)
            }
        }
    }
}
