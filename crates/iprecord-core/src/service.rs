//! Recording service
//!
//! Wraps an [`EntryStore`] and exposes the one domain operation: record an
//! IP address.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::store::PgEntryStore;
use crate::traits::EntryStore;
use crate::Result;

/// An address together with the identifier the store assigned to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEntry {
    /// Store-assigned identifier
    pub id: i64,
    /// The address exactly as supplied
    pub ip_addr: String,
}

/// Records IP addresses in an entry store
///
/// Cloning is cheap; clones share the same store. The service never closes
/// the underlying connection.
///
/// # Example
///
/// ```rust,no_run
/// use iprecord_core::{DatabaseConfig, Error, RecordingService, open};
///
/// #[tokio::main]
/// async fn main() -> iprecord_core::Result<()> {
///     let pool = open(&DatabaseConfig::default().descriptor())?;
///     let service = RecordingService::with_pool(pool.clone());
///
///     match service.record("12.123.1.1").await {
///         Ok(entry) => println!("recorded {} as {}", entry.ip_addr, entry.id),
///         Err(Error::DuplicateAddress) => println!("already recorded"),
///         Err(e) => return Err(e),
///     }
///
///     pool.close().await;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct RecordingService {
    store: Arc<dyn EntryStore>,
}

impl RecordingService {
    /// Create a service on top of any entry store
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Self { store }
    }

    /// Create a service that writes through an open PostgreSQL pool
    pub fn with_pool(pool: PgPool) -> Self {
        Self::new(Arc::new(PgEntryStore::new(pool)))
    }

    /// Record an address
    ///
    /// The address is not validated or normalised. Exactly one insert is
    /// attempted; failures are returned as-is and never retried.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::DuplicateAddress`] if the address is already recorded
    /// - [`crate::Error::Store`] for any other store failure
    pub async fn record(&self, ip_addr: &str) -> Result<RecordedEntry> {
        let id = self.store.insert_entry(ip_addr).await?;

        debug!(id, ip_addr, "Recorded entry");

        Ok(RecordedEntry {
            id,
            ip_addr: ip_addr.to_string(),
        })
    }
}

impl std::fmt::Debug for RecordingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingService").finish_non_exhaustive()
    }
}
