// # Entry Store Trait
//
// Defines the single write the recording service needs from a store.
//
// ## Implementations
//
// - PostgreSQL (`PgEntryStore`): the production path
// - In-memory (`MemoryEntryStore`): embedding and tests

use async_trait::async_trait;

/// Trait for entry store implementations
///
/// Implementations must be safe to call concurrently from multiple tasks.
///
/// # Contract
///
/// - One call inserts at most one entry
/// - No retries: a failed insert is reported once and leaves nothing behind
/// - An address that is already stored fails with
///   [`crate::Error::DuplicateAddress`] and does not create a new entry
/// - The address is stored exactly as given
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Insert an entry for `ip_addr`
    ///
    /// # Returns
    ///
    /// - `Ok(i64)`: The identifier assigned by the store
    /// - `Err(Error::DuplicateAddress)`: The address is already stored
    /// - `Err(Error)`: Any other storage failure
    async fn insert_entry(&self, ip_addr: &str) -> Result<i64, crate::Error>;
}
