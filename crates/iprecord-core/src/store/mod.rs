// # Entry Store Implementations
//
// Implementations of the EntryStore trait.

pub mod memory;
pub mod postgres;

pub use memory::MemoryEntryStore;
pub use postgres::PgEntryStore;
