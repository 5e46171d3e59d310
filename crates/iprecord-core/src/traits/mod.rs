//! Core traits for iprecord
//!
//! - [`EntryStore`]: Persist an address and hand back its identifier

pub mod entry_store;

pub use entry_store::EntryStore;
