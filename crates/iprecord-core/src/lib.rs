// # iprecord-core
//
// Core library for recording IP addresses in a relational store.
//
// ## Architecture Overview
//
// - **DatabaseConfig**: Connection parameters rendered into a descriptor string
// - **connection**: Opens a PostgreSQL pool from a descriptor
// - **EntryStore**: Trait for the single insert the service needs
// - **RecordingService**: Records an address and classifies duplicates
//
// ## Design Principles
//
// 1. **Injected connection**: The service never opens or closes the pool
// 2. **Typed errors**: Duplicates are a sentinel variant, not message text
// 3. **Opaque input**: Addresses are stored exactly as supplied

pub mod config;
pub mod connection;
pub mod error;
pub mod service;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::DatabaseConfig;
pub use connection::{open, open_with};
pub use error::{Error, Result};
pub use service::{RecordedEntry, RecordingService};
pub use store::{MemoryEntryStore, PgEntryStore};
pub use traits::EntryStore;
