// # PostgreSQL Entry Store
//
// Inserts into the pre-provisioned `ips` table (see db/ips.sql) and
// classifies driver errors.
//
// ## Classification
//
// - Unique-constraint violation (SQLSTATE 23505) → `Error::DuplicateAddress`
// - Anything else → `Error::Store` with context "create entry"
//
// Classification inspects the structured database error, never its message.

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::trace;

use crate::error::CREATE_ENTRY;
use crate::traits::EntryStore;
use crate::{Error, Result};

// The cast lets the same query serve SERIAL and BIGSERIAL id columns.
const INSERT_ENTRY_SQL: &str = "INSERT INTO ips (ip_addr) VALUES ($1) RETURNING id::BIGINT";

/// PostgreSQL-backed entry store
///
/// Holds a clone of the caller's pool. Dropping the store does not close
/// the pool; the code that opened it is responsible for that.
#[derive(Debug, Clone)]
pub struct PgEntryStore {
    pool: PgPool,
}

impl PgEntryStore {
    /// Create a store on top of an open pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn insert_entry(&self, ip_addr: &str) -> Result<i64> {
        trace!(ip_addr, "Inserting entry");

        sqlx::query_scalar::<_, i64>(INSERT_ENTRY_SQL)
            .bind(ip_addr)
            .fetch_one(&self.pool)
            .await
            .map_err(classify_insert_error)
    }
}

/// Map a driver error from the insert onto the crate's error taxonomy
pub(crate) fn classify_insert_error(err: sqlx::Error) -> Error {
    let is_duplicate = err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation());

    if is_duplicate {
        Error::DuplicateAddress
    } else {
        Error::store(CREATE_ENTRY, err)
    }
}
