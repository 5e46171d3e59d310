//! Test doubles and common utilities for recording contract tests

#![allow(dead_code)]

use iprecord_core::error::{CREATE_ENTRY, Result};
use iprecord_core::{DatabaseConfig, EntryStore, Error, MemoryEntryStore, open};
use sqlx::postgres::PgPool;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

/// Environment variable naming an existing PostgreSQL database to use
/// instead of a container, e.g. `host=localhost port=5432 user=user password=admin1
/// dbname=demo sslmode=disable`
pub const TEST_DESCRIPTOR_ENV: &str = "IPRECORD_TEST_DESCRIPTOR";

/// Table definition the store expects to exist
pub const SCHEMA_SQL: &str = include_str!("../../../../db/ips.sql");

/// A MemoryEntryStore wrapper that counts insert calls
pub struct CountingEntryStore {
    inner: MemoryEntryStore,
    insert_call_count: Arc<AtomicUsize>,
}

impl CountingEntryStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryEntryStore::new(),
            insert_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times insert_entry() was called
    pub fn insert_call_count(&self) -> usize {
        self.insert_call_count.load(Ordering::SeqCst)
    }

    /// The wrapped store
    pub fn inner(&self) -> &MemoryEntryStore {
        &self.inner
    }
}

#[async_trait::async_trait]
impl EntryStore for CountingEntryStore {
    async fn insert_entry(&self, ip_addr: &str) -> Result<i64> {
        self.insert_call_count.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_entry(ip_addr).await
    }
}

/// A store whose every insert fails as if the server were unreachable
pub struct UnreachableEntryStore {
    insert_call_count: Arc<AtomicUsize>,
}

impl UnreachableEntryStore {
    pub fn new() -> Self {
        Self {
            insert_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times insert_entry() was called
    pub fn insert_call_count(&self) -> usize {
        self.insert_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EntryStore for UnreachableEntryStore {
    async fn insert_entry(&self, _ip_addr: &str) -> Result<i64> {
        self.insert_call_count.fetch_add(1, Ordering::SeqCst);
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        Err(Error::store(CREATE_ENTRY, sqlx::Error::Io(io)))
    }
}

/// A PostgreSQL database with the `ips` table provisioned
///
/// Uses the server named by `IPRECORD_TEST_DESCRIPTOR` when it is set.
/// Otherwise a `postgres:15.2-alpine` container is started with the default
/// configuration's credentials and `db/ips.sql` as its init script. The
/// container is removed when this value is dropped.
pub struct TestDatabase {
    pub pool: PgPool,
    _container: Option<ContainerAsync<Postgres>>,
}

impl TestDatabase {
    pub async fn start() -> Self {
        if let Ok(descriptor) = std::env::var(TEST_DESCRIPTOR_ENV)
            && !descriptor.trim().is_empty()
        {
            let pool = open(&descriptor).expect("open succeeds");
            provision_schema(&pool).await;
            return Self {
                pool,
                _container: None,
            };
        }

        let defaults = DatabaseConfig::default();
        let container = Postgres::default()
            .with_db_name(&defaults.database)
            .with_user(&defaults.username)
            .with_password(&defaults.password)
            .with_init_sql(SCHEMA_SQL.as_bytes().to_vec())
            .with_tag("15.2-alpine")
            .start()
            .await
            .expect("postgres container starts");

        let host = container.get_host().await.expect("container host");
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("container port");

        let config = DatabaseConfig {
            host: host.to_string(),
            port: port.to_string(),
            ..defaults
        };
        let pool = open(&config.descriptor()).expect("open succeeds");

        Self {
            pool,
            _container: Some(container),
        }
    }

    /// Close the pool; the container goes away on drop
    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Create the `ips` table if it does not exist yet
pub async fn provision_schema(pool: &PgPool) {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .expect("schema provisioning succeeds");
}

/// Make an address unique to this test run so reruns against a shared
/// database do not collide with earlier entries
pub fn unique_address(base: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_nanos();
    format!("{base}#{}-{nanos}", std::process::id())
}
