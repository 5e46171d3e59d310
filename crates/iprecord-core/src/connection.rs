// # Connection Opener
//
// Turns a key=value descriptor into a PostgreSQL pool.
//
// ## Behavior
//
// - The descriptor is split on whitespace; each token must be `key=value`
// - Recognised keys: host, port, user, password, dbname, sslmode
// - A repeated key overrides the earlier value
// - The pool is registered lazily: no connection is made until the first
//   statement runs, so an unreachable server surfaces as a store error on
//   first use, not as an open error
//
// ## Ownership
//
// The caller owns the returned pool and must call `PgPool::close` exactly
// once when finished. Services built on top of it only hold clones.

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::debug;

use crate::{Error, Result};

/// Open a pool from a descriptor using the driver's default pool options
///
/// Must be called from within a Tokio runtime.
///
/// With the default options a refused or unreachable server is not reported
/// right away: the pool keeps retrying the connection until its 30 second
/// acquire timeout runs out, and the first statement then fails with
/// `Error::Store` whose source is `sqlx::Error::PoolTimedOut`, not the
/// underlying I/O error. Use [`open_with`] and
/// `PgPoolOptions::acquire_timeout` to bound that wait.
///
/// # Example
///
/// ```rust,no_run
/// use iprecord_core::{DatabaseConfig, open};
///
/// #[tokio::main]
/// async fn main() -> iprecord_core::Result<()> {
///     let pool = open(&DatabaseConfig::default().descriptor())?;
///     // ... use the pool ...
///     pool.close().await;
///     Ok(())
/// }
/// ```
pub fn open(descriptor: &str) -> Result<PgPool> {
    open_with(descriptor, PgPoolOptions::new())
}

/// Open a pool from a descriptor with caller-supplied pool options
pub fn open_with(descriptor: &str, pool_options: PgPoolOptions) -> Result<PgPool> {
    let connect_options = parse_descriptor(descriptor)?;

    debug!(
        host = connect_options.get_host(),
        port = connect_options.get_port(),
        database = connect_options.get_database(),
        "Registering lazy connection pool"
    );

    Ok(pool_options.connect_lazy_with(connect_options))
}

/// Parse a descriptor into driver connection options
pub(crate) fn parse_descriptor(descriptor: &str) -> Result<PgConnectOptions> {
    let mut options = PgConnectOptions::new();

    for token in descriptor.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            return Err(Error::open(format!(
                "malformed descriptor token '{token}', expected key=value"
            )));
        };

        options = match key {
            "host" => options.host(value),
            "port" => {
                let port = value
                    .parse::<u16>()
                    .map_err(|e| Error::open(format!("invalid port '{value}': {e}")))?;
                options.port(port)
            }
            "user" => options.username(value),
            "password" => options.password(value),
            "dbname" => options.database(value),
            "sslmode" => {
                let mode = value.parse::<PgSslMode>().map_err(Error::Open)?;
                options.ssl_mode(mode)
            }
            other => {
                return Err(Error::open(format!("unknown descriptor key '{other}'")));
            }
        };
    }

    Ok(options)
}
