// # iprecord - record IP addresses
//
// Thin front end over iprecord-core. It reads configuration from
// environment variables, opens the pool, records every address it is given
// and closes the pool exactly once.
//
// Addresses are taken from the command line. With no arguments, one address
// is read per non-empty line of stdin.
//
// ## Configuration
//
// ### Database
// - `IPRECORD_DB_HOST`: Server host (default: localhost)
// - `IPRECORD_DB_PORT`: Server port (default: 5432)
// - `IPRECORD_DB_USER`: Role (default: user)
// - `IPRECORD_DB_PASSWORD`: Password (default: admin1)
// - `IPRECORD_DB_NAME`: Database name (default: demo)
// - `IPRECORD_DB_SSLMODE`: SSL mode (default: disable)
// - `IPRECORD_ACQUIRE_TIMEOUT_SECS`: Pool acquire timeout (default: 30)
//
// ### Output
// - `IPRECORD_OUTPUT`: `text` (`<id> <ip>`) or `json` (one object per line)
// - `IPRECORD_LOG_LEVEL`: trace, debug, info, warn, error (logs go to stderr)
//
// ## Example
//
// ```bash
// export IPRECORD_DB_HOST=db.internal
// export IPRECORD_DB_PASSWORD=secret
//
// iprecord 12.123.1.1 123.123.123.1
// ```

use anyhow::{Context, Result};
use iprecord_core::{DatabaseConfig, Error, RecordingService, open_with};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Every address recorded or already present
/// - 1: Configuration error or the connection could not be opened
/// - 2: Runtime error (store failure, unreadable input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordExitCode {
    /// All addresses handled
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<RecordExitCode> for ExitCode {
    fn from(code: RecordExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// How recorded entries are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

/// Application configuration
struct Config {
    database: DatabaseConfig,
    acquire_timeout_secs: u64,
    output: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a variable lookup function
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = DatabaseConfig::default();

        let acquire_timeout_secs = match lookup("IPRECORD_ACQUIRE_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().with_context(|| {
                format!("IPRECORD_ACQUIRE_TIMEOUT_SECS must be a whole number. Got: {value}")
            })?,
            None => 30,
        };

        Ok(Self {
            database: DatabaseConfig {
                host: lookup("IPRECORD_DB_HOST").unwrap_or(defaults.host),
                port: lookup("IPRECORD_DB_PORT").unwrap_or(defaults.port),
                username: lookup("IPRECORD_DB_USER").unwrap_or(defaults.username),
                password: lookup("IPRECORD_DB_PASSWORD").unwrap_or(defaults.password),
                database: lookup("IPRECORD_DB_NAME").unwrap_or(defaults.database),
                ssl_mode: lookup("IPRECORD_DB_SSLMODE").unwrap_or(defaults.ssl_mode),
            },
            acquire_timeout_secs,
            output: lookup("IPRECORD_OUTPUT").unwrap_or_else(|| "text".to_string()),
            log_level: lookup("IPRECORD_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Returns the parsed log level and output format.
    fn validate(&self) -> Result<(Level, OutputFormat)> {
        self.database
            .validate()
            .context("Invalid IPRECORD_DB_* settings")?;

        if !(1..=300).contains(&self.acquire_timeout_secs) {
            anyhow::bail!(
                "IPRECORD_ACQUIRE_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.acquire_timeout_secs
            );
        }

        Ok((self.max_level()?, self.output_format()?))
    }

    fn output_format(&self) -> Result<OutputFormat> {
        match self.output.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => anyhow::bail!(
                "IPRECORD_OUTPUT '{}' is not valid. Valid formats: text, json",
                self.output
            ),
        }
    }

    fn max_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "IPRECORD_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new().acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }
}

/// Counts reported at the end of a run
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    recorded: usize,
    duplicates: usize,
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return RecordExitCode::ConfigError.into();
        }
    };

    let (log_level, output) = match config.validate() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Configuration validation error: {:#}", e);
            return RecordExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return RecordExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return RecordExitCode::RuntimeError.into();
        }
    };

    let args: Vec<String> = env::args().skip(1).collect();
    rt.block_on(run(config, output, args)).into()
}

/// Open the pool, record every address and close the pool
async fn run(config: Config, output: OutputFormat, args: Vec<String>) -> RecordExitCode {
    info!(
        host = %config.database.host,
        port = %config.database.port,
        database = %config.database.database,
        "Starting iprecord"
    );

    let addresses = if args.is_empty() {
        match read_addresses(tokio::io::stdin()).await {
            Ok(addresses) => addresses,
            Err(e) => {
                error!("Failed to read addresses from stdin: {:#}", e);
                return RecordExitCode::RuntimeError;
            }
        }
    } else {
        args
    };

    let pool = match open_with(&config.database.descriptor(), config.pool_options()) {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open connection: {:#}", anyhow::Error::from(e));
            return RecordExitCode::ConfigError;
        }
    };

    let service = RecordingService::with_pool(pool.clone());
    let result = record_all(&service, &addresses, output).await;

    pool.close().await;

    match result {
        Ok(summary) => {
            info!(
                "Recorded {} address(es), {} already present",
                summary.recorded, summary.duplicates
            );
            RecordExitCode::Success
        }
        Err(e) => {
            error!("{:#}", e);
            RecordExitCode::RuntimeError
        }
    }
}

/// Record addresses in order, stopping at the first store failure
async fn record_all(
    service: &RecordingService,
    addresses: &[String],
    output: OutputFormat,
) -> Result<Summary> {
    let mut summary = Summary::default();

    for ip_addr in addresses {
        match service.record(ip_addr).await {
            Ok(entry) => {
                match output {
                    OutputFormat::Text => println!("{} {}", entry.id, entry.ip_addr),
                    OutputFormat::Json => println!("{}", serde_json::to_string(&entry)?),
                }
                summary.recorded += 1;
            }
            Err(Error::DuplicateAddress) => {
                warn!("Address already recorded: {}", ip_addr);
                summary.duplicates += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to record {ip_addr}"));
            }
        }
    }

    Ok(summary)
}

/// Read one address per non-empty line
async fn read_addresses<R>(reader: R) -> Result<Vec<String>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut addresses = Vec::new();

    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            addresses.push(line);
        }
    }

    Ok(addresses)
}
