//! Connection configuration
//!
//! [`DatabaseConfig`] holds the parameters needed to reach the store and
//! renders them into the key=value descriptor consumed by
//! [`crate::connection::open`].

use serde::{Deserialize, Serialize};

/// PostgreSQL connection parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Server host name or address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: String,

    /// Role to connect as
    #[serde(default = "default_username")]
    pub username: String,

    /// Password for `username`
    #[serde(default = "default_password")]
    pub password: String,

    /// Database name
    #[serde(default = "default_database")]
    pub database: String,

    /// libpq-style SSL mode (`disable`, `prefer`, `require`, ...)
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
}

impl DatabaseConfig {
    /// Render the connection descriptor
    ///
    /// The fields are written in a fixed order as space-separated
    /// `key=value` pairs. Values are not quoted or escaped, so a value
    /// containing whitespace produces a descriptor that
    /// [`crate::connection::open`] will reject or misread.
    pub fn descriptor(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={}",
            self.host, self.port, self.username, self.password, self.database, self.ssl_mode,
        )
    }

    /// Validate the configuration
    ///
    /// The core never calls this; front ends use it to fail early on
    /// settings that cannot form a usable descriptor.
    pub fn validate(&self) -> Result<(), crate::Error> {
        let fields = [
            ("host", &self.host),
            ("port", &self.port),
            ("user", &self.username),
            ("password", &self.password),
            ("dbname", &self.database),
            ("sslmode", &self.ssl_mode),
        ];

        for (name, value) in fields {
            if value.is_empty() {
                return Err(crate::Error::config(format!("{name} cannot be empty")));
            }
            if value.chars().any(char::is_whitespace) {
                return Err(crate::Error::config(format!(
                    "{name} cannot contain whitespace"
                )));
            }
        }

        if self.port.parse::<u16>().is_err() {
            return Err(crate::Error::config(format!(
                "port must be a number between 0 and 65535. Got: {}",
                self.port
            )));
        }

        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: default_username(),
            password: default_password(),
            database: default_database(),
            ssl_mode: default_ssl_mode(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> String {
    "5432".to_string()
}

fn default_username() -> String {
    "user".to_string()
}

fn default_password() -> String {
    "admin1".to_string()
}

fn default_database() -> String {
    "demo".to_string()
}

fn default_ssl_mode() -> String {
    "disable".to_string()
}
