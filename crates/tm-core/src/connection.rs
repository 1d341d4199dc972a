//! Connection settings for network database backends.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Port used when the configured port is zero or unset.
pub const DEFAULT_PORT: u16 = 3306;

/// Dial timeout appended to every connection string.
const CONNECT_TIMEOUT_MS: u32 = 1000;

/// Host, credentials, and database name for a MySQL-compatible server.
///
/// A `port` of `0` means "use [`DEFAULT_PORT`]". The value itself is never
/// rewritten; the substitution happens in [`connection_string`].
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Server host name or address
    #[serde(default)]
    pub host: String,

    /// Server port (0 selects the default)
    #[serde(default)]
    pub port: u16,

    /// User name
    #[serde(default)]
    pub user: String,

    /// Password (may be empty)
    #[serde(default)]
    pub password: String,

    /// Database (schema) name
    #[serde(default)]
    pub name: String,
}

impl ConnectionConfig {
    /// The port a connection will actually use.
    pub fn effective_port(&self) -> u16 {
        if self.port == 0 {
            DEFAULT_PORT
        } else {
            self.port
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

/// Build a `mysql://` URL for `config`.
///
/// Pure: a zero port is replaced by [`DEFAULT_PORT`] in the output only.
pub fn connection_string(config: &ConnectionConfig) -> String {
    format!(
        "mysql://{}:{}@{}:{}/{}?tcp_connect_timeout_ms={}",
        config.user,
        config.password,
        config.host,
        config.effective_port(),
        config.name,
        CONNECT_TIMEOUT_MS
    )
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
