//! POP3 connection configuration

use crate::error::{Error, Result};
use std::env;

/// POP3 connection configuration
#[derive(Debug, Clone)]
pub struct Pop3Config {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Use implicit TLS (POP3S) instead of plain TCP.
    pub tls: bool,
}

impl Pop3Config {
    /// Load POP3 configuration from environment variables
    ///
    /// Reads from `.env` file if present. Required variables:
    /// - `POP3_USERNAME`
    /// - `POP3_PASSWORD`
    ///
    /// Optional (with defaults):
    /// - `POP3_HOST` (default: `127.0.0.1`)
    /// - `POP3_PORT` (default: `110`, or `995` when TLS is on)
    /// - `POP3_TLS` (default: off; set to `1` or `true`)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let tls = env::var("POP3_TLS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let default_port = if tls { "995" } else { "110" };

        Ok(Self {
            host: env::var("POP3_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("POP3_PORT")
                .unwrap_or_else(|_| default_port.to_string())
                .parse()
                .map_err(|e| Error::config(format!("invalid POP3_PORT: {e}")))?,
            username: env::var("POP3_USERNAME")
                .map_err(|_| Error::config("POP3_USERNAME not set"))?,
            password: env::var("POP3_PASSWORD")
                .map_err(|_| Error::config("POP3_PASSWORD not set"))?,
            tls,
        })
    }

    /// The `host:port` dial address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
