//! IMAP connection configuration

use crate::error::{Error, Result};
use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// IMAP account used to look up remote folders
#[derive(Debug, Clone)]
pub struct ImapConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Upper bound for connecting and listing folders.
    pub timeout: Duration,
}

impl ImapConfig {
    /// Build a configuration with the default timeout.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load IMAP configuration from environment variables
    ///
    /// Reads from `.env` file if present. Required variables:
    /// - `IMAP_USERNAME`
    /// - `IMAP_PASSWORD`
    ///
    /// Optional (with defaults):
    /// - `IMAP_HOST` (default: `127.0.0.1`)
    /// - `IMAP_PORT` (default: `1143`)
    /// - `IMAP_TIMEOUT_SECS` (default: `30`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or
    /// a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port: u16 = lookup("IMAP_PORT")
            .unwrap_or_else(|| "1143".to_string())
            .parse::<u16>()
            .map_err(|e| Error::Config(format!("Invalid IMAP_PORT: {e}")))?;
        let timeout_secs: u64 = lookup("IMAP_TIMEOUT_SECS")
            .map_or(Ok(DEFAULT_TIMEOUT_SECS), |v| v.parse::<u64>())
            .map_err(|e| Error::Config(format!("Invalid IMAP_TIMEOUT_SECS: {e}")))?;

        Ok(Self {
            host: lookup("IMAP_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            username: lookup("IMAP_USERNAME")
                .ok_or_else(|| Error::Config("IMAP_USERNAME not set".into()))?,
            password: lookup("IMAP_PASSWORD")
                .ok_or_else(|| Error::Config("IMAP_PASSWORD not set".into()))?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
