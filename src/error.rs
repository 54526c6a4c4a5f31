//! Error types for special-folders

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IMAP error: {0}")]
    Imap(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Folder listing timed out after {0:?}")]
    Timeout(Duration),

    #[error("View model is no longer running")]
    Closed,
}

pub type Result<T> = std::result::Result<T, Error>;
