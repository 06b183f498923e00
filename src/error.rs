//! Startup error types
//!
//! Request-level failures never surface here: they become HTTP responses.
//! Everything in this module is fatal and ends the process.

use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serve root directory '{path}': {source}")]
    RootDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log file: {0}")]
    Logger(#[source] std::io::Error),

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl ServerError {
    /// True when the listen port is already taken by another process
    pub fn is_addr_in_use(&self) -> bool {
        matches!(
            self,
            Self::Bind { source, .. } if source.kind() == std::io::ErrorKind::AddrInUse
        )
    }
}
