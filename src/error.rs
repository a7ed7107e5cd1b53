//! Unified error type.

use thiserror::Error;

/// Infrastructure failures: binding a port, reading configuration,
/// installing the log subscriber.
///
/// Request-level problems (bad payloads, unknown ids) are not `Error`s; they
/// are rendered as HTTP responses by [`ApiError`](crate::api::ApiError).
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid listen address `{addr}`: {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("telemetry: {0}")]
    Telemetry(String),
}
