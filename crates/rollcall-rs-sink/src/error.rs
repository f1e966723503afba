//! Error type shared by all sink adapters.

use rollcall_rs_protocol::TransportError;
use thiserror::Error;

/// Errors returned by [`crate::RecordSink::persist`].
#[derive(Debug, Error)]
pub enum SinkError {
    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV encoding or writing failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// Database access failed.
    #[error("sql error: {0}")]
    Sql(#[from] rusqlite::Error),
    /// An HTTP request could not be performed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("endpoint rejected record (status={0})")]
    Rejected(u16),
    /// The relay transport refused the message.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// Payload serialization failed.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
