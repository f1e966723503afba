//! Error types for the core intake crate.

use rollcall_rs_protocol::TransportError;
use thiserror::Error;

/// Errors returned by intake engine operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required field was still unset when the sequence completed.
    #[error("field {0} missing from completed sequence")]
    MissingField(&'static str),
    /// An outbound transport call failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}
