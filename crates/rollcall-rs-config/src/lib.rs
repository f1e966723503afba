//! Process configuration for the rollcall bot.
//!
//! Everything comes from environment variables, is read exactly once at
//! startup, and is validated eagerly so a misconfigured process exits before
//! it handles a single event.

mod env;
mod error;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Configuration schema models.
pub use model::{ReentryPolicy, RollcallConfig, SinkConfig};
