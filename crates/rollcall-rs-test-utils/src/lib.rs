//! Test helpers shared across rollcall crates.

pub mod sink;
pub mod transport;

pub use sink::{FailingSink, FlakySink, RecordingSink};
pub use transport::{SentMessage, StubTransport};
