//! Persistence sinks for completed intake records.
//!
//! Five interchangeable adapters implement [`RecordSink`]: a broadcast-chat
//! relay, a CSV spreadsheet file, a SQLite table, a cloud spreadsheet API,
//! and a webhook. The engine selects exactly one at startup.

mod cloud_sheet;
mod error;
mod relay;
mod render;
mod spreadsheet;
mod sqlite;
mod webhook;

pub use cloud_sheet::CloudSheetSink;
pub use error::SinkError;
pub use relay::ChannelRelaySink;
pub use render::{row_cells, summary_markdown, ROW_HEADER};
pub use spreadsheet::CsvSink;
pub use sqlite::SqliteSink;
pub use webhook::WebhookSink;

use async_trait::async_trait;
use rollcall_rs_protocol::IntakeRecord;

/// Persistence target for completed intake records.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Durably store one completed record.
    async fn persist(&self, record: &IntakeRecord) -> Result<(), SinkError>;

    /// Short adapter name used in logs.
    fn kind(&self) -> &'static str;
}
