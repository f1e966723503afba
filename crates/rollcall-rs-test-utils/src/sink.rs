//! Sink stubs for exercising the persistence contract.

use async_trait::async_trait;
use parking_lot::Mutex;
use rollcall_rs_protocol::IntakeRecord;
use rollcall_rs_sink::{RecordSink, SinkError};

/// Sink that stores every persisted record in memory.
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<IntakeRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records persisted so far, in order.
    pub fn records(&self) -> Vec<IntakeRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl RecordSink for RecordingSink {
    async fn persist(&self, record: &IntakeRecord) -> Result<(), SinkError> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "recording"
    }
}

/// Sink that rejects every persist call.
#[derive(Default)]
pub struct FailingSink;

impl FailingSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RecordSink for FailingSink {
    async fn persist(&self, _record: &IntakeRecord) -> Result<(), SinkError> {
        Err(SinkError::Rejected(500))
    }

    fn kind(&self) -> &'static str {
        "failing"
    }
}

/// Sink that fails a fixed number of times, then records like
/// [`RecordingSink`]. Exercises the retry contract.
pub struct FlakySink {
    failures_left: Mutex<u32>,
    records: Mutex<Vec<IntakeRecord>>,
}

impl FlakySink {
    pub fn new(failures: u32) -> Self {
        Self {
            failures_left: Mutex::new(failures),
            records: Mutex::new(Vec::new()),
        }
    }

    /// Records persisted after the scripted failures ran out.
    pub fn records(&self) -> Vec<IntakeRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl RecordSink for FlakySink {
    async fn persist(&self, record: &IntakeRecord) -> Result<(), SinkError> {
        let mut failures_left = self.failures_left.lock();
        if *failures_left > 0 {
            *failures_left -= 1;
            return Err(SinkError::Rejected(503));
        }
        drop(failures_left);
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "flaky"
    }
}
