//! Sink that submits each record as a JSON payload to a webhook.

use crate::{RecordSink, SinkError};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rollcall_rs_protocol::IntakeRecord;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// POSTs the serialized record to a configured URL.
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    /// Create a webhook sink for the given endpoint.
    pub fn new(url: impl Into<String>) -> Result<Self, SinkError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RecordSink for WebhookSink {
    async fn persist(&self, record: &IntakeRecord) -> Result<(), SinkError> {
        let response = self.client.post(&self.url).json(record).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected(status.as_u16()));
        }
        debug!(
            "submitted record to webhook (url={}, user_id={})",
            self.url, record.user_id
        );
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "webhook"
    }
}
