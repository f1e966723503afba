//! Sink that appends rows to a cloud spreadsheet through its HTTP API.

use crate::render::row_cells;
use crate::{RecordSink, SinkError};
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::Client;
use rollcall_rs_protocol::IntakeRecord;
use serde_json::json;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Appends one row per record via the `values:append` endpoint, authorized
/// with a bearer token from config.
pub struct CloudSheetSink {
    client: Client,
    spreadsheet_id: String,
    token: String,
    range: String,
    base_url: String,
}

impl CloudSheetSink {
    /// Create a cloud sheet sink for the given spreadsheet.
    pub fn new(
        spreadsheet_id: impl Into<String>,
        token: impl Into<String>,
        range: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, SinkError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            token: token.into(),
            range: range.into(),
            base_url: base_url.into(),
        })
    }

    /// Append endpoint for this sink's spreadsheet and range.
    fn append_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}:append?valueInputOption=RAW",
            self.base_url.trim_end_matches('/'),
            self.spreadsheet_id,
            self.range
        )
    }
}

#[async_trait]
impl RecordSink for CloudSheetSink {
    async fn persist(&self, record: &IntakeRecord) -> Result<(), SinkError> {
        let body = json!({ "values": [row_cells(record, Utc::now())] });
        let response = self
            .client
            .post(self.append_url())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected(status.as_u16()));
        }
        debug!(
            "appended sheet row (spreadsheet_id={}, user_id={})",
            self.spreadsheet_id, record.user_id
        );
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "sheet"
    }
}

#[cfg(test)]
mod tests {
    use super::CloudSheetSink;
    use pretty_assertions::assert_eq;

    #[test]
    fn append_url_targets_the_values_endpoint() {
        let sink = CloudSheetSink::new(
            "sheet-1",
            "token",
            "A1",
            "https://sheets.googleapis.com/",
        )
        .expect("sink");
        assert_eq!(
            sink.append_url(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-1/values/A1:append?valueInputOption=RAW"
        );
    }
}
