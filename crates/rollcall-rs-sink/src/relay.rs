//! Sink that relays a formatted summary to a broadcast chat.

use crate::render::summary_markdown;
use crate::{RecordSink, SinkError};
use async_trait::async_trait;
use log::debug;
use rollcall_rs_protocol::{ChatRef, IntakeRecord, Transport};
use std::sync::Arc;

/// Sends each completed record as a Markdown summary through the transport.
pub struct ChannelRelaySink {
    transport: Arc<dyn Transport>,
    target: ChatRef,
}

impl ChannelRelaySink {
    /// Create a relay sink targeting the given broadcast chat.
    pub fn new(transport: Arc<dyn Transport>, target: ChatRef) -> Self {
        Self { transport, target }
    }
}

#[async_trait]
impl RecordSink for ChannelRelaySink {
    async fn persist(&self, record: &IntakeRecord) -> Result<(), SinkError> {
        let summary = summary_markdown(record);
        debug!(
            "relaying record summary (target={}, user_id={})",
            self.target, record.user_id
        );
        self.transport.relay_markdown(&self.target, &summary).await?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "relay"
    }
}

#[cfg(test)]
mod tests {
    use super::ChannelRelaySink;
    use crate::RecordSink;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use rollcall_rs_protocol::{
        ChatId, ChatRef, IntakeRecord, Keyboard, MembershipStatus, Transport, TransportError,
        UserId,
    };
    use std::sync::Arc;

    #[derive(Default)]
    struct RelayRecorder {
        relayed: Mutex<Vec<(ChatRef, String)>>,
    }

    #[async_trait]
    impl Transport for RelayRecorder {
        async fn send(
            &self,
            _chat_id: ChatId,
            _text: &str,
            _keyboard: Keyboard,
        ) -> Result<(), TransportError> {
            Ok(())
        }

        async fn relay_markdown(
            &self,
            target: &ChatRef,
            text: &str,
        ) -> Result<(), TransportError> {
            self.relayed.lock().push((target.clone(), text.to_string()));
            Ok(())
        }

        async fn answer_callback(&self, _callback_id: &str) -> Result<(), TransportError> {
            Ok(())
        }

        async fn membership_status(
            &self,
            _channel: &str,
            _user_id: UserId,
        ) -> Result<MembershipStatus, TransportError> {
            Ok(MembershipStatus::Member)
        }
    }

    #[tokio::test]
    async fn relays_one_summary_per_record() {
        let transport = Arc::new(RelayRecorder::default());
        let sink = ChannelRelaySink::new(
            transport.clone(),
            ChatRef::Handle("@intake_archive".to_string()),
        );

        let record = IntakeRecord {
            user_id: 42,
            username: None,
            school: "Lyceum 1".to_string(),
            grade: "9".to_string(),
            full_name: "Aziz Karimov".to_string(),
            phone: None,
        };
        sink.persist(&record).await.expect("persist");

        let relayed = transport.relayed.lock();
        assert_eq!(relayed.len(), 1);
        assert_eq!(relayed[0].0, ChatRef::Handle("@intake_archive".to_string()));
        assert!(relayed[0].1.contains("Aziz Karimov"));
    }
}
