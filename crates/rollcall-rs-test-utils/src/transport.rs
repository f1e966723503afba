//! Scriptable in-memory transport.

use async_trait::async_trait;
use parking_lot::Mutex;
use rollcall_rs_protocol::{
    ChatId, ChatRef, Keyboard, MembershipStatus, Transport, TransportError, UserId,
};
use std::collections::{HashMap, HashSet};

/// One outbound message captured by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub keyboard: Keyboard,
}

/// Transport stub with scripted membership answers and recorded output.
#[derive(Default)]
pub struct StubTransport {
    memberships: Mutex<HashMap<(String, UserId), MembershipStatus>>,
    failing_channels: Mutex<HashSet<String>>,
    sent: Mutex<Vec<SentMessage>>,
    relayed: Mutex<Vec<(ChatRef, String)>>,
    answered: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a membership status for a channel/user pair. Pairs without a
    /// script answer as `Left`.
    pub fn set_membership(&self, channel: &str, user_id: UserId, status: MembershipStatus) {
        self.memberships
            .lock()
            .insert((channel.to_string(), user_id), status);
    }

    /// Make membership queries against a channel fail with a transport error.
    pub fn fail_channel(&self, channel: &str) {
        self.failing_channels.lock().insert(channel.to_string());
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    /// The most recent outbound message.
    pub fn last_sent(&self) -> Option<SentMessage> {
        self.sent.lock().last().cloned()
    }

    /// Summaries relayed to broadcast chats.
    pub fn relayed(&self) -> Vec<(ChatRef, String)> {
        self.relayed.lock().clone()
    }

    /// Callback ids acknowledged so far.
    pub fn answered_callbacks(&self) -> Vec<String> {
        self.answered.lock().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<(), TransportError> {
        self.sent.lock().push(SentMessage {
            chat_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn relay_markdown(&self, target: &ChatRef, text: &str) -> Result<(), TransportError> {
        self.relayed.lock().push((target.clone(), text.to_string()));
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        self.answered.lock().push(callback_id.to_string());
        Ok(())
    }

    async fn membership_status(
        &self,
        channel: &str,
        user_id: UserId,
    ) -> Result<MembershipStatus, TransportError> {
        if self.failing_channels.lock().contains(channel) {
            return Err(TransportError::Request(format!(
                "scripted failure for {channel}"
            )));
        }
        Ok(self
            .memberships
            .lock()
            .get(&(channel.to_string(), user_id))
            .copied()
            .unwrap_or(MembershipStatus::Left))
    }
}
