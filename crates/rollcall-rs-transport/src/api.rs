//! HTTPS client for the Bot API.

use crate::wire::Update;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rollcall_rs_protocol::{
    ChatId, ChatRef, Keyboard, MembershipStatus, Transport, TransportError, UserId,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Every Bot API response arrives in this envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiEnvelope<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChatMember {
    status: MembershipStatus,
}

/// Bot API client; the one concrete [`Transport`] implementation.
pub struct TelegramApi {
    client: Client,
    base_url: String,
    token: String,
}

impl TelegramApi {
    /// Create a client for the given bot token.
    ///
    /// `request_timeout` must exceed the long-poll timeout passed to
    /// `get_updates`, or every poll cycle dies at the HTTP layer first.
    pub fn new(token: impl Into<String>, request_timeout: Duration) -> Result<Self, TransportError> {
        Self::with_base_url(token, request_timeout, DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default API host.
    pub fn with_base_url(
        token: impl Into<String>,
        request_timeout: Duration,
        base_url: impl Into<String>,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| TransportError::Request(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &Value,
    ) -> Result<T, TransportError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;
        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;
        if !envelope.ok {
            return Err(TransportError::Api {
                code: envelope.error_code.unwrap_or_default(),
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        envelope.result.ok_or(TransportError::Api {
            code: 0,
            description: "response without result".to_string(),
        })
    }

    /// Fetch the next batch of updates, long-polling up to `timeout_secs`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TransportError> {
        let payload = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        self.call("getUpdates", &payload).await
    }
}

#[async_trait]
impl Transport for TelegramApi {
    async fn send(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<(), TransportError> {
        let mut payload = json!({ "chat_id": chat_id, "text": text });
        if let Some(markup) = reply_markup(&keyboard) {
            payload["reply_markup"] = markup;
        }
        debug!("sendMessage (chat_id={}, len={})", chat_id, text.len());
        self.call::<Value>("sendMessage", &payload).await?;
        Ok(())
    }

    async fn relay_markdown(&self, target: &ChatRef, text: &str) -> Result<(), TransportError> {
        let chat: Value = match target {
            ChatRef::Id(id) => json!(id),
            ChatRef::Handle(handle) => json!(handle),
        };
        let payload = json!({
            "chat_id": chat,
            "text": text,
            "parse_mode": "Markdown",
        });
        debug!("relay sendMessage (target={})", target);
        self.call::<Value>("sendMessage", &payload).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        let payload = json!({ "callback_query_id": callback_id });
        self.call::<bool>("answerCallbackQuery", &payload).await?;
        Ok(())
    }

    async fn membership_status(
        &self,
        channel: &str,
        user_id: UserId,
    ) -> Result<MembershipStatus, TransportError> {
        let payload = json!({ "chat_id": channel, "user_id": user_id });
        let member: ChatMember = self.call("getChatMember", &payload).await?;
        Ok(member.status)
    }
}

/// Encode a keyboard accessory as Bot API `reply_markup`.
fn reply_markup(keyboard: &Keyboard) -> Option<Value> {
    use rollcall_rs_protocol::ButtonAction;
    match keyboard {
        Keyboard::None => None,
        Keyboard::Remove => Some(json!({ "remove_keyboard": true })),
        Keyboard::Menu(menu) => {
            let rows: Vec<Vec<Value>> = menu
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| match &button.action {
                            ButtonAction::Url(url) => {
                                json!({ "text": button.label, "url": url })
                            }
                            ButtonAction::Callback(data) => {
                                json!({ "text": button.label, "callback_data": data })
                            }
                        })
                        .collect()
                })
                .collect();
            Some(json!({ "inline_keyboard": rows }))
        }
        Keyboard::Contact { button_label } => Some(json!({
            "keyboard": [[{ "text": button_label, "request_contact": true }]],
            "resize_keyboard": true,
            "one_time_keyboard": true,
        })),
    }
}
