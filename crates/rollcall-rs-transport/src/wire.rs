//! Raw Bot API update types and their conversion to engine events.

use log::debug;
use rollcall_rs_protocol::{CallbackPress, ContactShare, UserEvent};
use serde::Deserialize;

/// One long-poll update from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub phone_number: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message: Option<Message>,
}

impl Update {
    /// Convert the update into an engine event, or `None` for update kinds
    /// the flow does not consume (other commands, edits, joins, ...).
    pub fn into_event(self) -> Option<UserEvent> {
        if let Some(message) = self.message {
            let from = message.from?;
            if let Some(contact) = message.contact {
                return Some(UserEvent::Contact {
                    user_id: from.id,
                    chat_id: message.chat.id,
                    contact: ContactShare {
                        phone_number: contact.phone_number,
                        user_id: contact.user_id,
                    },
                });
            }
            let text = message.text?;
            if is_start_command(&text) {
                return Some(UserEvent::Start {
                    user_id: from.id,
                    chat_id: message.chat.id,
                    username: from.username,
                });
            }
            if text.starts_with('/') {
                debug!("dropping unsupported command (update_id={})", self.update_id);
                return None;
            }
            return Some(UserEvent::Text {
                user_id: from.id,
                chat_id: message.chat.id,
                text,
            });
        }

        if let Some(query) = self.callback_query {
            let data = query.data?;
            let chat_id = query.message.map(|message| message.chat.id)?;
            return Some(UserEvent::Callback {
                user_id: query.from.id,
                chat_id,
                username: query.from.username,
                press: CallbackPress {
                    id: query.id,
                    data,
                },
            });
        }

        debug!("dropping unsupported update (update_id={})", self.update_id);
        None
    }
}

/// `/start`, with or without a `@botname` suffix or trailing arguments.
fn is_start_command(text: &str) -> bool {
    match text.trim().split_whitespace().next() {
        Some(token) => token == "/start" || token.starts_with("/start@"),
        None => false,
    }
}
