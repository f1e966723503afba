//! Inbound user events consumed by the intake engine.

use crate::{ChatId, UserId};
use serde::{Deserialize, Serialize};

/// Structured contact payload shared through the transport's contact button.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactShare {
    /// Phone number exactly as the transport delivered it.
    pub phone_number: String,
    /// Account the contact belongs to, when the transport reports it.
    pub user_id: Option<UserId>,
}

/// An inline button press awaiting acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallbackPress {
    /// Opaque id used to acknowledge the press.
    pub id: String,
    /// Payload attached to the pressed button.
    pub data: String,
}

/// All event kinds the intake flow consumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type", content = "payload")]
pub enum UserEvent {
    /// The start command opening (or reopening) a session.
    Start {
        user_id: UserId,
        chat_id: ChatId,
        username: Option<String>,
    },
    /// A free-form text reply.
    Text {
        user_id: UserId,
        chat_id: ChatId,
        text: String,
    },
    /// A structured contact share.
    Contact {
        user_id: UserId,
        chat_id: ChatId,
        contact: ContactShare,
    },
    /// An inline button press.
    Callback {
        user_id: UserId,
        chat_id: ChatId,
        username: Option<String>,
        press: CallbackPress,
    },
}

impl UserEvent {
    /// User the event originates from.
    pub fn user_id(&self) -> UserId {
        match self {
            UserEvent::Start { user_id, .. }
            | UserEvent::Text { user_id, .. }
            | UserEvent::Contact { user_id, .. }
            | UserEvent::Callback { user_id, .. } => *user_id,
        }
    }

    /// Chat the event arrived in and replies should go to.
    pub fn chat_id(&self) -> ChatId {
        match self {
            UserEvent::Start { chat_id, .. }
            | UserEvent::Text { chat_id, .. }
            | UserEvent::Contact { chat_id, .. }
            | UserEvent::Callback { chat_id, .. } => *chat_id,
        }
    }
}
