//! Outbound transport capability used by the engine and the relay sink.

use crate::{ChatId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors returned by transport calls.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be performed at all.
    #[error("transport request failed: {0}")]
    Request(String),
    /// The remote API answered with an error payload.
    #[error("api error {code}: {description}")]
    Api { code: i64, description: String },
    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Chat membership as reported by the membership service.
///
/// `Creator` is the wire name the Bot API uses for a channel owner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Kicked,
}

impl MembershipStatus {
    /// Whether this status counts as an active member for access gating.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            MembershipStatus::Creator | MembershipStatus::Administrator | MembershipStatus::Member
        )
    }
}

/// Address of a chat: numeric id or public `@handle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRef {
    Id(ChatId),
    Handle(String),
}

impl ChatRef {
    /// Parse a config value: a leading `@` (or any non-numeric text) is a
    /// public handle, anything else a numeric chat id.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if let Ok(id) = trimmed.parse::<ChatId>() {
            ChatRef::Id(id)
        } else {
            ChatRef::Handle(format!("@{}", trimmed.trim_start_matches('@')))
        }
    }
}

impl From<ChatId> for ChatRef {
    fn from(id: ChatId) -> Self {
        ChatRef::Id(id)
    }
}

impl fmt::Display for ChatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRef::Id(id) => write!(f, "{id}"),
            ChatRef::Handle(handle) => write!(f, "{handle}"),
        }
    }
}

/// What a single inline button does when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Open an external link.
    Url(String),
    /// Send the payload back as a callback press.
    Callback(String),
}

/// A single inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

impl Button {
    /// Build a link button.
    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(url.into()),
        }
    }

    /// Build a callback button.
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }
}

/// Rows of inline buttons attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonMenu {
    pub rows: Vec<Vec<Button>>,
}

impl ButtonMenu {
    /// Lay out the given buttons one per row.
    pub fn single_column(buttons: Vec<Button>) -> Self {
        Self {
            rows: buttons.into_iter().map(|button| vec![button]).collect(),
        }
    }
}

/// Keyboard accessory attached to an outgoing text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// No accessory.
    None,
    /// Remove any reply keyboard still shown to the user.
    Remove,
    /// Attach an inline button menu.
    Menu(ButtonMenu),
    /// Show a one-tap reply button that shares the user's contact.
    Contact { button_label: String },
}

/// Outbound messaging and membership-lookup capability.
///
/// The intake engine only ever needs "send text with an optional keyboard",
/// "relay a summary", "acknowledge a button press", and "look up membership";
/// everything transport-specific stays behind this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a text message with an optional keyboard accessory.
    async fn send(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<(), TransportError>;

    /// Relay a Markdown-formatted summary to a broadcast chat.
    async fn relay_markdown(&self, target: &ChatRef, text: &str) -> Result<(), TransportError>;

    /// Acknowledge a callback press so the client stops its progress spinner.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError>;

    /// Query a user's membership status in a channel.
    async fn membership_status(
        &self,
        channel: &str,
        user_id: UserId,
    ) -> Result<MembershipStatus, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::{ChatRef, MembershipStatus};
    use pretty_assertions::assert_eq;

    #[test]
    fn active_statuses_match_the_membership_service_contract() {
        assert!(MembershipStatus::Creator.is_active());
        assert!(MembershipStatus::Administrator.is_active());
        assert!(MembershipStatus::Member.is_active());
        assert!(!MembershipStatus::Restricted.is_active());
        assert!(!MembershipStatus::Left.is_active());
        assert!(!MembershipStatus::Kicked.is_active());
    }

    #[test]
    fn chat_ref_parses_ids_and_handles() {
        assert_eq!(ChatRef::parse("-1001234"), ChatRef::Id(-1001234));
        assert_eq!(
            ChatRef::parse("@intake_archive"),
            ChatRef::Handle("@intake_archive".to_string())
        );
        // A bare handle gains the leading @ so the wire format stays valid.
        assert_eq!(
            ChatRef::parse("intake_archive"),
            ChatRef::Handle("@intake_archive".to_string())
        );
    }

    #[test]
    fn statuses_decode_from_wire_names() {
        let status: MembershipStatus = serde_json::from_str("\"creator\"").expect("decode");
        assert_eq!(status, MembershipStatus::Creator);
    }
}
