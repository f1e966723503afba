//! Wire model shared by the intake engine, the chat transport, and sinks.
//!
//! This crate owns the transport-neutral event and record types plus the
//! `Transport` capability trait that the engine and the relay sink talk to.

mod event;
mod record;
mod transport;

pub use event::{CallbackPress, ContactShare, UserEvent};
pub use record::IntakeRecord;
pub use transport::{
    Button, ButtonAction, ButtonMenu, ChatRef, Keyboard, MembershipStatus, Transport,
    TransportError,
};

/// Numeric identifier for a user account.
pub type UserId = i64;
/// Numeric identifier for a chat the bot can write to.
pub type ChatId = i64;
