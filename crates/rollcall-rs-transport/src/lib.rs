//! Telegram Bot API transport.
//!
//! Implements the protocol `Transport` trait over HTTPS and turns raw
//! long-poll updates into the engine's `UserEvent`s.

mod api;
mod poll;
mod wire;

pub use api::TelegramApi;
pub use poll::UpdatePoller;
pub use wire::Update;
