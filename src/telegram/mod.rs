//! Telegram Bot API Integration Module
//!
//! The bot talks to Telegram through the `TelegramClient` capability trait:
//! membership lookup, join-request resolution, direct messages, member
//! removal, and the update stream. `BotApiClient` is the production
//! implementation (HTTPS + JSON long polling); `MockTelegramClient` backs
//! the tests.

pub mod client;
pub mod mock;
pub mod traits;

pub use client::BotApiClient;
pub use mock::MockTelegramClient;
pub use traits::{
    ChatEvent, ChatId, JoinRequest, MemberStatus, MembershipLookup, TelegramClient, TelegramError,
    TelegramResult, User, UserId,
};
