//! Direct Contact Greeter
//!
//! The bot has no interactive surface; a user who opens a private chat with
//! it gets a short explanation and nothing else.

use crate::telegram::{ChatId, TelegramClient, TelegramResult, User};

/// Handles /start from direct contact
pub struct Greeter<C: TelegramClient> {
    client: C,
}

impl<C: TelegramClient> Greeter<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Reply to the originating chat, personalized with the sender's first
    /// name
    pub async fn handle(&self, chat: ChatId, user: &User) -> TelegramResult<()> {
        let text = format!(
            "Hello {}! This bot does nothing when directly contacted. You can close this chat.",
            user.first_name
        );
        self.client.send_message(chat, &text).await
    }
}
